//! Identifier normalization
//!
//! The ticket store and the ETA service may spell the same identity with
//! different lengths: one side can carry a longer encoded form whose first
//! characters are the shorter form. Both sides are cut to a fixed-length
//! prefix before they are compared.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Number of leading characters that identify a ticket
pub const NORMALIZED_ID_LEN: usize = 15;

/// Identifier reduced to its comparable prefix
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedId(String);

impl NormalizedId {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First [`NORMALIZED_ID_LEN`] characters of `raw`
///
/// Shorter identifiers are kept whole. Counting is by character, so a
/// multi-byte identifier is never split inside a code point.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedId {
    let end = raw
        .char_indices()
        .nth(NORMALIZED_ID_LEN)
        .map_or(raw.len(), |(idx, _)| idx);
    NormalizedId(raw[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_and_short_forms_agree() {
        assert_eq!(normalize("a0B5g00000XyZabEAF"), normalize("a0B5g00000XyZab"));
        assert_eq!(normalize("a0B5g00000XyZab").as_str(), "a0B5g00000XyZab");
    }

    #[test]
    fn short_ids_are_kept_whole() {
        assert_eq!(normalize("T1").as_str(), "T1");
        assert_eq!(normalize("").as_str(), "");
    }

    #[test]
    fn multibyte_ids_are_cut_on_char_boundaries() {
        let id = "éééééééééééééééééé";
        assert_eq!(normalize(id).as_str().chars().count(), NORMALIZED_ID_LEN);
    }
}
