//! Core identifiers for the workflow
//!
//! - [`Stage`]: an opaque, named point in the ticket lifecycle
//! - [`Persona`]: the closed set of viewer roles

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Named point in a ticket's lifecycle (e.g. "In Development")
///
/// Stages are compared by exact name. `Borrow<str>` lets every stage-keyed
/// table be queried with a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stage(String);

impl Stage {
    /// Create a stage from its name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Stage name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Stage {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Stage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Stage {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Stage {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for Stage {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Stage {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Viewer role
///
/// `Default` is the fallback owner for stages missing from the owner map; it
/// never has a column layout of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Persona {
    /// The customer requesting work
    Client,
    /// Consultant / project manager
    Consultant,
    /// Implementing developer
    Developer,
    /// Quality assurance
    QA,
    /// Fallback owner
    #[default]
    Default,
}

impl Persona {
    /// The viewer roles, excluding the `Default` fallback
    pub const VIEWERS: [Persona; 4] = [
        Persona::Client,
        Persona::Consultant,
        Persona::Developer,
        Persona::QA,
    ];

    /// Display name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Client => "Client",
            Persona::Consultant => "Consultant",
            Persona::Developer => "Developer",
            Persona::QA => "QA",
            Persona::Default => "Default",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "client" => Ok(Persona::Client),
            "consultant" | "pm" => Ok(Persona::Consultant),
            "developer" | "dev" => Ok(Persona::Developer),
            "qa" => Ok(Persona::QA),
            "default" => Ok(Persona::Default),
            other => Err(format!("Unknown persona: {other}")),
        }
    }
}
