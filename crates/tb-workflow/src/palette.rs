//! Owner and stage color tables

use crate::config::DEFAULT_OWNER_COLOR;
use crate::types::{Persona, Stage};
use indexmap::IndexMap;

/// Display colors
#[derive(Debug, Clone)]
pub struct Palette {
    owner_colors: IndexMap<Persona, String>,
    stage_colors: IndexMap<Stage, String>,
    neutral_card_color: String,
}

impl Palette {
    pub(crate) fn new(
        mut owner_colors: IndexMap<Persona, String>,
        stage_colors: IndexMap<Stage, String>,
        neutral_card_color: String,
    ) -> Self {
        owner_colors
            .entry(Persona::Default)
            .or_insert_with(|| DEFAULT_OWNER_COLOR.to_string());
        Self {
            owner_colors,
            stage_colors,
            neutral_card_color,
        }
    }

    /// Header/button color for an owner, falling back to the `Default` gray
    #[must_use]
    pub fn owner_color(&self, owner: Persona) -> &str {
        self.owner_colors
            .get(&owner)
            .or_else(|| self.owner_colors.get(&Persona::Default))
            .map_or(DEFAULT_OWNER_COLOR, String::as_str)
    }

    /// Card color for a stage, falling back to the neutral color
    #[must_use]
    pub fn stage_color(&self, stage: &str) -> &str {
        self.stage_colors
            .get(stage)
            .map_or(self.neutral_card_color.as_str(), String::as_str)
    }
}

/// Inline style for a solid block with contrasting text
#[inline]
#[must_use]
pub fn solid_style(background: &str) -> String {
    format!("background:{background};color:#fff;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_default_owner_color_is_filled_in() {
        let palette = Palette::new(IndexMap::new(), IndexMap::new(), "#eee".into());
        assert_eq!(palette.owner_color(Persona::QA), DEFAULT_OWNER_COLOR);
        assert_eq!(palette.owner_color(Persona::Default), DEFAULT_OWNER_COLOR);
    }

    #[test]
    fn unmapped_owner_uses_configured_default() {
        let mut owners = IndexMap::new();
        owners.insert(Persona::Default, "#111".to_string());
        owners.insert(Persona::Client, "#2196F3".to_string());
        let palette = Palette::new(owners, IndexMap::new(), "#eee".into());
        assert_eq!(palette.owner_color(Persona::Client), "#2196F3");
        assert_eq!(palette.owner_color(Persona::QA), "#111");
    }

    #[test]
    fn stage_color_falls_back_to_neutral() {
        let mut stages = IndexMap::new();
        stages.insert(Stage::from("Dev Blocked"), "#FF5252".to_string());
        let palette = Palette::new(IndexMap::new(), stages, "#eee".into());
        assert_eq!(palette.stage_color("Dev Blocked"), "#FF5252");
        assert_eq!(palette.stage_color("Somewhere"), "#eee");
    }

    #[test]
    fn solid_style_format() {
        assert_eq!(solid_style("#00C853"), "background:#00C853;color:#fff;");
    }
}
