//! Workflow configuration (the board's file format)
//!
//! [`WorkflowConfig`] is the raw, unvalidated structure as authored in YAML,
//! JSON or TOML. It becomes a usable [`Workflow`](crate::Workflow) only through
//! [`WorkflowConfig::validate`].
//!
//! All tables preserve authoring order: column order, button order and the
//! canonical stage order are all taken from the document.

use crate::error::WorkflowError;
use crate::types::{Persona, Stage};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Fallback owner color when the table has no `Default` entry
pub const DEFAULT_OWNER_COLOR: &str = "#BDBDBD";

/// Fallback card color for stages without an explicit color
pub const DEFAULT_NEUTRAL_CARD_COLOR: &str = "#eee";

const BUNDLED_WORKFLOW: &str = include_str!("../config/default_workflow.yaml");

/// Persona → stage → target → decoration
pub type OverrideTable = IndexMap<Persona, IndexMap<Stage, IndexMap<Stage, OptionOverride>>>;

/// Persona → column name → stages rolled into the column
pub type ColumnTable = IndexMap<Persona, IndexMap<String, Vec<Stage>>>;

/// Per-persona decoration for a single transition button
///
/// Every field is optional; missing fields fall back to graph-derived values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionOverride {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub style: Option<String>,
    pub autofocus: Option<bool>,
}

/// Button glyphs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Glyphs {
    /// Generic forward glyph
    pub advance: String,
    /// Generic backward glyph
    pub backtrack: String,
    /// Backward glyph used when a persona override owns the option set
    pub backtrack_override: String,
    /// Forward glyphs special-cased by target stage
    pub special: IndexMap<Stage, String>,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            advance: "➡️".to_string(),
            backtrack: "⬅️".to_string(),
            backtrack_override: "🔙".to_string(),
            special: IndexMap::new(),
        }
    }
}

/// Unvalidated workflow tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Canonical stage set, in display order
    pub stages: Vec<Stage>,
    /// Stage new tickets are created in
    #[serde(default = "default_initial_stage")]
    pub initial_stage: Stage,
    /// Advance edges
    #[serde(default)]
    pub forward: IndexMap<Stage, Vec<Stage>>,
    /// Correction edges
    #[serde(default)]
    pub backtrack: IndexMap<Stage, Vec<Stage>>,
    /// Owning persona per stage
    #[serde(default)]
    pub owners: IndexMap<Stage, Persona>,
    /// Header/button color per owner
    #[serde(default)]
    pub owner_colors: IndexMap<Persona, String>,
    /// Card color per stage
    #[serde(default)]
    pub stage_colors: IndexMap<Stage, String>,
    /// Card color for stages missing from `stage_colors`
    #[serde(default = "default_neutral_card_color")]
    pub neutral_card_color: String,
    /// Column layout per persona
    #[serde(default)]
    pub columns: ColumnTable,
    /// Advance button overrides
    #[serde(default)]
    pub advance_overrides: OverrideTable,
    /// Backtrack overrides; an entry replaces the default target list
    #[serde(default)]
    pub backtrack_overrides: OverrideTable,
    /// Button glyphs
    #[serde(default)]
    pub glyphs: Glyphs,
}

fn default_initial_stage() -> Stage {
    Stage::from("Backlog")
}

fn default_neutral_card_color() -> String {
    DEFAULT_NEUTRAL_CARD_COLOR.to_string()
}

/// Supported configuration encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension
    ///
    /// # Errors
    /// `WorkflowError::UnsupportedFormat` for anything but yaml/yml/json/toml.
    pub fn from_path(path: &Path) -> Result<Self, WorkflowError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(WorkflowError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        })
    }
}

impl WorkflowConfig {
    /// Parse a document in the given format
    ///
    /// # Errors
    /// `WorkflowError::Syntax` if the document does not match the schema.
    pub fn parse(source: &str, format: ConfigFormat) -> Result<Self, WorkflowError> {
        match format {
            ConfigFormat::Yaml => {
                serde_yaml::from_str(source).map_err(|e| WorkflowError::syntax(format, e))
            }
            ConfigFormat::Json => {
                serde_json::from_str(source).map_err(|e| WorkflowError::syntax(format, e))
            }
            ConfigFormat::Toml => {
                toml::from_str(source).map_err(|e| WorkflowError::syntax(format, e))
            }
        }
    }

    /// Parse YAML
    ///
    /// # Errors
    /// See [`WorkflowConfig::parse`].
    #[inline]
    pub fn from_yaml_str(source: &str) -> Result<Self, WorkflowError> {
        Self::parse(source, ConfigFormat::Yaml)
    }

    /// Parse JSON
    ///
    /// # Errors
    /// See [`WorkflowConfig::parse`].
    #[inline]
    pub fn from_json_str(source: &str) -> Result<Self, WorkflowError> {
        Self::parse(source, ConfigFormat::Json)
    }

    /// Parse TOML
    ///
    /// # Errors
    /// See [`WorkflowConfig::parse`].
    #[inline]
    pub fn from_toml_str(source: &str) -> Result<Self, WorkflowError> {
        Self::parse(source, ConfigFormat::Toml)
    }

    /// Read and parse a configuration file, format chosen by extension
    ///
    /// # Errors
    /// IO, format detection and syntax errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkflowError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let source =
            std::fs::read_to_string(path).map_err(|e| WorkflowError::io_error(path, e))?;
        tracing::debug!(path = %path.display(), %format, "loading workflow configuration");
        Self::parse(&source, format)
    }

    /// The production workflow shipped with this crate
    ///
    /// # Errors
    /// Only if the bundled document is malformed.
    pub fn bundled() -> Result<Self, WorkflowError> {
        Self::from_yaml_str(BUNDLED_WORKFLOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_parses() {
        let config = WorkflowConfig::bundled().unwrap();
        assert_eq!(config.stages.len(), 23);
        assert_eq!(config.initial_stage, "Backlog");
        assert_eq!(config.columns.len(), 4);
        assert!(config.advance_overrides.is_empty());
    }

    #[test]
    fn bundled_column_order_is_preserved() {
        let config = WorkflowConfig::bundled().unwrap();
        let qa: Vec<&str> = config.columns[&Persona::QA]
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            qa,
            ["Incoming", "Ready for Scratch Org Test", "Ready for QA", "In QA", "In UAT"]
        );
    }

    #[test]
    fn minimal_document_uses_defaults() {
        let config = WorkflowConfig::from_yaml_str("stages: [Backlog, Done]\n").unwrap();
        assert_eq!(config.initial_stage, "Backlog");
        assert_eq!(config.neutral_card_color, DEFAULT_NEUTRAL_CARD_COLOR);
        assert_eq!(config.glyphs, Glyphs::default());
        assert!(config.forward.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = WorkflowConfig::from_yaml_str("stages: [A]\ntransitions: {}\n").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Syntax {
                format: ConfigFormat::Yaml,
                ..
            }
        ));
    }

    #[test]
    fn override_fields_are_optional() {
        let yaml = r#"
stages: [Backlog, Active Scoping]
advance_overrides:
  Client:
    Backlog:
      Active Scoping: { label: "Start" }
"#;
        let config = WorkflowConfig::from_yaml_str(yaml).unwrap();
        let entry = &config.advance_overrides[&Persona::Client]["Backlog"]["Active Scoping"];
        assert_eq!(entry.label.as_deref(), Some("Start"));
        assert_eq!(entry.icon, None);
        assert_eq!(entry.autofocus, None);
    }

    #[test]
    fn json_and_toml_are_accepted() {
        let json = r#"{"stages": ["A", "B"], "forward": {"A": ["B"]}}"#;
        let config = WorkflowConfig::from_json_str(json).unwrap();
        assert_eq!(config.forward["A"], vec![Stage::from("B")]);

        let toml = "stages = [\"A\", \"B\"]\ninitial_stage = \"A\"\n\n[forward]\nA = [\"B\"]\n";
        let config = WorkflowConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.initial_stage, "A");
        assert_eq!(config.forward["A"], vec![Stage::from("B")]);
    }

    #[test]
    fn format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("board.YML")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("board.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("board.ini")),
            Err(WorkflowError::UnsupportedFormat(_))
        ));
    }
}
