//! Error types for workflow configuration
//!
//! Configuration is validated once at load time. Anything wrong with the
//! tables surfaces here, never at render time.

use crate::config::ConfigFormat;
use crate::types::Stage;
use std::path::PathBuf;

/// Errors while loading or validating a workflow configuration
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension does not map to a known format
    #[error("unsupported configuration format: '{0}'")]
    UnsupportedFormat(String),

    /// Parser rejected the document
    #[error("syntax error in {format} configuration: {message}")]
    Syntax { format: ConfigFormat, message: String },

    /// Tables reference stages outside the canonical set, or are otherwise inconsistent
    #[error("data integrity violation ({} issue(s)): {}", .0.len(), render_issues(.0))]
    DataIntegrity(Vec<IntegrityIssue>),
}

impl WorkflowError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create syntax error for format
    pub fn syntax(format: ConfigFormat, message: impl ToString) -> Self {
        Self::Syntax {
            format,
            message: message.to_string(),
        }
    }

    /// Integrity issues, if this is a data integrity failure
    #[must_use]
    pub fn issues(&self) -> &[IntegrityIssue] {
        match self {
            Self::DataIntegrity(issues) => issues,
            _ => &[],
        }
    }
}

/// Single data-authoring defect found during validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityIssue {
    /// No stages declared
    #[error("canonical stage set is empty")]
    EmptyStageSet,

    /// Stage declared twice
    #[error("stage '{0}' is declared more than once")]
    DuplicateStage(Stage),

    /// A table names a stage that is not declared
    #[error("{table} references unknown stage '{stage}'")]
    UnknownStage { table: String, stage: Stage },

    /// A stage lists itself as a transition target
    #[error("{table}: stage '{stage}' targets itself")]
    SelfTransition { table: &'static str, stage: Stage },
}

impl IntegrityIssue {
    pub(crate) fn unknown(table: impl Into<String>, stage: &Stage) -> Self {
        Self::UnknownStage {
            table: table.into(),
            stage: stage.clone(),
        }
    }
}

fn render_issues(issues: &[IntegrityIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
