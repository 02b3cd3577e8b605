//! Error types for the editor

use std::fmt;
use thiserror::Error;

/// What kind of entity a name lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Section,
    Component,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Section => f.write_str("Section"),
            EntityKind::Component => f.write_str("Component"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown component variant: {0}")]
    UnknownVariant(String),

    #[error("Name already in use: {0}")]
    DuplicateName(String),

    #[error("Component {component} does not support {edit}")]
    UnsupportedEdit {
        component: String,
        edit: &'static str,
    },

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Selection has no insertion target")]
    NoInsertionTarget,
}

impl EditorError {
    pub(crate) fn section_not_found(name: &str) -> Self {
        EditorError::NotFound {
            kind: EntityKind::Section,
            name: name.to_string(),
        }
    }

    pub(crate) fn component_not_found(name: &str) -> Self {
        EditorError::NotFound {
            kind: EntityKind::Component,
            name: name.to_string(),
        }
    }

    /// True for name lookup misses of either kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, EditorError::NotFound { .. })
    }
}

/// Errors raised while loading an [`EditorConfig`](crate::EditorConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EditorResult<T> = Result<T, EditorError>;
