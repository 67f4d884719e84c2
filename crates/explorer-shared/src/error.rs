//! Error types for the explorer core.
//!
//! Gateway failures degrade into data at every call site, so `GatewayError`
//! carries the marker text that stands in for a stage's output. The other
//! errors are terminal.

use std::path::PathBuf;
use thiserror::Error;

/// Prefix of the text that replaces a stage output when the model call fails.
pub const ERROR_MARKER_PREFIX: &str = "ERROR: ";

/// Any failure reaching the model: transport, auth, timeout, provider error,
/// malformed response. Subtypes are deliberately not distinguished.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Text that takes the place of the failed stage's output.
    pub fn marker(&self) -> String {
        format!("{}{}", ERROR_MARKER_PREFIX, self.message)
    }
}

/// Invalid perturbation catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no categories")]
    Empty,

    #[error("category name must not be blank")]
    BlankName,

    #[error("category '{0}' appears more than once")]
    DuplicateCategory(String),

    #[error("category '{0}' has no lenses")]
    NoLenses(String),
}

/// Invalid closed count range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("range minimum must be at least 1, got {0}")]
    ZeroMinimum(usize),

    #[error("range minimum {min} exceeds maximum {max}")]
    Inverted { min: usize, max: usize },
}

/// Misconfigured perturbation count. Never swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamplingError {
    #[error("requested {requested} perturbation categories but the catalog only has {available}")]
    TooManyCategories { requested: usize, available: usize },
}

/// Write or publish failure. `Incomplete` and `Publish` both mean the local
/// transcript exists and a later step failed.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("transcript written to {written} but {path} failed: {reason}")]
    Incomplete {
        written: PathBuf,
        path: PathBuf,
        reason: String,
    },

    #[error("transcript written to {written} but publishing failed: {reason}")]
    Publish { written: PathBuf, reason: String },
}

impl PersistenceError {
    /// Location of the transcript that did get written, if any.
    pub fn written(&self) -> Option<&PathBuf> {
        match self {
            PersistenceError::Write { .. } => None,
            PersistenceError::Incomplete { written, .. }
            | PersistenceError::Publish { written, .. } => Some(written),
        }
    }
}
