//! Structured error types shared across the dpv crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`DpvError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        for (key, value) in &self.context {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Canonical error type for the dpv crates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum DpvError {
    /// Input table errors (missing columns, shape mismatches, absent rows).
    #[error("table error: {0}")]
    Table(ErrorInfo),
    /// Chart construction or drawing errors.
    #[error("chart error: {0}")]
    Chart(ErrorInfo),
    /// Export and filesystem errors.
    #[error("export error: {0}")]
    Export(ErrorInfo),
}

impl DpvError {
    /// Builds a [`DpvError::Table`] from a code and message.
    pub fn table(code: impl Into<String>, message: impl Into<String>) -> Self {
        DpvError::Table(ErrorInfo::new(code, message))
    }

    /// Builds a [`DpvError::Chart`] from a code and message.
    pub fn chart(code: impl Into<String>, message: impl Into<String>) -> Self {
        DpvError::Chart(ErrorInfo::new(code, message))
    }

    /// Builds a [`DpvError::Export`] from a code and message.
    pub fn export(code: impl Into<String>, message: impl Into<String>) -> Self {
        DpvError::Export(ErrorInfo::new(code, message))
    }

    /// Returns the structured payload carried by the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            DpvError::Table(info) | DpvError::Chart(info) | DpvError::Export(info) => info,
        }
    }
}
