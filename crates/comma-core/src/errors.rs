//! Structured error types shared across comma crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and location of a failure; every [`CommaError`] variant carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Dotted code owned by the emitting crate, e.g. `comma_hyp.missing_files`.
    pub code: String,
    /// Diagnostic text; for aggregated checks, the full rendered report.
    pub message: String,
    /// Where the failure happened: file paths, URLs, date windows, counts.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// What the user can change to get past the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records one `key=value` location entry; a repeated key overwrites.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the hypothesis and calibration tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum CommaError {
    /// A required file is absent.
    #[error("not found: {0}")]
    NotFound(ErrorInfo),
    /// A requested date window cannot be satisfied by the available data.
    #[error("range error: {0}")]
    Range(ErrorInfo),
    /// Hypothesis files disagree with the expected schema or with each other.
    #[error("schema mismatch: {0}")]
    Schema(ErrorInfo),
    /// Remote listing or download failed or returned an unexpected payload.
    #[error("fetch error: {0}")]
    Fetch(ErrorInfo),
    /// Decoding or encoding of JSON, YAML or CSV payloads failed.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " | context: [{}]", pairs.join(", "))?;
        }
        match &self.hint {
            Some(hint) => write!(f, " | hint: {hint}"),
            None => Ok(()),
        }
    }
}

impl CommaError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            CommaError::NotFound(info)
            | CommaError::Range(info)
            | CommaError::Schema(info)
            | CommaError::Fetch(info)
            | CommaError::Serde(info)
            | CommaError::Io(info) => info,
        }
    }

    /// Builds an [`CommaError::Io`] tagged with the offending path.
    pub fn io(code: &str, path: &std::path::Path, err: impl ToString) -> Self {
        CommaError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
