//! YAML-configurable settings for the hypothesis and calibration tools.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CommaError, ErrorInfo};
use crate::serde::from_yaml_slice;
use crate::vocabulary::{Vocabulary, PARAMS_INDIVIDUAL};

/// Default location of the daily RIVM test files.
pub const DEFAULT_TESTS_URL: &str = "https://github.com/mzelst/covid-19/raw/master/data-rivm/tests/";

/// Top-level configuration. Every field has a default, so an empty YAML
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommaConfig {
    /// Recognised labels.
    #[serde(default)]
    pub vocabulary: Vocabulary,
    /// Parameter directory file conventions.
    #[serde(default)]
    pub files: FileLayout,
    /// Remote test data endpoints.
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Decimal separator used by numeric cells of hypothesis files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalSeparator {
    /// `0.5`
    #[default]
    Point,
    /// `0,5`
    Comma,
}

impl DecimalSeparator {
    /// Parses a numeric cell, tolerating surrounding whitespace.
    pub fn parse(&self, cell: &str) -> Option<f64> {
        let trimmed = cell.trim();
        match self {
            DecimalSeparator::Point => trimmed.parse().ok(),
            DecimalSeparator::Comma => {
                if trimmed.contains('.') {
                    return None;
                }
                trimmed.replace(',', ".").parse().ok()
            }
        }
    }

    /// Renders a value with this separator.
    pub fn format(&self, value: f64) -> String {
        let rendered = value.to_string();
        match self {
            DecimalSeparator::Point => rendered,
            DecimalSeparator::Comma => rendered.replace('.', ","),
        }
    }
}

/// File conventions of a parameter directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLayout {
    /// Name of the individual-parameter attribute file.
    #[serde(default = "FileLayout::default_params_individual")]
    pub params_individual: String,
    /// Field delimiter of hypothesis CSV files.
    #[serde(default = "FileLayout::default_delimiter")]
    pub delimiter: char,
    /// Decimal separator of numeric cells.
    #[serde(default)]
    pub decimal: DecimalSeparator,
}

impl FileLayout {
    fn default_params_individual() -> String {
        PARAMS_INDIVIDUAL.to_string()
    }
    fn default_delimiter() -> char {
        ';'
    }

    /// Delimiter as the single byte expected by CSV readers.
    ///
    /// Fails for non-ASCII characters and for quote or line-break characters.
    pub fn delimiter_byte(&self) -> Result<u8, CommaError> {
        match self.delimiter {
            '"' | '\n' | '\r' => {}
            ch if ch.is_ascii() => return Ok(ch as u8),
            _ => {}
        }
        Err(CommaError::Serde(
            ErrorInfo::new(
                "comma_core.delimiter",
                format!("unsupported CSV delimiter {:?}", self.delimiter),
            )
            .with_hint("files.delimiter must be a single ASCII character such as ';'"),
        ))
    }
}

impl Default for FileLayout {
    fn default() -> Self {
        Self {
            params_individual: Self::default_params_individual(),
            delimiter: Self::default_delimiter(),
            decimal: DecimalSeparator::default(),
        }
    }
}

/// Remote source of epidemiological test data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Directory endpoint used both for the listing and as download base.
    #[serde(default = "RemoteConfig::default_tests_url")]
    pub tests_url: String,
    /// Request timeout; `None` keeps the HTTP client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl RemoteConfig {
    fn default_tests_url() -> String {
        DEFAULT_TESTS_URL.to_string()
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            tests_url: Self::default_tests_url(),
            timeout_secs: None,
        }
    }
}

/// Loads a configuration from the provided YAML path.
pub fn load_config(path: &Path) -> Result<CommaConfig, CommaError> {
    let bytes = fs::read(path).map_err(|err| CommaError::io("comma_core.config_read", path, err))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(CommaConfig::default());
    }
    let config: CommaConfig = from_yaml_slice(&bytes)?;
    config.files.delimiter_byte()?;
    Ok(config)
}
