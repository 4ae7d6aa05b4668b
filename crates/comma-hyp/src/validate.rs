//! Schema validation of a parameter directory.
//!
//! Every expected hypothesis file must exist, carry (case-insensitively) the
//! `actions` and `baseline` columns plus every encoded feature, list every
//! recognised action, and hold numeric coefficients. Problems are collected
//! across all files before anything is reported so a user can fix the whole
//! directory in one pass.

use std::collections::BTreeSet;
use std::path::Path;

use comma_core::errors::{CommaError, ErrorInfo};
use comma_core::vocabulary::{ACTIONS_COLUMN, BASELINE_COLUMN};
use comma_core::CommaConfig;
use serde::Serialize;
use tracing::{debug, info};

use crate::features::one_hot_features;
use crate::matrix::RawTable;

/// Problems found in a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileIssue {
    pub file: String,
    pub items: Vec<String>,
}

impl FileIssue {
    fn render(&self) -> String {
        format!("{} - {}", self.file, self.items.join(", "))
    }
}

/// Aggregated outcome of validating a parameter directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    /// Files checked, in the order they were expected.
    pub checked: Vec<String>,
    pub missing_files: Vec<String>,
    pub unreadable: Vec<FileIssue>,
    pub missing_features: Vec<FileIssue>,
    pub missing_actions: Vec<FileIssue>,
    /// Action labels outside the vocabulary, in file order.
    pub unexpected_actions: Vec<FileIssue>,
    pub invalid_values: Vec<FileIssue>,
}

impl ValidationReport {
    /// True when no problem of any kind was recorded.
    pub fn is_clean(&self) -> bool {
        self.missing_files.is_empty()
            && self.unreadable.is_empty()
            && self.missing_features.is_empty()
            && self.missing_actions.is_empty()
            && self.unexpected_actions.is_empty()
            && self.invalid_values.is_empty()
    }

    /// Renders every recorded problem, one section per category.
    pub fn render(&self) -> String {
        let mut sections = Vec::new();
        if !self.missing_files.is_empty() {
            sections.push(format!(
                "Hypothesis file(s) not found: {}.",
                self.missing_files.join(", ")
            ));
        }
        for (title, issues) in [
            ("Unreadable files", &self.unreadable),
            ("Missing features", &self.missing_features),
            ("Missing actions", &self.missing_actions),
            ("Unexpected actions", &self.unexpected_actions),
            ("Invalid values", &self.invalid_values),
        ] {
            if !issues.is_empty() {
                let lines: Vec<String> = issues.iter().map(FileIssue::render).collect();
                sections.push(format!("{title}:\n{}", lines.join("\n")));
            }
        }
        sections.join("\n")
    }

    /// Converts the report into the caller-facing result.
    ///
    /// Missing files take precedence in the error variant, but the message
    /// always carries the full report.
    pub fn into_result(self) -> Result<(), CommaError> {
        if self.is_clean() {
            return Ok(());
        }
        let message = self.render();
        if self.missing_files.is_empty() {
            let failing: BTreeSet<&str> = self
                .unreadable
                .iter()
                .chain(&self.missing_features)
                .chain(&self.missing_actions)
                .chain(&self.unexpected_actions)
                .chain(&self.invalid_values)
                .map(|issue| issue.file.as_str())
                .collect();
            Err(CommaError::Schema(
                ErrorInfo::new("comma_hyp.schema", message)
                    .with_context("files", failing.len().to_string()),
            ))
        } else {
            Err(CommaError::NotFound(
                ErrorInfo::new("comma_hyp.missing_files", message)
                    .with_context("missing", self.missing_files.len().to_string()),
            ))
        }
    }
}

/// Features every hypothesis file must carry: `actions`, `baseline`, then
/// the encoded features of the attribute file in `dir`.
pub fn required_features(dir: &Path, config: &CommaConfig) -> Result<Vec<String>, CommaError> {
    let spec_path = dir.join(&config.files.params_individual);
    if !spec_path.is_file() {
        return Err(CommaError::NotFound(
            ErrorInfo::new(
                "comma_hyp.spec_missing",
                format!(
                    "'{}' file is missing in the directory '{}'",
                    config.files.params_individual,
                    dir.display()
                ),
            )
            .with_context("path", spec_path.display().to_string()),
        ));
    }
    let mut required = vec![ACTIONS_COLUMN.to_string(), BASELINE_COLUMN.to_string()];
    required.extend(one_hot_features(&spec_path)?);
    Ok(required)
}

/// Inspects `dir` and returns everything wrong with it.
///
/// Only a missing or malformed attribute file aborts early; every
/// per-file problem lands in the report.
pub fn inspect_param_dir(dir: &Path, config: &CommaConfig) -> Result<ValidationReport, CommaError> {
    let required = required_features(dir, config)?;
    let mut report = ValidationReport::default();
    for name in config.vocabulary.expected_files() {
        let path = dir.join(&name);
        report.checked.push(name.clone());
        if !path.is_file() {
            report.missing_files.push(name);
            continue;
        }
        let table = match RawTable::read(&path, &config.files) {
            Ok(table) => table,
            Err(err) => {
                report.unreadable.push(FileIssue {
                    file: name,
                    items: vec![err.to_string()],
                });
                continue;
            }
        };
        debug!(file = %name, rows = table.rows.len(), "checking hypothesis file");

        let present: BTreeSet<String> = table.lowercase_headers().into_iter().collect();
        let missing_features: Vec<String> = required
            .iter()
            .filter(|feature| !present.contains(&feature.to_lowercase()))
            .cloned()
            .collect();
        if !missing_features.is_empty() {
            report.missing_features.push(FileIssue {
                file: name.clone(),
                items: missing_features,
            });
        }

        let file_labels = table.action_labels();
        let labels: BTreeSet<String> = file_labels.iter().cloned().collect();
        let missing_actions: Vec<String> = config
            .vocabulary
            .actions
            .iter()
            .filter(|action| !labels.contains(*action))
            .cloned()
            .collect();
        if !missing_actions.is_empty() {
            report.missing_actions.push(FileIssue {
                file: name.clone(),
                items: missing_actions,
            });
        }
        let known: BTreeSet<&str> = config.vocabulary.actions.iter().map(String::as_str).collect();
        let mut seen = BTreeSet::new();
        let unexpected_actions: Vec<String> = file_labels
            .into_iter()
            .filter(|label| !known.contains(label.as_str()) && seen.insert(label.clone()))
            .collect();
        if !unexpected_actions.is_empty() {
            report.unexpected_actions.push(FileIssue {
                file: name.clone(),
                items: unexpected_actions,
            });
        }

        let invalid = table.invalid_cells(config.files.decimal);
        if !invalid.is_empty() {
            report.invalid_values.push(FileIssue {
                file: name,
                items: invalid.iter().map(|cell| cell.to_string()).collect(),
            });
        }
    }
    Ok(report)
}

/// Validates the hypothesis files of `dir`; success is silent.
pub fn validate_param_file(dir: &Path, config: &CommaConfig) -> Result<(), CommaError> {
    let report = inspect_param_dir(dir, config)?;
    if report.is_clean() {
        info!(dir = %dir.display(), files = report.checked.len(), "parameter directory is valid");
    }
    report.into_result()
}
