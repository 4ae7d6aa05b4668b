//! Cross-file consistency of a hypothesis family.
//!
//! Downstream the simulation multiplies these matrices together, so every
//! `lockdown*` and `actions*` CSV of a directory must agree with the first
//! one discovered on column count, row count, column names, column order and
//! action labels.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use comma_core::errors::{CommaError, ErrorInfo};
use comma_core::CommaConfig;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use tracing::{debug, info};

use crate::matrix::RawTable;

/// One way a file departs from the reference file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Drift {
    ColumnCount { expected: usize, found: usize },
    RowCount { expected: usize, found: usize },
    ColumnNames { missing: Vec<String>, additional: Vec<String> },
    /// Same names, different order; `indices` lists every differing position.
    ColumnOrder { indices: Vec<usize> },
    Actions { missing: Vec<String>, additional: Vec<String> },
    /// The file could not be parsed as a hypothesis table at all.
    Unreadable { reason: String },
}

impl Drift {
    /// First index at which column order diverges, for order drift.
    pub fn first_divergence(&self) -> Option<usize> {
        match self {
            Drift::ColumnOrder { indices } => indices.first().copied(),
            _ => None,
        }
    }
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Drift::ColumnCount { expected, found } => write!(
                f,
                "has a different number of columns (expected {expected}, found {found})"
            ),
            Drift::RowCount { expected, found } => write!(
                f,
                "has a different number of rows (expected {expected}, found {found})"
            ),
            Drift::ColumnNames {
                missing,
                additional,
            } => write!(
                f,
                "has different column names. Missing: {missing:?}. Additional: {additional:?}"
            ),
            Drift::ColumnOrder { indices } => write!(
                f,
                "has different column order at indices: {indices:?} (first divergence at index {})",
                indices.first().copied().unwrap_or_default()
            ),
            Drift::Actions {
                missing,
                additional,
            } => write!(
                f,
                "has different 'actions' entries. Missing: {missing:?}. Additional: {additional:?}"
            ),
            Drift::Unreadable { reason } => write!(f, "could not be read: {reason}"),
        }
    }
}

/// Drifts recorded for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDrift {
    pub file: String,
    pub drifts: Vec<Drift>,
}

/// Outcome of comparing a hypothesis family against its first member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub reference: String,
    pub compared: Vec<String>,
    pub drifts: Vec<FileDrift>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.drifts.is_empty()
    }

    pub fn render(&self) -> String {
        let mut lines = vec![format!("Inconsistent with reference {}:", self.reference)];
        for file in &self.drifts {
            for drift in &file.drifts {
                lines.push(format!("{} {drift}", file.file));
            }
        }
        lines.join("\n")
    }
}

fn family_globs() -> Result<GlobSet, CommaError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in ["lockdown*.csv", "actions*.csv"] {
        let glob = Glob::new(pattern).map_err(|err| {
            CommaError::Serde(ErrorInfo::new("comma_hyp.glob", err.to_string()))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|err| CommaError::Serde(ErrorInfo::new("comma_hyp.glob", err.to_string())))
}

/// Lists the `lockdown*.csv` and `actions*.csv` files of `dir`, sorted by name.
pub fn discover_family(dir: &Path) -> Result<Vec<PathBuf>, CommaError> {
    let globs = family_globs()?;
    let entries = fs::read_dir(dir).map_err(|err| CommaError::io("comma_hyp.read_dir", dir, err))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| CommaError::io("comma_hyp.read_dir", dir, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name() {
            if globs.is_match(Path::new(name)) {
                paths.push(path);
            }
        }
    }
    paths.sort();
    Ok(paths)
}

fn ordered_difference(left: &[String], right: &BTreeSet<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    left.iter()
        .filter(|item| !right.contains(*item) && seen.insert((*item).clone()))
        .cloned()
        .collect()
}

fn compare(reference: &RawTable, other: &RawTable) -> Vec<Drift> {
    let ref_columns = reference.lowercase_headers();
    let columns = other.lowercase_headers();
    let mut drifts = Vec::new();

    if columns.len() != ref_columns.len() {
        drifts.push(Drift::ColumnCount {
            expected: ref_columns.len(),
            found: columns.len(),
        });
    }
    if other.rows.len() != reference.rows.len() {
        drifts.push(Drift::RowCount {
            expected: reference.rows.len(),
            found: other.rows.len(),
        });
    }

    let ref_set: BTreeSet<String> = ref_columns.iter().cloned().collect();
    let set: BTreeSet<String> = columns.iter().cloned().collect();
    if ref_set != set {
        drifts.push(Drift::ColumnNames {
            missing: ordered_difference(&ref_columns, &set),
            additional: ordered_difference(&columns, &ref_set),
        });
    } else if columns != ref_columns {
        let indices = columns
            .iter()
            .zip(&ref_columns)
            .enumerate()
            .filter(|(_, (col, base))| col != base)
            .map(|(idx, _)| idx)
            .collect();
        drifts.push(Drift::ColumnOrder { indices });
    }

    let ref_actions = reference.action_labels();
    let actions = other.action_labels();
    let ref_action_set: BTreeSet<String> = ref_actions.iter().cloned().collect();
    let action_set: BTreeSet<String> = actions.iter().cloned().collect();
    if ref_action_set != action_set {
        drifts.push(Drift::Actions {
            missing: ordered_difference(&ref_actions, &action_set),
            additional: ordered_difference(&actions, &ref_action_set),
        });
    }
    drifts
}

/// Compares every family member of `dir` with the first one and reports all drifts.
///
/// Only an unreadable reference file aborts; unreadable members are recorded
/// as [`Drift::Unreadable`].
pub fn inspect_consistency(dir: &Path, config: &CommaConfig) -> Result<ConsistencyReport, CommaError> {
    let paths = discover_family(dir)?;
    let Some((first, rest)) = paths.split_first() else {
        let shown = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        return Err(CommaError::NotFound(
            ErrorInfo::new(
                "comma_hyp.no_family",
                format!("No CSV files found in the directory '{}'.", shown.display()),
            )
            .with_hint("expected lockdown*.csv or actions*.csv files"),
        ));
    };
    let reference = RawTable::read(first, &config.files)?;
    let mut report = ConsistencyReport {
        reference: reference.file_name(),
        compared: Vec::new(),
        drifts: Vec::new(),
    };
    for path in rest {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let drifts = match RawTable::read(path, &config.files) {
            Ok(table) => compare(&reference, &table),
            Err(err) => vec![Drift::Unreadable {
                reason: err.to_string(),
            }],
        };
        debug!(file = %file, drifts = drifts.len(), "compared against reference");
        report.compared.push(file.clone());
        if !drifts.is_empty() {
            report.drifts.push(FileDrift { file, drifts });
        }
    }
    Ok(report)
}

/// Fails with a schema error describing every drift when the family is inconsistent.
pub fn check_consistency(dir: &Path, config: &CommaConfig) -> Result<ConsistencyReport, CommaError> {
    let report = inspect_consistency(dir, config)?;
    if report.is_consistent() {
        info!(
            reference = %report.reference,
            compared = report.compared.len(),
            "hypothesis family is consistent"
        );
        return Ok(report);
    }
    let first_divergence = report
        .drifts
        .iter()
        .flat_map(|file| file.drifts.iter())
        .find_map(Drift::first_divergence);
    let mut info = ErrorInfo::new("comma_hyp.inconsistent_family", report.render())
        .with_context("reference", report.reference.clone())
        .with_context("files", report.drifts.len().to_string());
    if let Some(index) = first_divergence {
        info = info.with_context("first_divergence", index.to_string());
    }
    Err(CommaError::Schema(info))
}
