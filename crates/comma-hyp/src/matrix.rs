//! Reading and writing of hypothesis matrices.
//!
//! A hypothesis file is a delimited table whose `actions` column labels the
//! rows and whose remaining columns (`baseline` followed by feature columns)
//! hold coefficients. [`RawTable`] keeps the file exactly as read, which is
//! what schema and consistency checks need; [`ParameterMatrix`] is the parsed
//! numeric form handed to the simulation.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use comma_core::errors::{CommaError, ErrorInfo};
use comma_core::vocabulary::ACTIONS_COLUMN;
use comma_core::{DecimalSeparator, FileLayout};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;

fn wrap_csv(code: &str, path: &Path, err: csv::Error) -> CommaError {
    CommaError::Serde(
        ErrorInfo::new(code, "hypothesis CSV failure")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

/// Hypothesis file as read from disk, without any interpretation of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Reads a delimited file with a header row.
    pub fn read(path: &Path, layout: &FileLayout) -> Result<Self, CommaError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(layout.delimiter_byte()?)
            .has_headers(true)
            .from_path(path)
            .map_err(|err| wrap_csv("comma_hyp.csv_open", path, err))?;
        let headers = reader
            .headers()
            .map_err(|err| wrap_csv("comma_hyp.csv_header", path, err))?
            .iter()
            .map(|h| h.to_string())
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| wrap_csv("comma_hyp.csv_record", path, err))?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    /// File name component of the source path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Header labels folded to lower case, in file order.
    pub fn lowercase_headers(&self) -> Vec<String> {
        self.headers.iter().map(|h| h.to_lowercase()).collect()
    }

    /// Case-insensitive lookup of a column position.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.headers.iter().position(|h| h.to_lowercase() == wanted)
    }

    /// Cells of the `actions` column, or an empty list when the column is absent.
    pub fn action_labels(&self) -> Vec<String> {
        match self.column_index(ACTIONS_COLUMN) {
            Some(idx) => self
                .rows
                .iter()
                .filter_map(|row| row.get(idx).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every non-`actions` cell that does not parse as a number under `decimal`.
    pub fn invalid_cells(&self, decimal: DecimalSeparator) -> Vec<CellIssue> {
        let actions_idx = self.column_index(ACTIONS_COLUMN);
        let mut issues = Vec::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            let label = actions_idx
                .and_then(|idx| row.get(idx))
                .cloned()
                .unwrap_or_default();
            for (col_idx, cell) in row.iter().enumerate() {
                if Some(col_idx) == actions_idx {
                    continue;
                }
                if decimal.parse(cell).is_none() {
                    issues.push(CellIssue {
                        row: row_idx + 1,
                        action: label.clone(),
                        column: self.headers.get(col_idx).cloned().unwrap_or_default(),
                        value: cell.clone(),
                    });
                }
            }
        }
        issues
    }
}

/// A cell that could not be read as a coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellIssue {
    /// One-based data row number (the header is row zero).
    pub row: usize,
    /// Label found in the `actions` column of that row.
    pub action: String,
    pub column: String,
    pub value: String,
}

impl std::fmt::Display for CellIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {} ({}), column {}: '{}'",
            self.row, self.action, self.column, self.value
        )
    }
}

/// Numeric hypothesis matrix: rows keyed by action, columns by feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterMatrix {
    /// Column labels, excluding the `actions` key column.
    pub columns: Vec<String>,
    /// Row labels.
    pub actions: Vec<String>,
    /// Row-major coefficients, `values[row][column]`.
    pub values: Vec<Vec<f64>>,
}

impl ParameterMatrix {
    /// All-zero matrix with the given row and column labels.
    pub fn zeros(actions: &[String], columns: &[String]) -> Self {
        Self {
            columns: columns.to_vec(),
            actions: actions.to_vec(),
            values: vec![vec![0.0; columns.len()]; actions.len()],
        }
    }

    /// Parses every coefficient of `table`.
    ///
    /// Fails with a schema error listing every unparseable cell, or when the
    /// table has no `actions` column.
    pub fn from_table(table: &RawTable, decimal: DecimalSeparator) -> Result<Self, CommaError> {
        let Some(actions_idx) = table.column_index(ACTIONS_COLUMN) else {
            return Err(CommaError::Schema(
                ErrorInfo::new(
                    "comma_hyp.actions_column",
                    format!("{} has no '{ACTIONS_COLUMN}' column", table.file_name()),
                )
                .with_context("path", table.path.display().to_string()),
            ));
        };
        let invalid = table.invalid_cells(decimal);
        if !invalid.is_empty() {
            let listed: Vec<String> = invalid.iter().map(|issue| issue.to_string()).collect();
            return Err(CommaError::Schema(
                ErrorInfo::new(
                    "comma_hyp.invalid_values",
                    format!("{} - {}", table.file_name(), listed.join(", ")),
                )
                .with_context("path", table.path.display().to_string()),
            ));
        }
        let columns = table
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != actions_idx)
            .map(|(_, name)| name.clone())
            .collect();
        let mut actions = Vec::with_capacity(table.rows.len());
        let mut values = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            actions.push(row.get(actions_idx).cloned().unwrap_or_default());
            values.push(
                row.iter()
                    .enumerate()
                    .filter(|(idx, _)| *idx != actions_idx)
                    .filter_map(|(_, cell)| decimal.parse(cell))
                    .collect(),
            );
        }
        Ok(Self {
            columns,
            actions,
            values,
        })
    }

    /// Reads and parses a hypothesis file.
    pub fn read(path: &Path, layout: &FileLayout) -> Result<Self, CommaError> {
        let table = RawTable::read(path, layout)?;
        Self::from_table(&table, layout.decimal)
    }

    /// Writes the matrix with the `actions` key column first and no index column.
    pub fn write(&self, path: &Path, layout: &FileLayout) -> Result<(), CommaError> {
        let file = File::create(path).map_err(|err| CommaError::io("comma_hyp.write", path, err))?;
        let mut writer = WriterBuilder::new()
            .delimiter(layout.delimiter_byte()?)
            .from_writer(BufWriter::new(file));
        let mut header = vec![ACTIONS_COLUMN.to_string()];
        header.extend(self.columns.iter().cloned());
        writer
            .write_record(&header)
            .map_err(|err| wrap_csv("comma_hyp.csv_write_header", path, err))?;
        for (action, row) in self.actions.iter().zip(&self.values) {
            let mut record = vec![action.clone()];
            record.extend(row.iter().map(|value| layout.decimal.format(*value)));
            writer
                .write_record(&record)
                .map_err(|err| wrap_csv("comma_hyp.csv_write_row", path, err))?;
        }
        writer
            .flush()
            .map_err(|err| CommaError::io("comma_hyp.write", path, err))
    }

    pub fn nrows(&self) -> usize {
        self.actions.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Coefficient for `action` under `column` (case-insensitive column match).
    pub fn value(&self, action: &str, column: &str) -> Option<f64> {
        let col = self.column_position(column)?;
        let row = self.actions.iter().position(|a| a == action)?;
        self.values.get(row).and_then(|r| r.get(col)).copied()
    }

    fn column_position(&self, column: &str) -> Option<usize> {
        let wanted = column.to_lowercase();
        self.columns.iter().position(|c| c.to_lowercase() == wanted)
    }

    /// Folds every column label to lower case.
    pub fn lowercase_columns(mut self) -> Self {
        for column in &mut self.columns {
            *column = column.to_lowercase();
        }
        self
    }

    /// Stable reorder of rows by `rank`; rows without a rank keep their
    /// relative order after all ranked rows.
    pub fn sort_rows_by<F>(mut self, rank: F) -> Self
    where
        F: Fn(&str) -> Option<usize>,
    {
        let mut order: Vec<usize> = (0..self.actions.len()).collect();
        order.sort_by_key(|&idx| rank(&self.actions[idx]).unwrap_or(usize::MAX));
        self.actions = order.iter().map(|&idx| self.actions[idx].clone()).collect();
        self.values = order.iter().map(|&idx| self.values[idx].clone()).collect();
        self
    }

    /// Projects the matrix onto `names`, in that order.
    ///
    /// Fails with a schema error naming every requested column that is absent.
    pub fn select_columns(&self, names: &[String]) -> Result<Self, CommaError> {
        let mut positions = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_position(name) {
                Some(pos) => positions.push(pos),
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(CommaError::Schema(
                ErrorInfo::new(
                    "comma_hyp.select_columns",
                    format!("missing columns: {}", missing.join(", ")),
                )
                .with_context("missing", missing.len().to_string()),
            ));
        }
        Ok(Self {
            columns: positions.iter().map(|&pos| self.columns[pos].clone()).collect(),
            actions: self.actions.clone(),
            values: self
                .values
                .iter()
                .map(|row| positions.iter().map(|&pos| row[pos]).collect())
                .collect(),
        })
    }
}
