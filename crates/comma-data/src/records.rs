//! Daily RIVM test files: gzip-compressed, comma-delimited CSV with a header row.

use std::io::{Read, Write};

use chrono::NaiveDate;
use comma_core::errors::{CommaError, ErrorInfo};
use csv::{ReaderBuilder, WriterBuilder};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// One row of a daily test file: tests per security region and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    #[serde(rename = "Version")]
    pub version: i64,
    #[serde(rename = "Date_of_report")]
    pub date_of_report: String,
    #[serde(rename = "Date_of_statistics")]
    pub date_of_statistics: NaiveDate,
    #[serde(rename = "Security_region_code")]
    pub security_region_code: String,
    #[serde(rename = "Security_region_name")]
    pub security_region_name: String,
    #[serde(rename = "Tested_with_result")]
    pub tested_with_result: Option<i64>,
    #[serde(rename = "Tested_positive")]
    pub tested_positive: Option<i64>,
}

fn record_error(code: &str, source: &str, err: impl ToString) -> CommaError {
    CommaError::Serde(
        ErrorInfo::new(code, format!("failed to decode test file {source}"))
            .with_context("source", source)
            .with_hint(err.to_string()),
    )
}

/// Decodes a test file body. Gzip bodies are inflated; anything else is read as plain CSV.
pub fn decode_test_file(body: &[u8], source: &str) -> Result<Vec<TestRecord>, CommaError> {
    let reader: Box<dyn Read + '_> = if body.starts_with(&GZIP_MAGIC) {
        Box::new(GzDecoder::new(body))
    } else {
        Box::new(body)
    };
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .has_headers(true)
        .from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let record: TestRecord = row.map_err(|err| record_error("comma_data.record", source, err))?;
        records.push(record);
    }
    Ok(records)
}

/// Writes records as comma-delimited CSV with the source column names.
pub fn write_records<W: Write>(records: &[TestRecord], out: W) -> Result<(), CommaError> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);
    for record in records {
        writer
            .serialize(record)
            .map_err(|err| record_error("comma_data.record_write", "output", err))?;
    }
    writer
        .flush()
        .map_err(|err| CommaError::Io(ErrorInfo::new("comma_data.record_flush", err.to_string())))
}
