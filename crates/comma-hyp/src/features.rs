//! One-hot feature encoding of the individual-parameter specification.
//!
//! The attribute file maps each attribute to a nested list whose first
//! element holds the attribute's levels. String levels mark a categorical
//! attribute, expanded to one `attribute_level` column per level; anything
//! else marks a numeric attribute that keeps a single column. Attribute
//! order in the file is the authoritative column order.

use std::fs;
use std::path::Path;

use comma_core::errors::{CommaError, ErrorInfo};
use serde_json::{Map, Value};

/// How an attribute of the attribute file is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeEncoding {
    /// One column per level.
    Categorical(Vec<String>),
    /// Single pass-through column.
    Numeric,
}

fn malformed(attribute: &str, detail: &str) -> CommaError {
    CommaError::Schema(
        ErrorInfo::new(
            "comma_hyp.spec_attribute",
            format!("attribute '{attribute}' {detail}"),
        )
        .with_context("attribute", attribute),
    )
}

/// Classifies a single attribute by the type of its first level.
///
/// A categorical attribute whose level list mixes strings with other values
/// is rejected instead of being silently coerced.
pub fn classify_attribute(name: &str, value: &Value) -> Result<AttributeEncoding, CommaError> {
    let levels = value
        .as_array()
        .and_then(|outer| outer.first())
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(name, "must be a list whose first element is a list of levels"))?;
    let first = levels
        .first()
        .ok_or_else(|| malformed(name, "has an empty level list"))?;
    if !first.is_string() {
        return Ok(AttributeEncoding::Numeric);
    }
    let mut names = Vec::with_capacity(levels.len());
    for level in levels {
        match level.as_str() {
            Some(text) => names.push(text.to_string()),
            None => return Err(malformed(name, "mixes string and non-string levels")),
        }
    }
    Ok(AttributeEncoding::Categorical(names))
}

/// Expands a parsed specification into its ordered feature columns.
pub fn encode_features(spec: &Map<String, Value>) -> Result<Vec<String>, CommaError> {
    let mut features = Vec::new();
    for (name, value) in spec {
        match classify_attribute(name, value)? {
            AttributeEncoding::Categorical(levels) => {
                features.extend(levels.iter().map(|level| format!("{name}_{level}")));
            }
            AttributeEncoding::Numeric => features.push(name.clone()),
        }
    }
    Ok(features)
}

/// Reads the attribute file at `path`. The top level must be a JSON object.
pub fn load_feature_spec(path: &Path) -> Result<Map<String, Value>, CommaError> {
    let bytes = fs::read(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            CommaError::NotFound(
                ErrorInfo::new("comma_hyp.spec_missing", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        } else {
            CommaError::io("comma_hyp.spec_read", path, err)
        }
    })?;
    let value: Value = comma_core::serde::from_json_slice(&bytes)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CommaError::Serde(
            ErrorInfo::new(
                "comma_hyp.spec_shape",
                "individual-parameter specification must be a JSON object",
            )
            .with_context("path", path.display().to_string()),
        )),
    }
}

/// One-hot encoded feature columns of the attribute file at `path`.
pub fn one_hot_features(path: &Path) -> Result<Vec<String>, CommaError> {
    let spec = load_feature_spec(path)?;
    encode_features(&spec)
}
