//! JSON and YAML decoding for attribute files and configuration, and
//! key-sorted JSON for printed reports.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{CommaError, ErrorInfo};

fn serde_error(code: &str, err: impl ToString) -> CommaError {
    CommaError::Serde(ErrorInfo::new(code, err.to_string()))
}

// Objects are rebuilt in key order; `preserve_order` would otherwise keep
// struct field order.
fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|left, right| left.0.cmp(&right.0));
            for (key, mut nested) in entries {
                sort_keys(&mut nested);
                map.insert(key, nested);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// Compact JSON with every object's keys sorted, so reports such as
/// `comma validate --json` print identically across runs.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CommaError> {
    let mut value =
        serde_json::to_value(value).map_err(|err| serde_error("comma_core.json_encode", err))?;
    sort_keys(&mut value);
    serde_json::to_vec(&value).map_err(|err| serde_error("comma_core.json_write", err))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, CommaError> {
    serde_json::from_slice(data).map_err(|err| serde_error("comma_core.json_decode", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, CommaError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("comma_core.yaml_decode", err))
}
