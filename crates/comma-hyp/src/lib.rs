//! Hypothesis matrices for the comma behavioural simulation: feature
//! encoding, schema validation, cross-file consistency, empty templates and
//! loading for downstream use.

mod consistency;
mod features;
mod hypotheses;
pub mod matrix;
mod template;
mod validate;

pub use consistency::{
    check_consistency, discover_family, inspect_consistency, ConsistencyReport, Drift, FileDrift,
};
pub use features::{
    classify_attribute, encode_features, load_feature_spec, one_hot_features, AttributeEncoding,
};
pub use hypotheses::read_hypotheses;
pub use matrix::{CellIssue, ParameterMatrix, RawTable};
pub use template::{create_empty_hypotheses, empty_hypothesis, TemplateLayout};
pub use validate::{
    inspect_param_dir, required_features, validate_param_file, FileIssue, ValidationReport,
};
