use std::fs;

use comma_core::{load_config, CommaConfig, CommaError, DecimalSeparator};

#[test]
fn empty_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("comma.yaml");
    fs::write(&path, "\n").expect("write config");
    let config = load_config(&path).expect("load");
    assert_eq!(config, CommaConfig::default());
    assert_eq!(config.files.delimiter, ';');
    assert_eq!(config.vocabulary.actions.len(), 10);
}

#[test]
fn partial_overrides_keep_remaining_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("comma.yaml");
    fs::write(
        &path,
        "vocabulary:\n  statuses: [mh, ph]\nfiles:\n  decimal: comma\nremote:\n  timeout_secs: 10\n",
    )
    .expect("write config");
    let config = load_config(&path).expect("load");
    assert_eq!(config.vocabulary.statuses, vec!["mh", "ph"]);
    assert_eq!(config.vocabulary.lockdown_policies.len(), 4);
    assert_eq!(config.files.decimal, DecimalSeparator::Comma);
    assert_eq!(config.files.params_individual, "params_individual.json");
    assert_eq!(config.remote.timeout_secs, Some(10));
    assert!(config.remote.tests_url.ends_with("data-rivm/tests/"));
}

#[test]
fn non_ascii_delimiter_is_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("comma.yaml");
    fs::write(&path, "files:\n  delimiter: \"§\"\n").expect("write config");
    let err = load_config(&path).expect_err("bad delimiter");
    assert!(matches!(err, CommaError::Serde(_)));
    assert_eq!(err.info().code, "comma_core.delimiter");
}

#[test]
fn ascii_delimiter_override_is_kept() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("comma.yaml");
    fs::write(&path, "files:\n  delimiter: \",\"\n").expect("write config");
    let config = load_config(&path).expect("load");
    assert_eq!(config.files.delimiter_byte().expect("ascii"), b',');
}

#[test]
fn missing_config_is_io_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let err = load_config(&dir.path().join("absent.yaml")).expect_err("missing file");
    assert!(matches!(err, CommaError::Io(_)));
}

#[test]
fn malformed_config_is_serde_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("comma.yaml");
    fs::write(&path, "files:\n  decimal: sideways\n").expect("write config");
    let err = load_config(&path).expect_err("bad enum");
    assert!(matches!(err, CommaError::Serde(_)));
}

#[test]
fn decimal_separators_parse_their_own_format() {
    assert_eq!(DecimalSeparator::Point.parse("0.25"), Some(0.25));
    assert_eq!(DecimalSeparator::Point.parse("0,25"), None);
    assert_eq!(DecimalSeparator::Comma.parse(" 0,25 "), Some(0.25));
    assert_eq!(DecimalSeparator::Comma.parse("0.25"), None);
    assert_eq!(DecimalSeparator::Comma.format(1.5), "1,5");
    assert_eq!(DecimalSeparator::Point.format(0.0), "0");
}
