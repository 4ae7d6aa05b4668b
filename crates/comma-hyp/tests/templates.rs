use std::fs;
use std::path::PathBuf;

use comma_core::vocabulary::ACTIONS;
use comma_core::{CommaConfig, CommaError};
use comma_hyp::{
    check_consistency, create_empty_hypotheses, validate_param_file, ParameterMatrix,
    TemplateLayout,
};

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(relative)
}

fn dir_with_spec() -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("tmp dir");
    fs::copy(
        fixture_path("parameters/params_individual.json"),
        temp.path().join("params_individual.json"),
    )
    .expect("copy spec");
    temp
}

#[test]
fn standard_layout_writes_one_file_per_tier_and_status() {
    let dir = dir_with_spec();
    let config = CommaConfig::default();
    let written =
        create_empty_hypotheses(dir.path(), &config, TemplateLayout::Standard).expect("create");
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().expect("name").to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "lockdown_absent.csv",
            "lockdown_easy.csv",
            "lockdown_medium.csv",
            "lockdown_hard.csv",
            "actions_effects_on_mh.csv",
        ]
    );

    let text = fs::read_to_string(dir.path().join("lockdown_easy.csv")).expect("read");
    let mut lines = text.lines();
    let header = lines.next().expect("header");
    assert!(header.starts_with("actions;baseline;age_group__1;age_group__2"));
    assert!(header.ends_with("critical_job_no;critical_job_yes"));
    assert_eq!(
        lines.next().expect("first row"),
        format!("work_from_home{}", ";0".repeat(25))
    );

    let matrix = ParameterMatrix::read(&dir.path().join("actions_effects_on_mh.csv"), &config.files)
        .expect("parse");
    assert_eq!(matrix.actions, ACTIONS.to_vec());
    assert_eq!(matrix.ncols(), 25);
    assert!(matrix.values.iter().flatten().all(|v| *v == 0.0));
}

#[test]
fn per_policy_layout_passes_validation() {
    let dir = dir_with_spec();
    let config = CommaConfig::default();
    let written =
        create_empty_hypotheses(dir.path(), &config, TemplateLayout::PerPolicy).expect("create");
    assert_eq!(written.len(), 9);
    validate_param_file(dir.path(), &config).expect("templates validate");
    check_consistency(dir.path(), &config).expect("templates consistent");
}

#[test]
fn missing_attribute_file_is_not_found() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let err = create_empty_hypotheses(dir.path(), &CommaConfig::default(), TemplateLayout::Standard)
        .expect_err("no spec");
    assert!(matches!(err, CommaError::NotFound(_)));
    assert!(fs::read_dir(dir.path()).expect("list").next().is_none());
}
