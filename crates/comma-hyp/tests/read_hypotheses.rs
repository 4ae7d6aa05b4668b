use std::path::PathBuf;

use comma_core::vocabulary::{HypothesisKind, ACTIONS};
use comma_core::{CommaConfig, CommaError};
use comma_hyp::read_hypotheses;

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(relative)
}

fn policies() -> Vec<String> {
    ["absent", "easy", "medium", "hard"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

#[test]
fn actions_effects_are_sorted_and_projected() {
    let config = CommaConfig::default();
    let matrices = read_hypotheses(
        &fixture_path("parameters"),
        HypothesisKind::Actions,
        "mh",
        &policies(),
        &config,
    )
    .expect("load");
    assert_eq!(matrices.len(), 4);

    let medium = &matrices["medium"];
    assert_eq!(medium.actions, ACTIONS.to_vec());
    assert_eq!(medium.columns[0], "baseline");
    assert_eq!(medium.ncols(), 25);
    assert_eq!(medium.value("work_from_home", "gender_f"), Some(-0.12));
    assert_eq!(medium.value("socialise_online", "age_group__1"), Some(0.27));
    assert_eq!(medium.value("socialise_online", "baseline"), Some(0.5));
}

#[test]
fn lockdown_columns_are_lower_cased() {
    let matrices = read_hypotheses(
        &fixture_path("parameters"),
        HypothesisKind::Lockdown,
        "",
        &policies(),
        &CommaConfig::default(),
    )
    .expect("load");
    let easy = &matrices["easy"];
    assert_eq!(easy.columns[0], "baseline");
    assert_eq!(easy.value("maintain_physical_distance", "baseline"), Some(0.1));
    assert!(matrices
        .values()
        .all(|m| m.nrows() == 10 && m.ncols() == easy.ncols()));
}

#[test]
fn unknown_policy_is_not_found() {
    let err = read_hypotheses(
        &fixture_path("parameters"),
        HypothesisKind::Lockdown,
        "",
        &["extreme".to_string()],
        &CommaConfig::default(),
    )
    .expect_err("missing");
    assert!(matches!(err, CommaError::NotFound(_)));
    assert_eq!(err.info().context.get("policy").map(String::as_str), Some("extreme"));
}
