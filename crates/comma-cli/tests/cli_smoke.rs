use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(relative)
}

fn run_comma<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_comma");
    Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("comma command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn dir_with_spec() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::copy(
        fixture_path("parameters/params_individual.json"),
        dir.path().join("params_individual.json"),
    )
    .expect("copy spec");
    dir
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn validate_accepts_fixture_directory() {
    let output = run_comma(["validate", "--dir", &path_arg(&fixture_path("parameters"))]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("8 hypothesis files valid"));
}

#[test]
fn validate_json_lists_missing_files_and_fails() {
    let dir = dir_with_spec();
    let output = run_comma(["validate", "--dir", &path_arg(dir.path()), "--json"]);
    assert!(!output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("report json");
    let missing = report["missing_files"].as_array().expect("missing_files");
    assert_eq!(missing.len(), 8);
    assert_eq!(missing[0], "actions_effects_on_mh_absent.csv");
}

#[test]
fn init_per_policy_then_validate_succeeds() {
    let dir = dir_with_spec();
    let init = run_comma(["init", "--dir", &path_arg(dir.path()), "--per-policy"]);
    assert_success(&init);
    assert_eq!(stdout_lines(&init).len(), 9);
    assert!(dir.path().join("actions_effects_on_mh.csv").is_file());

    assert_success(&run_comma(["validate", "--dir", &path_arg(dir.path())]));
    assert_success(&run_comma(["check-consistency", "--dir", &path_arg(dir.path())]));
}

#[test]
fn standard_init_is_not_enough_for_validation() {
    let dir = dir_with_spec();
    assert_success(&run_comma(["init", "--dir", &path_arg(dir.path())]));
    let output = run_comma(["validate", "--dir", &path_arg(dir.path())]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("actions_effects_on_mh_absent.csv"));
}

#[test]
fn features_prints_one_name_per_line() {
    let output = run_comma(["features", "--dir", &path_arg(&fixture_path("parameters"))]);
    assert_success(&output);
    assert_eq!(stdout_lines(&output).len(), 24);
}

#[test]
fn filter_dates_reads_listing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let listing = dir.path().join("listing.txt");
    fs::write(
        &listing,
        "data/rivm_2020-11-11.csv\n\ndata/rivm_2020-11-12.csv\ndata/rivm_2020-11-13.csv\nREADME.md\n",
    )
    .expect("write listing");
    let output = run_comma([
        "filter-dates",
        "--listing",
        &path_arg(&listing),
        "--start",
        "2020-11-12",
        "--end",
        "2020-11-13",
    ]);
    assert_success(&output);
    assert_eq!(
        stdout_lines(&output),
        vec!["data/rivm_2020-11-12.csv", "data/rivm_2020-11-13.csv"]
    );

    let outside = run_comma([
        "filter-dates",
        "--listing",
        &path_arg(&listing),
        "--start",
        "2020-11-01",
        "--end",
        "2020-11-13",
    ]);
    assert!(!outside.status.success());
}
