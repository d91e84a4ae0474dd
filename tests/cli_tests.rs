//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn calibrate(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("calibrate-config"));
    cmd.current_dir(dir);
    cmd
}

fn write_inputs(dir: &Path, config: &Value, csv: &str) {
    fs::write(dir.join("config.json"), serde_json::to_string(config).expect("serialize"))
        .expect("write config");
    fs::write(dir.join("calibration.csv"), csv).expect("write calibration");
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read output")).expect("parse output")
}

#[test]
fn test_cli_version() {
    let tmp = TempDir::new().expect("tmp");
    calibrate(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("calibrate-config"));
}

#[test]
fn test_cli_help() {
    let tmp = TempDir::new().expect("tmp");
    calibrate(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Apply calibration values"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn test_apply_updates_region_field() {
    let tmp = TempDir::new().expect("tmp");
    write_inputs(
        tmp.path(),
        &json!({"regions": {"A": {"full_fill_percent": 10}}}),
        ",A\nfull_fill_percent,55.5\n",
    );

    calibrate(tmp.path())
        .args(["apply", "--fields", "full_fill_percent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated A.full_fill_percent: 10 -> 55.5"))
        .stdout(predicate::str::contains("Successfully wrote updated configuration to output.json"));

    assert_eq!(
        read_json(&tmp.path().join("output.json")),
        json!({"regions": {"A": {"full_fill_percent": 55.5}}})
    );
}

#[test]
fn test_apply_leaves_input_file_untouched() {
    let tmp = TempDir::new().expect("tmp");
    write_inputs(
        tmp.path(),
        &json!({"regions": {"A": {"full_fill_percent": 10}}}),
        ",A\nfull_fill_percent,55.5\n",
    );
    let before = fs::read_to_string(tmp.path().join("config.json")).expect("read config");

    calibrate(tmp.path()).arg("apply").assert().success();

    let after = fs::read_to_string(tmp.path().join("config.json")).expect("read config");
    assert_eq!(before, after);
}

#[test]
fn test_apply_without_table_row_changes_nothing() {
    let tmp = TempDir::new().expect("tmp");
    let config = json!({"regions": {"A": {"full_fill_percent": 10}}});
    write_inputs(tmp.path(), &config, ",A\nempty_fill_percent,5\n");

    calibrate(tmp.path())
        .args(["apply", "--fields", "full_fill_percent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated").not());

    assert_eq!(read_json(&tmp.path().join("output.json")), config);
}

#[test]
fn test_apply_skips_non_numeric_cells() {
    let tmp = TempDir::new().expect("tmp");
    let config = json!({"regions": {"A": {"full_fill_percent": 10}, "B": {"full_fill_percent": 20}}});
    write_inputs(tmp.path(), &config, ",A,B\nfull_fill_percent,N/A,30\n");

    calibrate(tmp.path()).arg("apply").assert().success();

    assert_eq!(
        read_json(&tmp.path().join("output.json")),
        json!({"regions": {"A": {"full_fill_percent": 10}, "B": {"full_fill_percent": 30.0}}})
    );
}

#[test]
fn test_apply_without_regions_warns_and_succeeds() {
    let tmp = TempDir::new().expect("tmp");
    let config = json!({"components": [{"name": "camera"}]});
    write_inputs(tmp.path(), &config, ",A\nfull_fill_percent,55.5\n");

    calibrate(tmp.path())
        .arg("apply")
        .assert()
        .success()
        .stderr(predicate::str::contains("No 'regions' section found in configuration"));

    assert_eq!(read_json(&tmp.path().join("output.json")), config);
}

#[test]
fn test_apply_warns_on_field_missing_from_region() {
    let tmp = TempDir::new().expect("tmp");
    let config = json!({"regions": {"A": {"other": 1}}});
    write_inputs(tmp.path(), &config, ",A\nfull_fill_percent,55.5\n");

    calibrate(tmp.path())
        .arg("apply")
        .assert()
        .success()
        .stderr(predicate::str::contains("Field 'full_fill_percent' not found in region 'A'"));

    assert_eq!(read_json(&tmp.path().join("output.json")), config);
}

#[test]
fn test_apply_requires_existing_inputs() {
    let tmp = TempDir::new().expect("tmp");
    calibrate(tmp.path())
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found: config.json"));

    fs::write(tmp.path().join("config.json"), "{}").expect("write config");
    calibrate(tmp.path())
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Calibration file not found: calibration.csv"));
}

#[test]
fn test_apply_rejects_malformed_config() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("config.json"), "{\"regions\": {").expect("write config");
    fs::write(tmp.path().join("calibration.csv"), ",A\nfull_fill_percent,1\n").expect("write csv");

    calibrate(tmp.path())
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading configuration"));
    assert!(!tmp.path().join("output.json").exists());
}

#[test]
fn test_apply_is_idempotent() {
    let tmp = TempDir::new().expect("tmp");
    write_inputs(
        tmp.path(),
        &json!({"regions": {"A": {"full_fill_percent": 10, "brightness_threshold": 100}}}),
        ",A\nfull_fill_percent,55.5\nbrightness_threshold,128\n",
    );

    calibrate(tmp.path()).arg("apply").assert().success();
    let first = fs::read_to_string(tmp.path().join("output.json")).expect("read first");

    calibrate(tmp.path())
        .args(["apply", "--config", "output.json", "--output", "second.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated").not());
    let second = fs::read_to_string(tmp.path().join("second.json")).expect("read second");

    assert_eq!(first, second);
}

#[test]
fn test_apply_pretty_output_and_dry_run() {
    let tmp = TempDir::new().expect("tmp");
    write_inputs(
        tmp.path(),
        &json!({"regions": {"A": {"full_fill_percent": 10}}}),
        ",A\nfull_fill_percent,55.5\n",
    );

    calibrate(tmp.path())
        .args(["apply", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run: 1 value(s) would change"));
    assert!(!tmp.path().join("output.json").exists());

    calibrate(tmp.path()).args(["apply", "--pretty"]).assert().success();
    let written = fs::read_to_string(tmp.path().join("output.json")).expect("read output");
    assert!(written.starts_with("{\n  \"regions\": {\n    \"A\""));
}

#[test]
fn test_apply_with_named_label_column_and_report() {
    let tmp = TempDir::new().expect("tmp");
    write_inputs(
        tmp.path(),
        &json!({"regions": {"A": {"full_fill_percent": 10}, "B": {"full_fill_percent": 20}}}),
        "A,metric,B\n55.5,full_fill_percent,60\n",
    );

    calibrate(tmp.path())
        .args([
            "apply",
            "--label-column",
            "metric",
            "--report",
            "report.json",
            "--no-timestamp",
        ])
        .assert()
        .success();

    let report = read_json(&tmp.path().join("report.json"));
    assert!(report.get("generated_at").is_none());
    assert_eq!(report["changes"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["table"]["cells_recorded"], json!(2));
    assert_eq!(report["inputs"]["output"], json!("output.json"));
}

#[test]
fn test_apply_rejects_unknown_label_column() {
    let tmp = TempDir::new().expect("tmp");
    write_inputs(tmp.path(), &json!({"regions": {}}), "A,B\n1,2\n");

    calibrate(tmp.path())
        .args(["apply", "--label-column", "metric"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Label column 'metric' not found"));
}

#[test]
fn test_apply_uses_discovered_settings() {
    let tmp = TempDir::new().expect("tmp");
    write_inputs(
        tmp.path(),
        &json!({"regions": {"A": {"full_fill_percent": 10, "brightness_threshold": 100}}}),
        ",A\nfull_fill_percent,55.5\nbrightness_threshold,128\n",
    );
    fs::write(tmp.path().join("calibrate.toml"), "fields = ['brightness_threshold']\n")
        .expect("write settings");

    calibrate(tmp.path()).arg("apply").assert().success();

    assert_eq!(
        read_json(&tmp.path().join("output.json")),
        json!({"regions": {"A": {"full_fill_percent": 10, "brightness_threshold": 128.0}}})
    );
}

#[test]
fn test_apply_yaml_document() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("machine.yaml"), "regions:\n  A:\n    full_fill_percent: 10\n")
        .expect("write yaml");
    fs::write(tmp.path().join("calibration.csv"), ",A\nfull_fill_percent,55.5\n")
        .expect("write csv");

    calibrate(tmp.path())
        .args(["apply", "--config", "machine.yaml", "--output", "out/machine.yaml"])
        .assert()
        .success();

    let written = fs::read_to_string(tmp.path().join("out/machine.yaml")).expect("read yaml");
    assert!(written.contains("full_fill_percent: 55.5"));
}

#[test]
fn test_info_summarizes_inputs() {
    let tmp = TempDir::new().expect("tmp");
    write_inputs(
        tmp.path(),
        &json!({"regions": {"A": {"full_fill_percent": 10}, "B": {"empty_fill_percent": 1}}}),
        ",A,B\nfull_fill_percent,55.5,N/A\n,1,2\n",
    );

    calibrate(tmp.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Regions (2): A, B"))
        .stdout(predicate::str::contains("Fields (1): full_fill_percent"))
        .stdout(predicate::str::contains("Rows skipped (no label): 1"))
        .stdout(predicate::str::contains("full_fill_percent: 1 value(s) in table, 1 applicable"))
        .stdout(predicate::str::contains("Pending changes: 1"));
    assert!(!tmp.path().join("output.json").exists());
}

#[test]
fn test_apply_with_empty_calibration_table_is_a_no_op() {
    let tmp = TempDir::new().expect("tmp");
    let config = json!({"regions": {"A": {"full_fill_percent": 10}}});
    write_inputs(tmp.path(), &config, "");

    calibrate(tmp.path())
        .arg("apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated").not())
        .stderr(predicate::str::contains("is empty"));

    assert_eq!(read_json(&tmp.path().join("output.json")), config);
}
