//! Command-line tests for the billscan binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn token(text: &str, left: i32, top: i32) -> Value {
    json!({"text": text, "left": left, "top": top, "width": 40, "height": 14})
}

fn write_dump(dir: &Path, name: &str) -> std::path::PathBuf {
    let dump = json!([{
        "page_no": 1,
        "tokens": [
            token("Masala", 40, 100),
            token("Dosa", 110, 101),
            token("2", 300, 100),
            token("80", 380, 99),
            token("160", 460, 100),
            token("Filter", 40, 140),
            token("Coffee", 110, 140),
            token("3", 300, 141),
            token("30", 380, 140),
            token("90", 460, 140),
            token("Total", 40, 180),
            token("250.00", 460, 181),
        ]
    }]);

    let path = dir.join(name);
    fs::write(&path, dump.to_string()).unwrap();
    path
}

fn billscan(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("billscan").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

#[test]
fn test_extract_json_envelope() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(dir.path(), "bill.json");

    let output = billscan(&dir).arg("extract").arg(&input).output().unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["is_success"], json!(true));
    assert_eq!(value["data"]["total_item_count"], json!(2));
    assert_eq!(value["data"]["final_total_extracted"], json!(250.0));
    assert_eq!(value["data"]["totals_detected_in_text"]["total"], json!(250.0));
}

#[test]
fn test_extract_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(dir.path(), "bill.json");

    billscan(&dir)
        .args(["extract", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "page_no,item_name,item_quantity,item_rate,item_amount",
        ))
        .stdout(predicate::str::contains("1,Masala Dosa,2,80,160"));
}

#[test]
fn test_extract_missing_input() {
    let dir = TempDir::new().unwrap();

    billscan(&dir)
        .args(["extract", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_extract_malformed_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.json");
    fs::write(&input, "{not json").unwrap();

    billscan(&dir).arg("extract").arg(&input).assert().failure();
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    write_dump(dir.path(), "a.json");
    write_dump(dir.path(), "b.json");
    fs::write(dir.path().join("c.json"), "[]x").unwrap();
    let out_dir = dir.path().join("out");

    let pattern = format!("{}/*.json", dir.path().display());
    billscan(&dir)
        .args(["batch", &pattern, "--summary", "--continue-on-error", "-o"])
        .arg(&out_dir)
        .assert()
        .success();

    assert!(out_dir.join("a.json").exists());
    assert!(out_dir.join("b.json").exists());
    assert!(!out_dir.join("c.json").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,pages,item_count,final_total"));
    assert!(summary.contains("a.json,success,1,2,250"));
    assert!(summary.contains("c.json,error"));
}

#[test]
fn test_batch_stops_on_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.json"), "{").unwrap();

    let pattern = format!("{}/*.json", dir.path().display());
    billscan(&dir)
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();

    billscan(&dir)
        .args(["config", "set", "extraction.row_tolerance", "8.5"])
        .assert()
        .success();

    billscan(&dir)
        .args(["config", "get", "extraction.row_tolerance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8.5"));
}

#[test]
fn test_config_set_rejects_invalid_value() {
    let dir = TempDir::new().unwrap();

    billscan(&dir)
        .args(["config", "set", "extraction.row_tolerance", "0"])
        .assert()
        .failure();

    billscan(&dir)
        .args(["config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_file_changes_extraction() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(dir.path(), "bill.json");
    let config_path = dir.path().join("strict.json");
    fs::write(
        &config_path,
        json!({"extraction": {"amount_ceiling": 100}}).to_string(),
    )
    .unwrap();

    let output = billscan(&dir)
        .arg("--config")
        .arg(&config_path)
        .arg("extract")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["data"]["total_item_count"], json!(1));
    assert_eq!(
        value["data"]["pagewise_line_items"][0]["bill_items"][0]["item_name"],
        json!("Filter Coffee")
    );
}
