use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VALEO: &str = "\
Valeo Service Deutschland
Invoice 695123456
Invoice date: 12.05.2024
Currency: EUR
Our p/n Your p/n Description
WIPER BLADE KIT 600MM
574145
85124000
12,50 300,00
24
FR
Recap
Packing list
Parcel N° Valeo Material N Quantity
12345-Z-H01-02
574145 24
";

const NGK: &str = "\
Niterra EMEA GmbH (NGK SPARK PLUGS)
Invoice No. 7100456789
Date 08.07.2024
100234 BKR6E Spark plug EUR 2,35 10 ST 23,50
";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn invline(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("invline").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

fn config_path(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, "{}").unwrap();
    path
}

#[test]
fn test_process_csv() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "valeo.txt", VALEO);

    invline(&config_path(&dir))
        .args(["process", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Item,Qty,UoM,Unit Price,Amount,VAT"))
        .stdout(predicate::str::contains("574145,24,PC,12.50,300.00,"));
}

#[test]
fn test_process_json() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "ngk.txt", NGK);

    invline(&config_path(&dir))
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"supplier\": \"ngk\""))
        .stdout(predicate::str::contains("\"Invoice Number\": \"7100456789\""))
        .stdout(predicate::str::contains("\"Item\": \"BKR6E\""));
}

#[test]
fn test_process_vendor_override() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "ngk.txt", NGK);

    invline(&config_path(&dir))
        .args(["process", "--vendor", "bosch", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Supplier: Bosch"))
        .stderr(predicate::str::contains("no line items parsed"));
}

#[test]
fn test_process_unknown_vendor() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "ngk.txt", NGK);

    invline(&config_path(&dir))
        .args(["process", "--vendor", "acme"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown supplier"));
}

#[test]
fn test_process_missing_file() {
    let dir = TempDir::new().unwrap();

    invline(&config_path(&dir))
        .arg("process")
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_packing() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "valeo.txt", VALEO);

    invline(&config_path(&dir))
        .args(["process", "--packing", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parcel N°,Valeo Material N,Quantity"))
        .stdout(predicate::str::contains("12345-Z-H01-02,574145,24"));
}

#[test]
fn test_process_raw() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "ngk.txt", NGK);

    invline(&config_path(&dir))
        .args(["process", "--raw"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("100234 BKR6E Spark plug"));
}

#[test]
fn test_detect() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "valeo.txt", VALEO);

    invline(&config_path(&dir))
        .arg("detect")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("valeo\tValeo"));
}

#[test]
fn test_batch_summary() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a_valeo.txt", VALEO);
    write(&dir, "b_ngk.txt", NGK);
    write(&dir, "c_blank.txt", "   \n");
    let out = dir.path().join("out");
    let pattern = dir.path().join("*.txt");

    invline(&config_path(&dir))
        .args(["batch", "--summary", "--format", "csv", "--output-dir"])
        .arg(&out)
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files"));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,supplier"));
    assert!(summary.contains("a_valeo.txt,success,valeo,695123456"));
    assert!(summary.contains("b_ngk.txt,success,ngk,7100456789"));
    assert!(summary.contains("c_blank.txt,error"));

    assert!(out.join("a_valeo.csv").exists());
    assert!(out.join("a_valeo_header.csv").exists());
    assert!(out.join("a_valeo_packing.csv").exists());
    assert!(!out.join("c_blank.csv").exists());

    let combined = fs::read_to_string(out.join("all_items.csv")).unwrap();
    assert!(combined.starts_with("Source File,Item,Qty,UoM,Unit Price,Amount,VAT"));
    assert!(combined.contains("a_valeo.txt,574145,24,PC,12.50,300.00,"));
    assert!(combined.contains("b_ngk.txt,BKR6E,10,ST,2.35,23.50,"));
    assert!(!combined.contains("c_blank.txt"));
}

#[test]
fn test_batch_continues_past_write_failure() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a_valeo.txt", VALEO);
    write(&dir, "b_ngk.txt", NGK);
    let out = dir.path().join("out");
    // A directory where the output file should go makes the write fail.
    fs::create_dir_all(out.join("a_valeo.csv")).unwrap();
    let pattern = dir.path().join("*.txt");

    invline(&config_path(&dir))
        .args(["batch", "--summary", "--format", "csv", "--output-dir"])
        .arg(&out)
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("a_valeo.txt,error,valeo"));
    assert!(summary.contains("output not written"));
    assert!(summary.contains("b_ngk.txt,success,ngk"));
    assert!(out.join("b_ngk.csv").exists());
}

#[test]
fn test_batch_no_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("*.pdf");

    invline(&config_path(&dir))
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");

    invline(&config).args(["config", "init"]).assert().success();
    assert!(config.exists());

    invline(&config)
        .args(["config", "get", "extraction.valeo_dedupe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));

    invline(&config)
        .args(["config", "set", "extraction.valeo_dedupe", "true"])
        .assert()
        .success();

    invline(&config)
        .args(["config", "get", "extraction.valeo_dedupe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));

    invline(&config)
        .args(["config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure();

    invline(&config).args(["config", "init"]).assert().failure();
}
