#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: top up and place an order
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "type, account, items, amount, method").unwrap();
    writeln!(csv1, "topup, 1, , 100.0, card").unwrap();
    writeln!(csv1, "order, 1, b1:1, , ").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("bookpay"));
    cmd1.arg("replay")
        .arg(csv1.path())
        .arg("--catalog")
        .arg("tests/fixtures/catalog.csv")
        .arg("--db-path")
        .arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("1,87.5"));

    // 2. Second run: another top-up against the same DB path
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "type, account, items, amount, method").unwrap();
    writeln!(csv2, "topup, 1, , 50.0, card").unwrap();

    let mut cmd2 = Command::new(cargo_bin!("bookpay"));
    cmd2.arg("replay")
        .arg(csv2.path())
        .arg("--catalog")
        .arg("tests/fixtures/catalog.csv")
        .arg("--db-path")
        .arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    // Should have recovered 87.5 and added 50.0 = 137.5
    assert!(stdout2.contains("1,137.5"));
}
