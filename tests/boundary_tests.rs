use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_boundary_numerical_values() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("boundary_test.csv");
    let mut wtr = csv::Writer::from_path(&input).unwrap();
    wtr.write_record(["type", "account", "items", "amount", "method"])
        .unwrap();
    wtr.write_record(["topup", "acct-65535", "", "1000000.0000", "card"])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("bookpay"));
    cmd.arg("replay")
        .arg(&input)
        .arg("--catalog")
        .arg("tests/fixtures/catalog.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("account,balance"))
        .stdout(predicate::str::contains("acct-65535,1000000"));
}

#[test]
fn test_extreme_decimal_precision() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("precision_test.csv");
    let mut wtr = csv::Writer::from_path(&input).unwrap();
    wtr.write_record(["type", "account", "items", "amount", "method"])
        .unwrap();
    wtr.write_record(["topup", "1", "", "0.0001", ""]).unwrap();
    wtr.write_record(["topup", "1", "", "0.0001", ""]).unwrap();
    wtr.write_record(["debit", "1", "", "0.00005", ""]).unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("bookpay"));
    cmd.arg("replay")
        .arg(&input)
        .arg("--catalog")
        .arg("tests/fixtures/catalog.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,0.00015"));
}

#[test]
fn test_debit_of_exact_balance_reaches_zero() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("exact_test.csv");
    let mut wtr = csv::Writer::from_path(&input).unwrap();
    wtr.write_record(["type", "account", "items", "amount", "method"])
        .unwrap();
    wtr.write_record(["topup", "1", "", "33.00", ""]).unwrap();
    // 2 * 12.50 + 8.00 is exactly the balance
    wtr.write_record(["order", "1", "b1:2|b2:1", "", ""]).unwrap();
    wtr.write_record(["debit", "1", "", "0.01", ""]).unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("bookpay"));
    cmd.arg("replay")
        .arg(&input)
        .arg("--catalog")
        .arg("tests/fixtures/catalog.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,0"))
        .stderr(predicate::str::contains("Insufficient funds"));
}
