use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("bookpay"));
    cmd.arg("replay")
        .arg("tests/fixtures/commands.csv")
        .arg("--catalog")
        .arg("tests/fixtures/catalog.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("account,balance"))
        // 100 - (2 * 12.50 + 8.00) - 0.5; the sold-out order is rejected
        .stdout(predicate::str::contains("1,66.5"))
        // The 12.50 debit is refused, the order stays pending, the credit lands
        .stdout(predicate::str::contains("2,15"))
        .stderr(predicate::str::contains("Error processing command"))
        .stderr(predicate::str::contains("failed to process debit"));

    Ok(())
}

#[test]
fn test_cli_requires_a_catalog() {
    let mut cmd = Command::new(cargo_bin!("bookpay"));
    cmd.env_remove("BOOK_SERVICE_URL")
        .arg("replay")
        .arg("tests/fixtures/commands.csv");

    cmd.assert().failure();
}

#[test]
fn test_cli_missing_input_file() {
    let mut cmd = Command::new(cargo_bin!("bookpay"));
    cmd.arg("replay")
        .arg("tests/fixtures/does_not_exist.csv")
        .arg("--catalog")
        .arg("tests/fixtures/catalog.csv");

    cmd.assert().failure();
}
