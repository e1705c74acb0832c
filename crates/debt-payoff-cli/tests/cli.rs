use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const PLAN_REQUEST: &str = r#"{
    "debts": [
        {"debt_id": 1, "name": "Car loan", "current_balance": 1500, "interest_rate": 3, "minimum_payment": 60},
        {"debt_id": 2, "name": "Credit card", "current_balance": 9000, "interest_rate": 27.99, "minimum_payment": 270}
    ],
    "extra_payment": 200,
    "strategy": "snowball"
}"#;

const SINGLE_DEBT: &str = r#"{
    "debts": [
        {"debt_id": 1, "name": "Furniture", "current_balance": 1200, "interest_rate": 0, "minimum_payment": 100}
    ],
    "target_months": 6
}"#;

fn payoff() -> Command {
    Command::cargo_bin("payoff").unwrap()
}

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_version() {
    payoff()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("payoff "));
}

#[test]
fn test_plan_from_file_json() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "plan.json", PLAN_REQUEST);
    payoff()
        .args(["plan", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"methodology\": \"Debt Payoff Simulation\""))
        .stdout(predicate::str::contains("\"strategy\": \"snowball\""))
        .stdout(predicate::str::contains("\"debt_payoff_order\""));
}

#[test]
fn test_plan_from_stdin_with_overrides() {
    payoff()
        .args(["plan", "--strategy", "avalanche", "--extra-payment", "0", "--output", "minimal"])
        .write_stdin(PLAN_REQUEST)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d+\n$").unwrap());
}

#[test]
fn test_minimum_only_single_debt_minimal() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "single.json", SINGLE_DEBT);
    payoff()
        .args(["plan", "--input", &input, "--strategy", "minimum-only", "--output", "minimal"])
        .assert()
        .success()
        .stdout("12\n");
}

#[test]
fn test_compare_csv_summary() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "plan.json", PLAN_REQUEST);
    payoff()
        .args(["compare", "--input", &input, "--output", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "strategy,total_months,total_interest_paid,total_amount_paid,first_payoff_month",
        ))
        .stdout(predicate::str::contains("minimum_only,"));
}

#[test]
fn test_compare_minimal_prints_recommendation() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "plan.json", PLAN_REQUEST);
    payoff()
        .args(["compare", "--input", &input, "--output", "minimal"])
        .assert()
        .success()
        .stdout("avalanche\n");
}

#[test]
fn test_plan_csv_schedule_rows() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "single.json", SINGLE_DEBT);
    let output = payoff()
        .args(["plan", "--input", &input, "--output", "csv"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    // Header plus one row per month
    assert_eq!(text.lines().count(), 13);
    assert!(text.lines().next().unwrap().contains("remaining_balance"));
}

#[test]
fn test_target_with_cli_months() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "single.json", SINGLE_DEBT);
    payoff()
        .args(["target", "--input", &input, "--target-months", "24", "--output", "minimal"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_target_uses_config_file_ceiling() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "single.json", SINGLE_DEBT);
    let config = write(&dir, "payoff.toml", "[solver]\nceiling = 25\n");
    payoff()
        .args(["target", "--input", &input, "--config", &config, "--output", "minimal"])
        .assert()
        .success()
        .stdout("25\n");
}

#[test]
fn test_request_config_keeps_unset_file_keys() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "single.json",
        r#"{
            "debts": [
                {"debt_id": 1, "name": "Furniture", "current_balance": 1200, "interest_rate": 0, "minimum_payment": 100}
            ],
            "target_months": 6,
            "config": {"max_months": 360}
        }"#,
    );
    let config = write(&dir, "payoff.toml", "[solver]\nceiling = 25\n");
    payoff()
        .args(["target", "--input", &input, "--config", &config, "--output", "minimal"])
        .assert()
        .success()
        .stdout("25\n");
}

#[test]
fn test_table_output_has_sections() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "plan.json", PLAN_REQUEST);
    payoff()
        .args(["compare", "--input", &input, "--output", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("== avalanche =="))
        .stdout(predicate::str::contains("recommended_strategy"))
        .stdout(predicate::str::contains("Methodology: Debt Payoff Strategy Comparison"));
}

#[test]
fn test_invalid_debt_reports_error() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "bad.json",
        r#"{"debts": [{"debt_id": 9, "name": "Bad", "current_balance": 0, "interest_rate": 5, "minimum_payment": 10}]}"#,
    );
    payoff()
        .args(["plan", "--input", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("debts[9].current_balance"));
}

#[test]
fn test_missing_input_file() {
    payoff()
        .args(["plan", "--input", "/nonexistent/plan.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_invalid_config_file_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "single.json", SINGLE_DEBT);
    let config = write(&dir, "payoff.toml", "max_months = 0\n");
    payoff()
        .args(["plan", "--input", &input, "--config", &config])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.max_months"));
}
