//! E2E tests for the calculate, vat and schema commands

use std::process::Command;

/// The reference example: income 30000, flat-rate standard, no children
#[test]
fn calculate_reference_example() {
    let output = Command::new("cargo")
        .args(["run", "--", "calculate", "--income", "30000"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("DPFO TYPE B TAX RETURN (2024)"));
    assert!(stdout.contains("Expenses (flat-rate 60%): €18000.00"));
    assert!(stdout.contains("Tax base: €12000.00"));
    assert!(stdout.contains("Total yearly: €5424.00"));
    assert!(stdout.contains("Final tax: €266.25"));
    assert!(stdout.contains("TO PAY: €266.25"));
}

#[test]
fn calculate_json_output() {
    let output = Command::new("cargo")
        .args(["run", "--", "calculate", "--income", "30000", "--json"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("\"income\""));
    assert!(stdout.contains("\"insurance\""));
    assert!(stdout.contains("\"expense_method\": \"flat_rate\""));
    assert!(stdout.contains("\"final_tax\": \"266.25\""));
}

#[test]
fn calculate_from_json_input_file() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "calculate",
            "--input",
            "tests/data/full_return.json",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    // Two children: bonus 3360 clamps the final tax to zero,
    // advances of 100 become a refund
    assert!(stdout.contains("Child tax bonus: €3360.00"));
    assert!(stdout.contains("Final tax: €0.00"));
    assert!(stdout.contains("TO REFUND: €100.00"));
}

#[test]
fn calculate_rejects_unsupported_year() {
    let output = Command::new("cargo")
        .args(["run", "--", "calculate", "--income", "30000", "--year", "2023"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported tax year: 2023"));
}

#[test]
fn vat_standard_breakdown() {
    let output = Command::new("cargo")
        .args(["run", "--", "vat", "--amount", "1000"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("VAT (20%)"));
    assert!(stdout.contains("VAT: €200.00"));
    assert!(stdout.contains("Total with VAT: €1200.00"));
}

#[test]
fn schema_prints_input_schema() {
    let output = Command::new("cargo")
        .args(["run", "--", "schema"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("\"income\""));
    assert!(stdout.contains("\"use_flat_rate\""));
    assert!(stdout.contains("\"profession\""));
}
