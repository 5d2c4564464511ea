//! End-to-end tests driving the cv-evaluator binary

use std::process::{Command, Output};
use tempfile::TempDir;

const SAMPLE_CV: &str = "tests/fixtures/sample_cv.txt";
const JOB: &str = "tests/fixtures/job_description.txt";

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cv-evaluator"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run cv-evaluator")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn cli_text_report() {
    let output = run(&[SAMPLE_CV, "--no-color"]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Score: 79 / 100"), "stdout: {}", out);
    assert!(out.contains("Checks:"));
    assert!(out.contains("Suggestions:"));
}

#[test]
fn cli_json_report() {
    let output = run(&[SAMPLE_CV, "--format", "json", "--keywords", "python,sql,docker"]);
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["score"], 89);
    assert_eq!(value["missingKeywords"], serde_json::json!(["docker"]));
    assert_eq!(value["foundKeywords"], serde_json::json!(["python", "sql", "docker"]));
}

#[test]
fn cli_job_description_keywords() {
    let output = run(&[SAMPLE_CV, "--format", "json", "--job", JOB]);
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let missing: Vec<String> = serde_json::from_value(value["missingKeywords"].clone()).unwrap();
    assert!(missing.contains(&"docker".to_string()));
    assert!(!missing.contains(&"python".to_string()));
}

#[test]
fn cli_markdown_report() {
    let output = run(&[SAMPLE_CV, "--format", "md"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("## CV Evaluation Report"));
}

#[test]
fn cli_show_text() {
    let output = run(&[SAMPLE_CV, "--show-text", "--fail-under", "100"]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Northwind Traders"));
    assert!(!out.contains("Score:"));
}

#[test]
fn cli_fail_under_sets_exit_code() {
    let output = run(&[SAMPLE_CV, "--fail-under", "80"]);
    assert_eq!(output.status.code(), Some(2));
    // report is still printed
    assert!(stdout(&output).contains("Score: 79 / 100"));

    let output = run(&[SAMPLE_CV, "--fail-under", "79"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn cli_missing_file_is_an_error() {
    let output = run(&["tests/fixtures/does_not_exist.pdf"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn cli_invalid_format_is_an_error() {
    let output = run(&[SAMPLE_CV, "--format", "html"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_save_and_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[output]\npretty_json = false\n").unwrap();
    let saved = dir.path().join("reports/cv.json");

    let output = run(&[
        SAMPLE_CV,
        "--format",
        "json",
        "--config",
        config.to_str().unwrap(),
        "--save",
        saved.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0));

    let written = std::fs::read_to_string(&saved).unwrap();
    assert_eq!(written.trim_end(), stdout(&output).trim_end());
    assert_eq!(written.lines().count(), 1);
}

#[test]
fn cli_bad_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[checks]\nmin_words = 500\nmax_words = 100\n").unwrap();

    let output = run(&[SAMPLE_CV, "--config", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}
