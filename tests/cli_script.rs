use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::str::contains;
use regex::Regex;
use tempfile::TempDir;

const COMPLETE_WILL: &str = "\
Ada Lovelace
10/12/1965
12 St James's Square, London, SW1Y 4JH
single
no
yes
250000
Mary Somerville
Friend

:skip
Byron King
Son
100



2

y
y
y
:submit PAY-123
";

fn wizard(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mywill_cli").unwrap();
    cmd.env("MYWILL_CLI_SCRIPT", "1")
        .env("MYWILL_HOME", home)
        .env("MYWILL_USER", "user-ada")
        .env_remove("MYWILL_REFERRAL")
        .env_remove("RUST_LOG");
    cmd
}

fn files_with_extension(dir: &Path, extension: &str) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(extension))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn version_prints_build_summary() {
    let output = Command::cargo_bin("mywill_cli")
        .unwrap()
        .arg("--version")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let pattern = Regex::new(r"^mywill \d+\.\d+\.\d+ \(").unwrap();
    assert!(pattern.is_match(&stdout), "unexpected version line: {stdout}");
}

#[test]
fn save_writes_snapshot_and_resume_reads_it() {
    let home = TempDir::new().unwrap();
    wizard(home.path())
        .write_stdin("Ada Lovelace\n:save\n")
        .assert()
        .success()
        .stdout(contains("Starting a new will."))
        .stdout(contains("Progress saved"));

    let snapshot = home
        .path()
        .join("progress")
        .join("myEasyWill_savedProgress.json");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&snapshot).unwrap()).unwrap();
    assert_eq!(json["section"], "personal");
    assert_eq!(json["step"], 1);
    assert_eq!(json["formData"]["personal"]["full_name"], "Ada Lovelace");
    assert_eq!(json["hasAcknowledgedComplexEstate"], false);

    wizard(home.path())
        .write_stdin(":quit\n")
        .assert()
        .success()
        .stdout(contains("Resuming where you left off."))
        .stdout(contains("Date of birth"));
}

#[test]
fn unknown_commands_suggest_the_closest_one() {
    let home = TempDir::new().unwrap();
    wizard(home.path())
        .write_stdin(":sav\n:quit\n")
        .assert()
        .success()
        .stdout(contains("Did you mean `:save`?"));
}

#[test]
fn blocked_step_reports_what_is_missing() {
    let home = TempDir::new().unwrap();
    wizard(home.path())
        .write_stdin("\n:quit\n")
        .assert()
        .success()
        .stdout(contains("Full legal name is required"));
}

#[test]
fn script_walks_to_submission() {
    let home = TempDir::new().unwrap();
    let output = wizard(home.path())
        .env("MYWILL_REFERRAL", "PARTNER-7")
        .write_stdin(COMPLETE_WILL)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let submitted = Regex::new(r"Your will has been submitted\. Reference: ([0-9a-f-]{36})")
        .unwrap()
        .captures(&stdout)
        .unwrap_or_else(|| panic!("no submission in output:\n{stdout}"));
    let id = submitted[1].to_string();

    let record_path = home.path().join("records").join(format!("{id}.json"));
    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(record_path).unwrap()).unwrap();
    assert_eq!(record["status"], "completed");
    assert_eq!(record["user_id"], "user-ada");
    assert_eq!(record["referral_code"], "PARTNER-7");
    assert!(record["backup_executor"].is_null());

    let documents = files_with_extension(&home.path().join("outbox"), "txt");
    assert_eq!(documents.len(), 1);
    let document = fs::read_to_string(&documents[0]).unwrap();
    assert!(document.starts_with("LAST WILL AND TESTAMENT"));
    assert!(document.contains("I, Ada Lovelace,"));

    assert!(!home
        .path()
        .join("progress")
        .join("myEasyWill_savedProgress.json")
        .exists());
}

#[test]
fn config_flag_creates_and_reports_settings() {
    let home = TempDir::new().unwrap();
    wizard(home.path())
        .arg("--config")
        .assert()
        .success()
        .stdout(contains("config.json"))
        .stdout(contains("skip complex assets below £400000"));

    let config_path = home.path().join("config").join("config.json");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(config_path).unwrap()).unwrap();
    assert_eq!(json["high_value_estate_threshold"], 1_000_000);
}

#[test]
fn editing_without_identity_fails() {
    let home = TempDir::new().unwrap();
    wizard(home.path())
        .env_remove("MYWILL_USER")
        .args(["--edit", "5b0f0d5e-3c3a-4b6b-9d43-2f5a51f0e8aa"])
        .assert()
        .failure()
        .stderr(contains("Error:"));
}
