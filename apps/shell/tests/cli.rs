use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const VALID_DRAFT: &str = r#"{
    "id": "cliDraft42",
    "store": { "storeName": "MediCare", "gstNumber": "22AAAAA0000A1Z5" },
    "owner": { "ownerName": "Jane Doe", "mobile": "9876543210", "email": "jane@store.com" },
    "location": { "addressLine1": "1 Main St", "city": "Pune", "pincode": "411001" },
    "consent": {
        "termsAccepted": true,
        "privacyAccepted": true,
        "dataAccuracyConfirmed": true,
        "authorizedSignatory": true,
        "signatureName": "Jane Doe"
    }
}"#;

fn pharmeco(drafts: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pharmeco").unwrap();
    cmd.env("PHECO__REGISTRATION__SUBMIT_DELAY_MS", "0")
        .env("PHECO__REGISTRATION__SAVE_DELAY_MS", "0")
        .env("PHECO__REGISTRATION__DRAFT_DIR", drafts)
        .env("PHECO__LOGGING__LEVEL", "warn");
    cmd
}

fn write_draft(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("draft.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn steps_lists_all_six() {
    let dir = TempDir::new().unwrap();
    pharmeco(dir.path())
        .arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Store Details"))
        .stdout(predicate::str::contains("6. Review & Consent"));
}

#[test]
fn validate_fails_on_incomplete_draft() {
    let dir = TempDir::new().unwrap();
    let draft = write_draft(&dir, r#"{ "store": { "storeName": "MediCare" } }"#);

    pharmeco(dir.path())
        .arg("validate")
        .arg(&draft)
        .assert()
        .failure()
        .stdout(predicate::str::contains("gstNumber: GST number is required"))
        .stdout(predicate::str::contains("ownerName"))
        .stderr(predicate::str::contains("steps have errors"));
}

#[test]
fn validate_accepts_complete_draft() {
    let dir = TempDir::new().unwrap();
    let draft = write_draft(&dir, VALID_DRAFT);

    pharmeco(dir.path())
        .arg("validate")
        .arg(&draft)
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft cliDraft42 is valid"));
}

#[test]
fn review_prints_summary_json() {
    let dir = TempDir::new().unwrap();
    let draft = write_draft(&dir, VALID_DRAFT);

    let output = pharmeco(dir.path()).arg("review").arg(&draft).output().unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["storeName"], "MediCare");
    assert_eq!(summary["consentsGranted"], 4);
    assert_eq!(summary["readyToSubmit"], true);
}

#[test]
fn register_submits_and_removes_saved_draft() {
    let dir = TempDir::new().unwrap();
    let drafts = dir.path().join("drafts");
    let draft = write_draft(&dir, VALID_DRAFT);

    pharmeco(&drafts)
        .args(["register", "--save"])
        .arg(&draft)
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft saved to"))
        .stdout(predicate::str::contains("Registration submitted for MediCare: reference PHE-"));

    assert!(drafts.is_dir());
    assert!(!drafts.join("cliDraft42.json").exists());
}

#[test]
fn register_stops_at_first_incomplete_step() {
    let dir = TempDir::new().unwrap();
    let draft = write_draft(&dir, r#"{ "store": { "storeName": "MediCare", "gstNumber": "22AAAAA0000A1Z5" } }"#);

    pharmeco(dir.path())
        .arg("register")
        .arg(&draft)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Step 2 Owner Information is incomplete"))
        .stderr(predicate::str::contains("Registration stopped at step 2"));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    pharmeco(dir.path())
        .args(["--config", "/definitely/not/here.toml", "steps"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to build config"));
}
