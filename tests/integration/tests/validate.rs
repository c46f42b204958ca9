//! Integration tests for the validate command
//!
//! Exercises the full pipeline: manifest loading, import resolution,
//! rule evaluation and report rendering through the CLI binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn archlint_cmd() -> Command {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("Failed to find workspace root");
    let bin_path = workspace_root.join("target/debug/archlint");
    Command::new(bin_path)
}

mod valid_cases {
    use super::*;

    #[test]
    fn passes_clean_manifest() {
        let workspace = fixtures_dir().join("valid");

        archlint_cmd()
            .arg("validate")
            .arg(&workspace)
            .assert()
            .success()
            .stdout(predicate::str::contains("Result: PASS"));
    }

    #[test]
    fn resolves_imported_fragments() {
        let workspace = fixtures_dir().join("imports");

        archlint_cmd()
            .arg("validate")
            .arg(&workspace)
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 2 element(s)"))
            .stdout(predicate::str::contains("Result: PASS"));
    }

    #[test]
    fn unreachable_import_degrades_without_failing() {
        let workspace = fixtures_dir().join("missing_import");

        archlint_cmd()
            .arg("validate")
            .arg(&workspace)
            .assert()
            .success()
            .stdout(predicate::str::contains("loading [fetch-failed]"))
            .stdout(predicate::str::contains("Result: PASS"));
    }
}

mod invalid_cases {
    use super::*;

    #[test]
    fn flags_non_kebab_case_id() {
        let workspace = fixtures_dir().join("invalid_naming");

        archlint_cmd()
            .arg("validate")
            .arg(&workspace)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("elements.BadComponent"))
            .stdout(predicate::str::contains("Result: FAIL"));
    }

    #[test]
    fn missing_workspace_is_a_usage_error() {
        archlint_cmd()
            .arg("validate")
            .arg(fixtures_dir().join("no_such_dir"))
            .assert()
            .code(2);
    }

    #[test]
    fn unknown_format_rejected_before_validation() {
        // The workspace does not exist; the format error winning proves
        // the flag is checked before any loading starts.
        archlint_cmd()
            .arg("validate")
            .arg(fixtures_dir().join("no_such_dir"))
            .arg("--format")
            .arg("yaml")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Unknown output format"));
    }
}

mod json_output {
    use super::*;

    #[test]
    fn emits_machine_readable_report() {
        let workspace = fixtures_dir().join("invalid_naming");

        let output = archlint_cmd()
            .arg("validate")
            .arg(&workspace)
            .arg("--format")
            .arg("json")
            .output()
            .expect("Failed to run archlint");

        let report: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON");

        assert_eq!(report["success"], serde_json::json!(false));
        assert_eq!(report["stats"]["validationErrors"], serde_json::json!(1));
        assert!(report["problems"].as_array().is_some_and(|p| !p.is_empty()));
    }
}

mod init {
    use super::*;

    #[test]
    fn scaffolds_a_validatable_workspace() {
        let dir = tempfile::tempdir().expect("tempdir");

        archlint_cmd()
            .arg("init")
            .arg(dir.path())
            .assert()
            .success();

        assert!(dir.path().join(".archlint.json").exists());
        assert!(dir.path().join("architecture.json").exists());

        archlint_cmd()
            .arg("validate")
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Result: PASS"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");

        archlint_cmd().arg("init").arg(dir.path()).assert().success();
        archlint_cmd().arg("init").arg(dir.path()).assert().code(2);
        archlint_cmd()
            .arg("init")
            .arg(dir.path())
            .arg("--force")
            .assert()
            .success();
    }
}
