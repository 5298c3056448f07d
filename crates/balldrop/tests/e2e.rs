//! End-to-end tests for the balldrop CLI.
//!
//! These run the real binary against temporary output directories and check
//! printed values and written artifacts.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a Command for the balldrop binary with no config from the environment.
#[allow(deprecated)]
fn balldrop_cmd() -> Command {
    let mut cmd = Command::cargo_bin("balldrop").unwrap();
    cmd.env_remove("BALLDROP_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// =============================================================================
// Curves
// =============================================================================

mod curves {
    use super::*;

    #[test]
    fn test_curve_prints_csv() {
        let output = balldrop_cmd().arg("curve").output().unwrap();
        assert!(output.status.success());

        let stdout = String::from_utf8(output.stdout).unwrap();
        let mut lines = stdout.lines();
        assert_eq!(lines.next(), Some("x,y"));
        assert_eq!(lines.count(), 50);
    }

    #[test]
    fn test_curve_control_points() {
        balldrop_cmd()
            .args(["curve", "--control"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("x,y\n0,0\n"))
            .stdout(predicate::str::ends_with(",-100\n"));
    }

    #[test]
    fn test_curve_sample_override() {
        let output = balldrop_cmd().args(["curve", "-n", "12"]).output().unwrap();
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert_eq!(stdout.lines().count(), 13);
    }

    #[test]
    fn test_curve_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("curve.csv");

        balldrop_cmd()
            .args(["curve", "--output"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("x,y\n"));
        assert_eq!(text.lines().count(), 51);
    }

    #[test]
    fn test_cycloid_prints_csv() {
        balldrop_cmd()
            .arg("cycloid")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("x,y\n0,0\n"))
            .stdout(predicate::str::ends_with(",-100\n"));
    }

    #[test]
    fn test_out_of_domain_shape_fails() {
        balldrop_cmd()
            .args(["--shape", "0.2,0.3,1.5,0.8,0.6", "curve"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("s3 = 1.5"));
    }

    #[test]
    fn test_out_of_domain_shape_allowed() {
        balldrop_cmd()
            .args(["--shape", "0.2,0.3,1.5,0.8,0.6", "--allow-out-of-domain", "curve"])
            .assert()
            .success();
    }

    #[test]
    fn test_wrong_shape_count_fails() {
        balldrop_cmd()
            .args(["--shape", "0.2,0.3", "curve"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("5 values"));
    }
}

// =============================================================================
// Host steps
// =============================================================================

mod host_steps {
    use super::*;

    #[test]
    fn test_pre_writes_model_manifest() {
        let dir = TempDir::new().unwrap();

        balldrop_cmd()
            .args(["pre", "--run", "42", "--out-dir"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("model.json"));

        let text = fs::read_to_string(dir.path().join("model.json")).unwrap();
        let plan: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(plan["run"], 42);
        assert_eq!(plan["job"]["name"], "Ball_Drop");
        assert_eq!(plan["parts"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_post_without_report_only_writes_requests() {
        let dir = TempDir::new().unwrap();

        balldrop_cmd()
            .args(["post", "--run", "7", "--out-dir"])
            .arg(dir.path())
            .assert()
            .success();

        let text = fs::read_to_string(dir.path().join("post.json")).unwrap();
        let post: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(post["history"]["variable"], "U1");
        assert!(post["animation"]["output"]
            .as_str()
            .unwrap()
            .ends_with("Run_7"));
        assert!(!dir.path().join("Drop_Time.txt").exists());
    }

    #[test]
    fn test_post_reduces_existing_report() {
        let dir = TempDir::new().unwrap();
        fs::copy(fixture("U1.rpt"), dir.path().join("U1.rpt")).unwrap();

        balldrop_cmd()
            .args(["post", "--out-dir"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("0.20000000"));

        assert_eq!(
            fs::read_to_string(dir.path().join("Drop_Time.txt")).unwrap(),
            "0.20000000"
        );
    }
}

// =============================================================================
// Drop time
// =============================================================================

mod drop_time {
    use super::*;

    #[test]
    fn test_drop_time_from_fixture() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("Drop_Time.txt");

        balldrop_cmd()
            .arg("drop-time")
            .arg(fixture("U1.rpt"))
            .arg("--output")
            .arg(&out)
            .assert()
            .success()
            .stdout("0.20000000\n");

        assert_eq!(fs::read_to_string(&out).unwrap(), "0.20000000");
    }

    #[test]
    fn test_drop_time_decimals() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("t.txt");

        balldrop_cmd()
            .arg("drop-time")
            .arg(fixture("U1.rpt"))
            .args(["--decimals", "3", "--output"])
            .arg(&out)
            .assert()
            .success()
            .stdout("0.200\n");
    }

    #[test]
    fn test_drop_time_missing_report() {
        let dir = TempDir::new().unwrap();

        balldrop_cmd()
            .arg("drop-time")
            .arg(dir.path().join("missing.rpt"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("missing.rpt"));
    }

    #[test]
    fn test_drop_time_empty_report() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("U1.rpt");
        fs::write(&report, "\n   X   U1\n\n\n").unwrap();

        balldrop_cmd()
            .arg("drop-time")
            .arg(&report)
            .args(["--output"])
            .arg(dir.path().join("Drop_Time.txt"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("no data rows"));
    }
}

// =============================================================================
// Configuration
// =============================================================================

mod configuration {
    use super::*;

    #[test]
    fn test_config_file_applies() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("run.toml");
        fs::write(&config, "[track]\nsamples = 8\n").unwrap();

        let output = balldrop_cmd()
            .arg("--config")
            .arg(&config)
            .arg("curve")
            .output()
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 9);
    }

    #[test]
    fn test_config_from_env() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("run.toml");
        fs::write(&config, "[cycloid]\nsamples = 4\n").unwrap();

        let output = balldrop_cmd()
            .env("BALLDROP_CONFIG", &config)
            .arg("cycloid")
            .output()
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 5);
    }

    #[test]
    fn test_invalid_config_fails() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("run.toml");
        fs::write(&config, "[track]\ndepth = -1.0\n").unwrap();

        balldrop_cmd()
            .arg("--config")
            .arg(&config)
            .arg("curve")
            .assert()
            .failure()
            .stderr(predicate::str::contains("track.depth"));
    }

    #[test]
    fn test_unknown_config_key_fails() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("run.toml");
        fs::write(&config, "colour = \"red\"\n").unwrap();

        balldrop_cmd()
            .arg("--config")
            .arg(&config)
            .arg("curve")
            .assert()
            .failure();
    }

    #[test]
    fn test_json_logs_to_stderr() {
        let dir = TempDir::new().unwrap();

        balldrop_cmd()
            .args(["-v", "--log-json", "pre", "--out-dir"])
            .arg(dir.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("\"level\":\"INFO\""))
            .stderr(predicate::str::contains("pre-processing"));
    }
}
