//! CLI binary behavior: argument parsing, config errors, offline checks.
//!
//! Nothing here touches the network; commands either fail before the
//! gateway is built or only exercise help output.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn gateward() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_gateward"));
    // Keep ambient credentials and stray .env files out of the tests.
    for var in [
        "BINANCE_API_KEY",
        "BINANCE_API_SECRET",
        "BYBIT_API_KEY",
        "BYBIT_SECRET_KEY",
        "TESTNET",
    ] {
        command.env_remove(var);
    }
    command
}

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn help_lists_check_command() {
    let output = gateward().arg("--help").output().expect("run gateward");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("check"));
}

#[test]
fn check_help_lists_all_four_operations() {
    let output = gateward()
        .args(["check", "--help"])
        .output()
        .expect("run gateward");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for operation in ["connection", "balance", "ticker", "symbols"] {
        assert!(stdout.contains(operation), "missing {operation} in help");
    }
}

#[test]
fn missing_config_file_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let output = gateward()
        .current_dir(dir.path())
        .args(["--config", "does-not-exist.toml", "check", "connection"])
        .output()
        .expect("run gateward");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
}

#[test]
fn invalid_config_file_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "not [ valid toml");

    let output = gateward()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["check", "connection"])
        .output()
        .expect("run gateward");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
}

#[test]
fn missing_credentials_fail_before_any_network_call() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [exchange]
        profile = "bybit"
        "#,
    );

    let output = gateward()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["check", "connection"])
        .output()
        .expect("run gateward");

    assert!(!output.status.success());
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        combined.contains("missing required field"),
        "expected credential error, got:\n{combined}"
    );
}

#[test]
fn unknown_profile_is_rejected_at_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [exchange]
        profile = "kraken"
        "#,
    );

    let output = gateward()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["check", "balance"])
        .output()
        .expect("run gateward");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
}
