use assert_cmd::Command;
use predicates::prelude::*;

const SECRET: &str = "whsec_cli_test";
const PAYLOAD: &str = r#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{"id":"pi_1"}}}"#;

/// Command with an isolated config file and no ambient overrides
fn cli(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("turnstay-webhooks").unwrap();
    cmd.arg("--config")
        .arg(config_dir.path().join("config.toml"))
        .env_remove("TURNSTAY_WEBHOOKS_SECRET")
        .env_remove("TURNSTAY_WEBHOOKS_BASE_URL")
        .env_remove("TURNSTAY_WEBHOOKS_MODE")
        .env_remove("TURNSTAY_WEBHOOKS_MAX_RETRIES")
        .env_remove("TURNSTAY_WEBHOOKS_LOG_LEVEL")
        .env_remove("TURNSTAY_WEBHOOKS_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn sign(config_dir: &tempfile::TempDir, timestamp: &str) -> String {
    let output = cli(config_dir)
        .args(["sign", "--secret", SECRET, "--payload", PAYLOAD, "--timestamp", timestamp])
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("turnstay-webhooks").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("turnstay-webhooks 0.1.0"));
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("turnstay-webhooks").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Emit, sign and verify TurnStay webhook events",
        ));
}

#[test]
fn test_cli_sign_with_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let header = sign(&dir, "1700000000");
    assert!(header.starts_with("t=1700000000, v1="));
    assert_eq!(header.len(), "t=1700000000, v1=".len() + 64);
}

#[test]
fn test_cli_sign_requires_secret() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["sign", "--payload", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No secret given"));
}

#[test]
fn test_cli_verify_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let header = sign(&dir, "1700000000");

    cli(&dir)
        .args([
            "verify",
            "--secret",
            SECRET,
            "--header",
            &header,
            "--payload",
            PAYLOAD,
            "--tolerance",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"payment_intent.succeeded\""))
        .stdout(predicate::str::contains("\"object\": \"event\""));
}

#[test]
fn test_cli_verify_secret_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let header = sign(&dir, "1700000000");

    cli(&dir)
        .env("TURNSTAY_WEBHOOKS_SECRET", SECRET)
        .args(["verify", "--header", &header, "--payload", PAYLOAD, "--tolerance", "0"])
        .assert()
        .success();
}

#[test]
fn test_cli_verify_rejects_wrong_secret() {
    let dir = tempfile::tempdir().unwrap();
    let header = sign(&dir, "1700000000");

    cli(&dir)
        .args([
            "verify",
            "--secret",
            "whsec_other",
            "--header",
            &header,
            "--payload",
            PAYLOAD,
            "--tolerance",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching signature found"));
}

#[test]
fn test_cli_verify_rejects_stale_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let header = sign(&dir, "1700000000");

    // Default tolerance applies
    cli(&dir)
        .args(["verify", "--secret", SECRET, "--header", &header, "--payload", PAYLOAD])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds tolerance of 300s"));
}

#[test]
fn test_cli_trigger_without_base_url() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["trigger", "payment_intent.succeeded"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url is required for HTTP mode"));
}

#[test]
fn test_cli_trigger_rejects_non_object_data() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args([
            "trigger",
            "payment_intent.succeeded",
            "--base-url",
            "http://127.0.0.1:1",
            "--data",
            "[1, 2]",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--data must be a JSON object"));
}

#[test]
fn test_cli_warns_about_ignored_overrides() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .env("TURNSTAY_WEBHOOKS_MODE", "carrier-pigeon")
        .env("TURNSTAY_WEBHOOKS_MAX_RETRIES", "many")
        .args(["sign", "--secret", SECRET, "--payload", "{}", "--timestamp", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("t=1, v1="))
        .stderr(predicate::str::contains("Ignoring TURNSTAY_WEBHOOKS_MODE"))
        .stderr(predicate::str::contains("Ignoring TURNSTAY_WEBHOOKS_MAX_RETRIES"));
}

#[test]
fn test_cli_verbose_reports_config_source() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["-v", "sign", "--secret", SECRET, "--payload", "{}"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_cli_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[logging]\nlevel = \"loud\"\n").unwrap();

    cli(&dir)
        .args(["sign", "--secret", SECRET, "--payload", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid log level"));
}
