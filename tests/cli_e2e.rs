//! End-to-end CLI tests for the picfetch binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds the command with an isolated config directory.
fn picfetch(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("picfetch").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let config_home = TempDir::new().unwrap();
    picfetch(&config_home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Extract image metadata"))
        .stdout(predicate::str::contains("--output-dir"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let config_home = TempDir::new().unwrap();
    picfetch(&config_home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("picfetch"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let config_home = TempDir::new().unwrap();
    picfetch(&config_home)
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that empty stdin is reported as missing input.
#[test]
fn test_binary_empty_input_fails() {
    let config_home = TempDir::new().unwrap();
    picfetch(&config_home)
        .write_stdin("   \n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no input provided"));
}

/// Test that a missing input file is reported.
#[test]
fn test_binary_missing_input_file_fails() {
    let config_home = TempDir::new().unwrap();
    picfetch(&config_home)
        .arg("/definitely/not/here.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read input file"));
}

/// Test that invalid UTF-8 in the input is decoded lossily instead of aborting.
#[test]
fn test_binary_non_utf8_input_still_starts_task() {
    let config_home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = work.path().join("in.json");
    let mut bytes = br#"{"title": "A", "url": "ftp://x/y.png"} "#.to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe]);
    std::fs::write(&input, bytes).unwrap();

    picfetch(&config_home)
        .args(["--json", "--progress-pause-ms", "0", "-o"])
        .arg(work.path().join("img"))
        .arg(&input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""event":"started""#))
        .stdout(predicate::str::contains(r#""kind":"invalid_url""#));
}

/// Test that an invalid config file value is rejected.
#[test]
fn test_binary_invalid_config_file_fails() {
    let config_home = TempDir::new().unwrap();
    let dir = config_home.path().join("picfetch");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "progress_step = 0\n").unwrap();

    picfetch(&config_home)
        .write_stdin(r#"{"url": "http://127.0.0.1:9/a.png"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("progress_step"));
}

/// Test a full run printing JSON lines.
#[tokio::test(flavor = "multi_thread")]
async fn test_binary_downloads_image_with_json_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gallery/owl.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"owl bytes".to_vec()))
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let input = format!(
        r#"{{"title": "Night Owl", "copyright": "A. Birder", "url": "{}/gallery/owl.png"}}"#,
        server.uri()
    );

    picfetch(&config_home)
        .args(["--json", "--progress-pause-ms", "0", "-o"])
        .arg(output.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":"started""#))
        .stdout(predicate::str::contains(r#""event":"succeeded""#))
        .stdout(predicate::str::contains("Night Owl"));

    let saved = std::fs::read(output.path().join("owl.png")).unwrap();
    assert_eq!(saved, b"owl bytes");
}

/// Test that a failed download exits non-zero with the reason on stderr.
#[tokio::test(flavor = "multi_thread")]
async fn test_binary_http_error_exits_with_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let input = format!(r#"{{"url": "{}/broken.png"}}"#, server.uri());

    picfetch(&config_home)
        .args(["-q", "--progress-pause-ms", "0", "-o"])
        .arg(output.path())
        .write_stdin(input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("500"));
}
