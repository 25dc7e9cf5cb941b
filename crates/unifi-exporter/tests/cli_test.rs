//! Integration tests for the `unifi-exporter` binary.
//!
//! Argument parsing and error exits run without a controller; full scrapes
//! run against a wiremock controller on the classic platform.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the binary with env isolation.
///
/// Clears all `UNIFI_EXPORTER_*` env vars and points config directories at
/// a nonexistent path so tests never touch the user's real configuration.
fn exporter_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("unifi-exporter");
    cmd.env("HOME", "/tmp/unifi-exporter-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/unifi-exporter-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("UNIFI_EXPORTER_CONTROLLER")
        .env_remove("UNIFI_EXPORTER_USERNAME")
        .env_remove("UNIFI_EXPORTER_PASSWORD")
        .env_remove("UNIFI_EXPORTER_SITES")
        .env_remove("UNIFI_EXPORTER_NAMESPACE")
        .env_remove("UNIFI_EXPORTER_INSECURE")
        .env_remove("UNIFI_EXPORTER_CA_CERT")
        .env_remove("UNIFI_EXPORTER_TIMEOUT")
        .env_remove("UNIFI_EXPORTER_PLATFORM");
    cmd
}

fn envelope(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" }, "data": data }))
}

/// A classic controller with sites `default` and `lab`; `default` has one
/// alarm, `lab` fails with HTTP 500.
async fn mock_controller() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(envelope(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(envelope(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/self/sites"))
        .respond_with(envelope(json!([
            { "_id": "s1", "name": "default", "desc": "Default", "role": "admin" },
            { "_id": "s2", "name": "lab", "desc": "Lab", "role": "admin" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/alarm"))
        .respond_with(envelope(json!([{
            "_id": "abcdef",
            "ap": "de:ad:be:ef:de:ad",
            "ap_name": "foo",
            "archived": false,
            "key": "EVT_AP_Lost_Contact",
            "msg": "AP[de:ad:be:ef:de:ad] was disconnected",
            "subsystem": "wlan"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/s/lab/stat/alarm"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    server
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn scrape_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = exporter_cmd();
    cmd.env("UNIFI_EXPORTER_PASSWORD", "hunter2").args([
        "--controller",
        &server.uri(),
        "--username",
        "metrics",
        "--platform",
        "classic",
    ]);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn help_lists_flags() {
    exporter_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Prometheus")
            .and(predicate::str::contains("--controller"))
            .and(predicate::str::contains("--site"))
            .and(predicate::str::contains("--output")),
    );
}

#[test]
fn version_flag() {
    exporter_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_platform_is_a_usage_error() {
    exporter_cmd()
        .args(["--platform", "cloud"])
        .assert()
        .code(2);
}

// ── Error exits ─────────────────────────────────────────────────────

#[test]
fn missing_controller_is_a_config_error() {
    exporter_cmd()
        .assert()
        .code(3)
        .stderr(predicate::str::contains("controller"));
}

#[test]
fn unreachable_controller_is_a_connection_error() {
    exporter_cmd()
        .env("UNIFI_EXPORTER_PASSWORD", "x")
        .args([
            "--controller",
            "http://127.0.0.1:1",
            "--username",
            "metrics",
            "--platform",
            "classic",
            "--timeout",
            "2",
        ])
        .assert()
        .code(5)
        .stdout(predicate::str::is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_login_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.Invalid" }, "data": []
        })))
        .mount(&server)
        .await;

    let output = run(scrape_cmd(&server)).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_site_is_a_config_error() {
    let server = mock_controller().await;
    let mut cmd = scrape_cmd(&server);
    cmd.args(["--site", "warehouse"]);

    let output = run(cmd).await;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr.contains("warehouse"), "stderr:\n{stderr}");
}

// ── Scrapes ─────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn scrape_writes_metrics_to_stdout() {
    let server = mock_controller().await;
    let mut cmd = scrape_cmd(&server);
    cmd.args(["--site", "default"]);

    let output = run(cmd).await;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr:\n{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("# TYPE unifi_alarms_total gauge"), "stdout:\n{stdout}");
    assert!(stdout.contains(r#"unifi_alarms_total{site="Default"} 1"#), "stdout:\n{stdout}");
    assert!(stdout.contains(r#"name="foo""#), "stdout:\n{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_site_still_writes_partial_output_to_file() {
    let server = mock_controller().await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("unifi.prom");

    let mut cmd = scrape_cmd(&server);
    cmd.args(["--namespace", "udm", "--output"]).arg(&out);

    let output = run(cmd).await;
    let written = std::fs::read_to_string(&out).unwrap();

    assert_eq!(output.status.code(), Some(6));
    assert!(output.stdout.is_empty());
    assert!(written.contains(r#"udm_alarms_total{site="Default"} 1"#), "file:\n{written}");
    assert!(!written.contains(r#"site="Lab""#), "file:\n{written}");
}
