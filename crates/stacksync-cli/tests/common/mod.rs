use std::process::Output;

use serde_json::{Value, json};
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the CLI binary against a mock Delivery API.
pub async fn run_cli(server: &MockServer, args: &[&str]) -> Output {
    let base_url = format!("http://127.0.0.1:{}", server.address().port());
    let mut cmd = base_command();
    cmd.args(args)
        .args(["--api-key", "blt_test", "--delivery-token", "cs_test"])
        .args(["--base-url", &base_url]);
    cmd.output().await.expect("Failed to execute CLI")
}

/// Run the CLI without any connection settings.
pub async fn run_cli_bare(args: &[&str]) -> Output {
    let mut cmd = base_command();
    cmd.args(args);
    cmd.output().await.expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub async fn run_cli_success(server: &MockServer, args: &[&str]) -> String {
    let output = run_cli(server, args).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn base_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stacksync"));
    for var in [
        "CONTENTSTACK_API_KEY",
        "CONTENTSTACK_DELIVERY_TOKEN",
        "CONTENTSTACK_ENVIRONMENT",
        "CONTENTSTACK_REGION",
        "CONTENTSTACK_BASE_URL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Serve `body` as the entries of `content_type`.
pub async fn mount_entries(server: &MockServer, content_type: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/content_types/{content_type}/entries")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entries": body })))
        .mount(server)
        .await;
}

/// Answer every unmatched request with an empty entry list.
pub async fn mount_empty_fallback(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entries": [] })))
        .mount(server)
        .await;
}
