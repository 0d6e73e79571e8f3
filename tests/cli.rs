//! The command-line client against a mock backend.

use std::process::Output;

use serde_json::{json, Value};
use tokio::process::Command;

mod common;

use common::{Reply, start_backend};

async fn run_cli(backend_origin: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_autometer-cli"))
        .args(["--env", "development", "--backend", backend_origin])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("failed to run autometer-cli")
}

#[tokio::test]
async fn successful_call_prints_json_and_exits_zero() {
    let backend = start_backend(|_| Reply::json(200, json!({"rate": 14.0}))).await;

    let output = run_cli(&backend.origin(), &["fare", "get"]).await;

    assert!(output.status.success());
    let printed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, json!({"rate": 14.0}));
    assert_eq!(backend.last().uri, "/api/fare/get");
}

#[tokio::test]
async fn failed_call_exits_non_zero() {
    let backend = start_backend(|_| Reply::json(404, json!({"message": "Driver not found"}))).await;

    let output = run_cli(&backend.origin(), &["drivers", "get", "404"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error [ERR_BAD_REQUEST]"), "{}", stderr);
    assert!(stderr.contains("Driver not found"), "{}", stderr);
}
