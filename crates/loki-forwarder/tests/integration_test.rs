// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use loki_forwarder::{
    config::{FUNCTION_NAME_ENV, PUSH_ENDPOINT_ENV},
    ClientError, ForwarderConfig, ForwarderError, LogForwarder,
};
use mockito::{Matcher, Server};
use serial_test::serial;
use std::env;
use uuid::Uuid;

const PUSH_PATH: &str = "/loki/api/v1/push";

fn push_url(server: &Server) -> String {
    format!("{}{PUSH_PATH}", server.url())
}

#[tokio::test]
async fn forwards_line_with_lambda_labels() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PUSH_PATH)
        .match_header("Content-Type", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(serde_json::json!({
                "streams": [{ "stream": { "job": "lambda" } }]
            })),
            Matcher::Regex(r#""values":\[\["\d{19}","REPORT RequestId: abc"\]\]"#.to_string()),
        ]))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let forwarder = LogForwarder::new(ForwarderConfig::new(push_url(&server))).unwrap();
    forwarder.push_log("REPORT RequestId: abc").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn one_request_per_line() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PUSH_PATH)
        .with_status(204)
        .expect(3)
        .create_async()
        .await;

    let forwarder = LogForwarder::new(ForwarderConfig::new(push_url(&server))).unwrap();
    for line in ["one", "two", "three"] {
        forwarder.push_log(line).await.unwrap();
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn rejected_push_is_returned_to_caller() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PUSH_PATH)
        .with_status(400)
        .with_body("entry out of order")
        .create_async()
        .await;

    let forwarder = LogForwarder::new(ForwarderConfig::new(push_url(&server))).unwrap();
    let result = forwarder.push_log("late line").await;

    match result {
        Err(ForwarderError::TransportWrite(ClientError::Rejected { status, body })) => {
            assert_eq!(status, 400);
            assert_eq!(body, "entry out of order");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_a_write_error() {
    // Port 9 (discard) is not expected to accept connections in CI.
    let forwarder =
        LogForwarder::new(ForwarderConfig::new("http://127.0.0.1:9/loki/api/v1/push")).unwrap();
    let result = forwarder.push_log("nobody listening").await;
    assert!(matches!(
        result,
        Err(ForwarderError::TransportWrite(ClientError::Request(_)))
    ));
}

#[tokio::test]
async fn shutdown_keeps_prior_pushes_and_blocks_new_ones() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PUSH_PATH)
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let forwarder = LogForwarder::new(ForwarderConfig::new(push_url(&server))).unwrap();
    forwarder.push_log("before shutdown").await.unwrap();

    assert!(forwarder.shutdown().await.is_ok());
    assert!(forwarder.shutdown().await.is_ok());
    assert!(forwarder.transport().is_stopped());

    assert!(matches!(
        forwarder.push_log("after shutdown").await,
        Err(ForwarderError::TransportWrite(ClientError::Stopped))
    ));
    mock.assert_async().await;
}

#[test]
fn invalid_proxy_fails_construction() {
    let config = ForwarderConfig {
        https_proxy: Some("http://[::1".to_string()),
        ..ForwarderConfig::new("http://127.0.0.1:3100/loki/api/v1/push")
    };

    let result = LogForwarder::new(config);
    assert!(
        matches!(
            result,
            Err(ForwarderError::TransportInit(ClientError::Build(_)))
        ),
        "expected a client build error"
    );
}

#[test]
#[serial]
fn from_env_without_endpoint_fails() {
    env::remove_var(PUSH_ENDPOINT_ENV);
    env::set_var(FUNCTION_NAME_ENV, "my-function");

    let result = LogForwarder::from_env();
    assert!(matches!(result, Err(ForwarderError::Configuration(_))));

    env::remove_var(FUNCTION_NAME_ENV);
}

#[test]
#[serial]
fn from_env_without_function_name() {
    env::remove_var(FUNCTION_NAME_ENV);
    env::set_var(PUSH_ENDPOINT_ENV, "http://127.0.0.1:3100/loki/api/v1/push");

    let forwarder = LogForwarder::from_env().unwrap();
    assert_eq!(forwarder.source_name(), "");

    let key = forwarder.stream_key().as_str();
    let stem = key.strip_prefix('-').unwrap().strip_suffix(".log").unwrap();
    let (millis, token) = stem.split_once('-').unwrap();
    assert!(millis.parse::<u64>().is_ok());
    assert!(Uuid::parse_str(token).is_ok());

    env::remove_var(PUSH_ENDPOINT_ENV);
}

#[test]
#[serial]
fn from_env_lowercases_function_name() {
    env::set_var(FUNCTION_NAME_ENV, "Orders-API");
    env::set_var(PUSH_ENDPOINT_ENV, "http://127.0.0.1:3100/loki/api/v1/push");

    let forwarder = LogForwarder::from_env().unwrap();
    assert_eq!(forwarder.source_name(), "orders-api");
    assert!(forwarder.stream_key().as_str().starts_with("orders-api-"));

    env::remove_var(FUNCTION_NAME_ENV);
    env::remove_var(PUSH_ENDPOINT_ENV);
}

#[test]
fn stream_keys_differ_between_instances() {
    let config = ForwarderConfig::new("http://127.0.0.1:3100/loki/api/v1/push");
    let first = LogForwarder::new(config.clone()).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = LogForwarder::new(config).unwrap();
    assert_ne!(first.stream_key(), second.stream_key());
}
