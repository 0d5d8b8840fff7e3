// ABOUTME: Supabase writer tests against a local TCP stub server
// ABOUTME: Covers upsert headers, payload omission, failure logging path, and idempotence
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use uuid::Uuid;

use garmin_health_sync::config::SupabaseConfig;
use garmin_health_sync::models::{DailyHealthRecord, HrSample};
use garmin_health_sync::store::{HealthStore, SupabaseStore};

const OK_RESPONSE: &str = "HTTP/1.1 201 Created\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";

const CONFLICT_RESPONSE: &str = "HTTP/1.1 409 Conflict\r\ncontent-type: application/json\r\ncontent-length: 33\r\nconnection: close\r\n\r\n{\"message\":\"duplicate key value\"}";

/// Accepts one connection, reads a full HTTP/1.1 request, replies with
/// `response`, and returns the raw request bytes as a string.
async fn serve_once(listener: &TcpListener, response: &str) -> String {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0_u8; 4096];

    // Read until the header block is complete, then drain the body per
    // content-length.
    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before request was complete");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length: usize = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .map(|v| v.trim().parse().unwrap())
        .unwrap_or(0);

    while buf.len() < header_end + 4 + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed mid-body");
        buf.extend_from_slice(&chunk[..n]);
    }

    socket.write_all(response.as_bytes()).await.unwrap();
    socket.shutdown().await.ok();
    String::from_utf8_lossy(&buf).into_owned()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn request_body(request: &str) -> Value {
    let body = request.split("\r\n\r\n").nth(1).unwrap();
    serde_json::from_str(body).unwrap()
}

async fn stub_store() -> (SupabaseStore, TcpListener) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = SupabaseConfig {
        base_url: format!("http://{addr}"),
        service_key: "service-key".into(),
        table: "garmin_health_data".into(),
    };
    let store = SupabaseStore::new(config, reqwest::Client::new());
    (store, listener)
}

fn sample_record() -> DailyHealthRecord {
    DailyHealthRecord {
        user_id: Uuid::nil(),
        date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        steps: Some(9001),
        step_goal: Some(10000),
        resting_hr: Some(49),
        avg_hr: None,
        max_hr: None,
        hr_values: Some(vec![HrSample { t: 1000, hr: 58 }]),
        sleep_score: Some(81),
        sleep_seconds: Some(27000),
        body_battery_high: Some(88),
        stress_avg: None,
        calories_active: Some(640),
        distance_meters: None,
    }
}

#[tokio::test]
async fn upsert_sends_merge_directive_and_credentials() {
    let (store, listener) = stub_store().await;
    let server = tokio::spawn(async move { serve_once(&listener, OK_RESPONSE).await });

    assert!(store.upsert(&sample_record()).await);

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("post /rest/v1/garmin_health_data http/1.1"));
    assert!(request.contains("prefer: resolution=merge-duplicates,return=minimal"));
    assert!(request.contains("apikey: service-key"));
    assert!(request.contains("authorization: bearer service-key"));
}

#[tokio::test]
async fn upsert_payload_omits_absent_fields_entirely() {
    let (store, listener) = stub_store().await;
    let server = tokio::spawn(async move { serve_once(&listener, OK_RESPONSE).await });

    assert!(store.upsert(&sample_record()).await);

    let body = request_body(&server.await.unwrap());
    let map = body.as_object().unwrap();
    // Absent metrics must not appear at all; an explicit null would clear
    // the previously stored column on merge.
    assert!(!map.contains_key("avg_hr"));
    assert!(!map.contains_key("stress_avg"));
    assert!(!map.contains_key("distance_meters"));
    assert!(map.values().all(|v| !v.is_null()));
    assert_eq!(body["date"], "2025-06-01");
    assert_eq!(body["hr_values"], serde_json::json!([{ "t": 1000, "hr": 58 }]));
}

#[tokio::test]
async fn non_success_response_reports_failure_without_raising() {
    let (store, listener) = stub_store().await;
    let server = tokio::spawn(async move { serve_once(&listener, CONFLICT_RESPONSE).await });

    assert!(!store.upsert(&sample_record()).await);
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_store_reports_failure_without_raising() {
    let (store, listener) = stub_store().await;
    // Drop the listener so the connection is refused.
    drop(listener);

    assert!(!store.upsert(&sample_record()).await);
}

#[tokio::test]
async fn repeated_upserts_of_the_same_record_send_identical_payloads() {
    let (store, listener) = stub_store().await;
    let server = tokio::spawn(async move {
        let first = serve_once(&listener, OK_RESPONSE).await;
        let second = serve_once(&listener, OK_RESPONSE).await;
        (first, second)
    });

    let record = sample_record();
    assert!(store.upsert(&record).await);
    assert!(store.upsert(&record).await);

    let (first, second) = server.await.unwrap();
    // Same natural key, same fields: the store merges, so two writes leave
    // the same state as one.
    assert_eq!(request_body(&first), request_body(&second));
}
