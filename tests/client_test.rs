//! Remote measurement API client against a local stand-in server.
//!
//! Run with: cargo test --test client_test

mod common;

use std::time::Duration;

use reqwest::StatusCode;
use tokio_test::{assert_err, assert_ok};

use sensor_dash::sensors::{ClientError, Sensor, SensorClient};

use common::{first_page, refused_url, second_page, spawn_upstream};

async fn client() -> SensorClient {
    SensorClient::new(&spawn_upstream().await, Some(Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn fetch_latest_decodes_measurement() {
    let client = client().await;

    let m = assert_ok!(client.fetch_latest("a").await);

    assert_eq!(m.id, "a");
    assert_eq!(m.timestamp, 1_700_000_000);
}

#[tokio::test]
async fn fetch_page_uses_skip_offset() {
    let client = client().await;

    assert_eq!(assert_ok!(client.fetch_page(0).await), first_page());
    assert_eq!(assert_ok!(client.fetch_page(100).await), second_page());
}

#[tokio::test]
async fn non_success_status_is_http_status_error() {
    let client = client().await;

    let err = assert_err!(client.fetch_latest("unknown").await);
    assert!(matches!(
        err,
        ClientError::HttpStatus { status, .. } if status == StatusCode::NOT_FOUND
    ));

    let err = assert_err!(client.fetch_page(300).await);
    assert!(matches!(
        err,
        ClientError::HttpStatus { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR
    ));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let client = client().await;

    let err = assert_err!(client.fetch_latest("garbled").await);

    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let client = SensorClient::new(&refused_url().await, Some(Duration::from_secs(5))).unwrap();

    let err = assert_err!(client.fetch_page(0).await);

    assert!(matches!(err, ClientError::Network { .. }));
}

#[tokio::test]
async fn fetch_latest_all_keeps_sensor_order() {
    let client = client().await;
    let sensors = vec![
        Sensor { id: "b".into(), room: "Sypialnia".into() },
        Sensor { id: "a".into(), room: "Salon".into() },
    ];

    let latest = assert_ok!(client.fetch_latest_all(&sensors).await);

    let ids: Vec<&str> = latest.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[tokio::test]
async fn fetch_latest_all_fails_on_any_error() {
    let client = client().await;
    let sensors = vec![
        Sensor { id: "a".into(), room: "Salon".into() },
        Sensor { id: "gone".into(), room: "Strych".into() },
    ];

    assert_err!(client.fetch_latest_all(&sensors).await);
}

fn assert_send<T: Send>(_: &T) {}

#[tokio::test]
async fn request_futures_are_send() {
    let client = client().await;
    let sensors = vec![Sensor { id: "a".into(), room: "Salon".into() }];

    let latest = client.fetch_latest("unknown");
    let page = client.fetch_page(300);
    let all = client.fetch_latest_all(&sensors);
    assert_send(&latest);
    assert_send(&page);
    assert_send(&all);

    // Non-success paths read the body before logging it
    assert_err!(latest.await);
    assert_err!(page.await);
    assert_ok!(all.await);
}

#[test]
fn base_url_is_trimmed() {
    let client = SensorClient::new("http://sensors.local/", None).unwrap();

    assert_eq!(client.base_url(), "http://sensors.local");
}
