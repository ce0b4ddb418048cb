//! Shared fixtures: a stand-in for the remote measurement API and configs
//! pointing at it.
#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;

use sensor_dash::common::AppState;
use sensor_dash::config::Config;
use sensor_dash::sensors::{Measurement, SensorClient};

pub fn measurement(id: &str, timestamp: i64) -> Measurement {
    Measurement {
        id: id.to_string(),
        temperature: 20.0 + timestamp as f64 / 100.0,
        humidity: 40,
        voltage: 3.0,
        timestamp,
    }
}

/// Page served at skip 0.
pub fn first_page() -> Vec<Measurement> {
    vec![
        measurement("a", 100),
        measurement("a", 200),
        measurement("b", 300),
    ]
}

/// Page served at skip 100.
pub fn second_page() -> Vec<Measurement> {
    vec![measurement("a", 400)]
}

async fn latest(Path(sensor_id): Path<String>) -> Response {
    match sensor_id.as_str() {
        "a" | "b" => Json(measurement(&sensor_id, 1_700_000_000)).into_response(),
        "garbled" => (StatusCode::OK, "{\"id\": 12").into_response(),
        _ => (StatusCode::NOT_FOUND, "no such sensor").into_response(),
    }
}

/// Skip 0 and 100 have data, skip 2000 has one chart page, everything else
/// fails upstream.
async fn data(Path(skip): Path<usize>) -> Response {
    match skip {
        0 => Json(first_page()).into_response(),
        100 => Json(second_page()).into_response(),
        2000 => Json(vec![measurement("b", 50)]).into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response(),
    }
}

/// Start the fake sensor API on an ephemeral port and return its base URL.
pub async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/latest/{sensor_id}", get(latest))
        .route("/data/{skip}", get(data));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Base URL of a port nothing listens on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn config_from(vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn test_config(base_url: &str) -> Config {
    config_from(&[
        ("SENSORS", "a=Salon,b=Sypialnia"),
        ("SENSOR_API_BASE_URL", base_url),
        ("SENSOR_API_TIMEOUT_SECONDS", "5"),
        ("DISABLE_RATE_LIMITING", "true"),
    ])
}

pub async fn test_state() -> AppState {
    let config = test_config(&spawn_upstream().await);
    let client = SensorClient::from_config(&config).unwrap();
    AppState::new(config, client)
}
