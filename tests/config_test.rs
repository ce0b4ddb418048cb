//! Configuration parsing.
//!
//! Run with: cargo test --test config_test

mod common;

use std::collections::HashMap;

use sensor_dash::config::{parse_sensors, parse_utc_offset, Config, ConfigError};
use sensor_dash::explore::ExploreView;

use common::config_from;

#[test]
fn sensors_keep_configured_order() {
    let sensors = parse_sensors("b=Sypialnia, a=Salon ,c=Kuchnia i jadalnia").unwrap();

    let pairs: Vec<(&str, &str)> = sensors
        .iter()
        .map(|s| (s.id.as_str(), s.room.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("b", "Sypialnia"), ("a", "Salon"), ("c", "Kuchnia i jadalnia")]
    );
}

#[test]
fn malformed_sensors_are_rejected() {
    for raw in ["a", "a=Salon,b", "=Salon", "a=Salon,a=Kuchnia", "", " , "] {
        assert!(
            matches!(parse_sensors(raw), Err(ConfigError::Invalid("SENSORS", _))),
            "accepted {raw:?}"
        );
    }
}

#[test]
fn utc_offsets() {
    assert_eq!(parse_utc_offset("+02:00").unwrap().local_minus_utc(), 7200);
    assert_eq!(parse_utc_offset("-05:30").unwrap().local_minus_utc(), -19_800);
    assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
    assert_eq!(parse_utc_offset("utc").unwrap().local_minus_utc(), 0);

    for bad in ["02:00", "+2:75", "+ab:00", "+25:00", ""] {
        assert!(parse_utc_offset(bad).is_err(), "accepted {bad:?}");
    }
}

#[test]
fn sensors_variable_is_required() {
    let vars: HashMap<&str, &str> = HashMap::from([("API_PORT", "9000")]);

    let err = Config::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap_err();

    assert!(matches!(err, ConfigError::Missing("SENSORS")));
}

#[test]
fn defaults_apply() {
    let config = config_from(&[("SENSORS", "a=Salon")]);

    assert_eq!(config.sensor_api_base_url, "https://sensors.bieda.it");
    assert_eq!(config.sensor_api_timeout_seconds, None);
    assert_eq!(config.table_page_size, 100);
    assert_eq!(config.chart_page_size, 2000);
    assert_eq!(config.display_offset.local_minus_utc(), 0);
    assert_eq!(config.bind_address(), "0.0.0.0:8080");
    assert!(!config.disable_rate_limiting);
    assert!(!config.build_static);
}

#[test]
fn overrides_apply() {
    let config = config_from(&[
        ("SENSORS", "a=Salon,b=Sypialnia"),
        ("SENSOR_API_BASE_URL", "http://localhost:9999/"),
        ("TABLE_PAGE_SIZE", "50"),
        ("CHART_PAGE_SIZE", "500"),
        ("DISPLAY_UTC_OFFSET", "+01:00"),
        ("API_PORT", "3000"),
        ("BUILD_STATIC", "true"),
        ("STATIC_API_BASE", "https://api.example.org"),
    ]);

    assert_eq!(config.sensor_api_base_url, "http://localhost:9999");
    assert_eq!(config.display_offset.local_minus_utc(), 3600);
    assert_eq!(config.api_port, 3000);
    assert!(config.build_static);
    assert_eq!(config.static_api_base, "https://api.example.org");
    assert_eq!(config.room_name("b"), Some("Sypialnia"));
    assert_eq!(config.room_name("c"), None);

    assert_eq!(ExploreView::Table.page_size(&config), 50);
    assert_eq!(ExploreView::Chart.page_size(&config), 500);
}

#[test]
fn bad_offset_fails_config() {
    let vars: HashMap<&str, &str> =
        HashMap::from([("SENSORS", "a=Salon"), ("DISPLAY_UTC_OFFSET", "Europe/Warsaw")]);

    let err = Config::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid("DISPLAY_UTC_OFFSET", _)));
}
