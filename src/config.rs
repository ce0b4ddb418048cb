use std::env;
use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};

use crate::sensors::Sensor;

#[derive(Debug, Clone)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Remote measurement API
    pub sensor_api_base_url: String,
    pub sensor_api_timeout_seconds: Option<u64>,
    pub sensors: Vec<Sensor>,

    // Pagination
    pub table_page_size: usize,
    pub chart_page_size: usize,
    pub session_idle_seconds: u64,

    // Chart rendering
    pub display_offset: FixedOffset,
    pub chart_font_path: Option<PathBuf>,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Rate limiting
    pub disable_rate_limiting: bool,
    pub rate_limit_chart_per_second: u64,
    pub rate_limit_chart_burst: u32,

    // Static export
    pub build_static: bool,
    pub static_output_dir: PathBuf,
    pub static_api_base: String,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `SENSORS` is not set and
    /// `ConfigError::Invalid` if a value cannot be interpreted.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Numeric and boolean settings fall back to their defaults when unset or
    /// unparsable; `SENSORS` and `DISPLAY_UTC_OFFSET` are validated strictly.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let sensors = parse_sensors(&lookup("SENSORS").ok_or(ConfigError::Missing("SENSORS"))?)?;

        let display_offset = match lookup("DISPLAY_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw)?,
            None => utc(),
        };

        Ok(Self {
            // Remote measurement API
            sensor_api_base_url: parsed("SENSOR_API_BASE_URL", "https://sensors.bieda.it")
                .trim_end_matches('/')
                .to_string(),
            sensor_api_timeout_seconds: lookup("SENSOR_API_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok()),
            sensors,

            // Pagination
            table_page_size: parsed("TABLE_PAGE_SIZE", "100").parse().unwrap_or(100),
            chart_page_size: parsed("CHART_PAGE_SIZE", "2000").parse().unwrap_or(2000),
            session_idle_seconds: parsed("SESSION_IDLE_SECONDS", "1800")
                .parse()
                .unwrap_or(1800), // 30 minutes default

            // Chart rendering
            display_offset,
            chart_font_path: lookup("CHART_FONT_PATH").map(PathBuf::from),

            // API settings
            api_host: parsed("API_HOST", "0.0.0.0"),
            api_port: parsed("API_PORT", "8080").parse().unwrap_or(8080),

            // Rate limiting
            disable_rate_limiting: parsed("DISABLE_RATE_LIMITING", "false")
                .parse()
                .unwrap_or(false),
            rate_limit_chart_per_second: parsed("RATE_LIMIT_CHART_PER_SECOND", "2")
                .parse()
                .unwrap_or(2),
            rate_limit_chart_burst: parsed("RATE_LIMIT_CHART_BURST", "10")
                .parse()
                .unwrap_or(10),

            // Static export
            build_static: parsed("BUILD_STATIC", "false").parse().unwrap_or(false),
            static_output_dir: PathBuf::from(parsed("STATIC_OUTPUT_DIR", ".")),
            static_api_base: parsed("STATIC_API_BASE", ""),

            // Application metadata
            deployment: Deployment::from_str(&parsed("DEPLOYMENT", "local")),
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Room name for a sensor id, if the sensor is configured.
    #[must_use]
    pub fn room_name(&self, sensor_id: &str) -> Option<&str> {
        self.sensors
            .iter()
            .find(|s| s.id == sensor_id)
            .map(|s| s.room.as_str())
    }
}

/// Parse `id=Room,id2=Other room` into sensors, keeping the given order.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` for entries without `=`, with an empty id,
/// or for duplicate ids.
pub fn parse_sensors(raw: &str) -> Result<Vec<Sensor>, ConfigError> {
    let mut sensors: Vec<Sensor> = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (id, room) = entry
            .split_once('=')
            .ok_or_else(|| {
                ConfigError::Invalid("SENSORS", format!("expected id=room, got '{entry}'"))
            })?;
        let id = id.trim();
        if id.is_empty() {
            return Err(ConfigError::Invalid("SENSORS", format!("empty sensor id in '{entry}'")));
        }
        if sensors.iter().any(|s| s.id == id) {
            return Err(ConfigError::Invalid("SENSORS", format!("duplicate sensor id '{id}'")));
        }
        sensors.push(Sensor {
            id: id.to_string(),
            room: room.trim().to_string(),
        });
    }

    if sensors.is_empty() {
        return Err(ConfigError::Invalid("SENSORS", "no sensors configured".to_string()));
    }

    Ok(sensors)
}

/// Parse a UTC offset such as `+02:00`, `-05:30` or `Z`.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` if the offset is malformed or out of range.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(utc());
    }

    let invalid =
        || ConfigError::Invalid("DISPLAY_UTC_OFFSET", format!("'{raw}' is not like +HH:MM"));

    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn utc() -> FixedOffset {
    Utc.fix()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
