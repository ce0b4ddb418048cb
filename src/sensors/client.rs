use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;
use crate::sensors::models::{Measurement, Sensor};

/// Failure of a single call to the remote measurement API.
///
/// None of these are retried; callers propagate them as-is.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct SensorClient {
    http_client: Client,
    base_url: String,
}

impl SensorClient {
    /// Build a client for the API at `base_url`.
    ///
    /// `timeout` bounds each whole request; `None` leaves reqwest's default
    /// (no timeout) in place.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the TLS backend cannot be initialised.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|source| ClientError::Network {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// # Errors
    ///
    /// See [`SensorClient::new`].
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(
            &config.sensor_api_base_url,
            config.sensor_api_timeout_seconds.map(Duration::from_secs),
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Most recent reading of one sensor.
    ///
    /// # Errors
    ///
    /// `Network` on transport failure, `HttpStatus` on a non-2xx response,
    /// `Decode` if the body is not a measurement.
    pub async fn fetch_latest(&self, sensor_id: &str) -> Result<Measurement, ClientError> {
        let url = format!("{}/latest/{}", self.base_url, sensor_id);
        let measurement: Measurement = self.get_json(&url).await?;
        tracing::debug!(
            sensor_id = %sensor_id,
            timestamp = measurement.timestamp,
            "latest_fetched"
        );
        Ok(measurement)
    }

    /// Page of historical readings after skipping `skip` most recent records.
    ///
    /// # Errors
    ///
    /// Same as [`SensorClient::fetch_latest`].
    pub async fn fetch_page(&self, skip: usize) -> Result<Vec<Measurement>, ClientError> {
        let url = format!("{}/data/{}", self.base_url, skip);
        let page: Vec<Measurement> = self.get_json(&url).await?;
        tracing::debug!(skip, count = page.len(), "page_fetched");
        Ok(page)
    }

    /// Latest reading of every sensor, fetched concurrently, in sensor order.
    ///
    /// # Errors
    ///
    /// Fails with the first error any of the requests produces.
    pub async fn fetch_latest_all(
        &self,
        sensors: &[Sensor],
    ) -> Result<Vec<Measurement>, ClientError> {
        try_join_all(sensors.iter().map(|s| self.fetch_latest(&s.id))).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| {
                tracing::warn!(url = %url, error = %source, "request_failed");
                ClientError::Network {
                    url: url.to_string(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body_preview: String = body.chars().take(200).collect();
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                body_preview = %body_preview,
                "unexpected_status"
            );
            return Err(ClientError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let text = response.text().await.map_err(|source| ClientError::Network {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| {
            tracing::error!(
                url = %url,
                error = %source,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to decode measurement response"
            );
            ClientError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }
}
