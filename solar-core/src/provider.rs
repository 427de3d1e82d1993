use crate::{Config, Query, response::PowerResponse};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod nasa_power;

pub use nasa_power::NasaPowerProvider;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to send request to {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to read response body from {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of hourly irradiance and temperature readings for one point and day.
#[async_trait]
pub trait SolarDataProvider: Send + Sync + Debug {
    async fn fetch_hourly(&self, query: &Query) -> Result<PowerResponse, FetchError>;
}

/// Construct the POWER client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<NasaPowerProvider> {
    let community = config.community()?;
    Ok(NasaPowerProvider::new(config.base_url().to_string(), community))
}
