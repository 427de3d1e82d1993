use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    Query,
    config::Community,
    response::{PowerResponse, SOLAR_INTENSITY_PARAM, TEMPERATURE_PARAM},
};

use super::{FetchError, SolarDataProvider};

const HOURLY_POINT_PATH: &str = "/api/temporal/hourly/point";

/// Client for the NASA POWER hourly point endpoint.
#[derive(Debug, Clone)]
pub struct NasaPowerProvider {
    endpoint: String,
    community: Community,
    http: Client,
}

impl NasaPowerProvider {
    pub fn new(base_url: String, community: Community) -> Self {
        let endpoint = format!("{}{HOURLY_POINT_PATH}", base_url.trim_end_matches('/'));

        Self { endpoint, community, http: Client::new() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn community(&self) -> Community {
        self.community
    }

    /// Query string for a single-day request; start and end are the same day.
    pub fn query_params(&self, query: &Query) -> Vec<(&'static str, String)> {
        let day = query.date().format("%Y%m%d").to_string();

        vec![
            ("start", day.clone()),
            ("end", day),
            ("latitude", query.latitude().to_string()),
            ("longitude", query.longitude().to_string()),
            ("community", self.community.as_str().to_string()),
            ("parameters", format!("{SOLAR_INTENSITY_PARAM},{TEMPERATURE_PARAM}")),
            ("format", "JSON".to_string()),
        ]
    }
}

#[async_trait]
impl SolarDataProvider for NasaPowerProvider {
    async fn fetch_hourly(&self, query: &Query) -> Result<PowerResponse, FetchError> {
        let url = self.endpoint.clone();
        debug!(
            %url,
            latitude = query.latitude(),
            longitude = query.longitude(),
            date = %query.date(),
            "requesting hourly point data"
        );

        let res = self
            .http
            .get(&url)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(|source| FetchError::Request { url: url.clone(), source })?;

        let status = res.status();
        let body =
            res.text().await.map_err(|source| FetchError::Body { url: url.clone(), source })?;

        if !status.is_success() {
            return Err(FetchError::Status { url, status, body: truncate_body(&body) });
        }

        let parsed: PowerResponse =
            serde_json::from_str(&body).map_err(|source| FetchError::Decode { url, source })?;

        info!(bytes = body.len(), "received hourly point data");

        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query() -> Query {
        Query::new(28.6, 77.2, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).unwrap()
    }

    #[test]
    fn builds_single_day_query() {
        let provider = NasaPowerProvider::new("https://power.larc.nasa.gov".into(), Community::Re);
        let params = provider.query_params(&query());

        let expected: Vec<(&str, String)> = vec![
            ("start", "20240601".into()),
            ("end", "20240601".into()),
            ("latitude", "28.6".into()),
            ("longitude", "77.2".into()),
            ("community", "RE".into()),
            ("parameters", "ALLSKY_SFC_SW_DWN,T2M".into()),
            ("format", "JSON".into()),
        ];
        assert_eq!(params, expected);
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let provider = NasaPowerProvider::new("http://localhost:1234/".into(), Community::Sb);
        assert_eq!(provider.endpoint(), "http://localhost:1234/api/temporal/hourly/point");
    }

    #[test]
    fn truncate_body_limits_length_on_char_boundary() {
        assert_eq!(truncate_body("short"), "short");

        let long = "é".repeat(150);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
