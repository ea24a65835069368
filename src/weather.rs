//! Client for an OpenWeatherMap-compatible weather provider.
//!
//! Only two endpoints are used: `/weather` for current conditions and
//! `/forecast` for the 3-hourly multi-day forecast. Responses are reduced to
//! [`CurrentConditions`] and [`ForecastSample`] right here so nothing else in
//! the crate sees the provider's document shape.

use std::{fmt, time::Duration};

use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::{AppError, AppResult};
use crate::models::{CurrentConditions, ForecastSample};
use crate::config::mask_secret;
use crate::Config;

// ---

#[derive(Debug, Deserialize)]
struct RawCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct RawSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct RawWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    name: String,
    sys: RawSys,
    main: RawMain,
    weather: Vec<RawCondition>,
    wind: RawWind,
}

#[derive(Debug, Deserialize)]
struct RawForecastItem {
    dt_txt: String,
    main: RawMain,
    weather: Vec<RawCondition>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    list: Vec<RawForecastItem>,
}

/// Error body of a non-success response.
#[derive(Debug, Deserialize)]
struct RawError {
    message: Option<String>,
}

fn first_description(conditions: &[RawCondition]) -> String {
    conditions
        .first()
        .map(|c| c.description.clone())
        .unwrap_or_default()
}

impl From<RawCurrent> for CurrentConditions {
    fn from(raw: RawCurrent) -> Self {
        // ---
        Self {
            description: first_description(&raw.weather),
            location: raw.name,
            country: raw.sys.country,
            temperature: raw.main.temp,
            humidity: raw.main.humidity,
            wind_speed: raw.wind.speed,
        }
    }
}

impl From<RawForecastItem> for ForecastSample {
    fn from(raw: RawForecastItem) -> Self {
        Self {
            description: first_description(&raw.weather),
            timestamp: raw.dt_txt,
            temperature: raw.main.temp,
        }
    }
}

// ---

/// Weather provider client, built once from [`Config`] and shared by handlers.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &mask_secret(&self.api_key))
            .finish_non_exhaustive()
    }
}

impl WeatherClient {
    // ---
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get(&self, endpoint: &str, location: &str) -> AppResult<Response> {
        // ---
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} q={}", url, location);

        let response = self
            .client
            .get(&url)
            .query(&[("q", location), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;
        Ok(response)
    }

    /// Current conditions for `location`.
    #[instrument(skip(self))]
    pub async fn current(&self, location: &str) -> AppResult<CurrentConditions> {
        // ---
        let response = self.get("weather", location).await?;
        let raw: RawCurrent =
            check_status(response, "Failed to retrieve current weather.").await?.json().await?;
        info!("Current weather fetched for {}, {}", raw.name, raw.sys.country);
        Ok(raw.into())
    }

    /// Forecast samples for `location`, in the provider's (ascending) order.
    #[instrument(skip(self))]
    pub async fn forecast(&self, location: &str) -> AppResult<Vec<ForecastSample>> {
        // ---
        let response = self.get("forecast", location).await?;
        let raw: RawForecast =
            check_status(response, "Failed to retrieve forecast.").await?.json().await?;
        info!("Fetched {} forecast samples", raw.list.len());
        Ok(raw.list.into_iter().map(ForecastSample::from).collect())
    }
}

/// Turn a non-success response into [`AppError::Upstream`], preferring the
/// provider's own message over `fallback`.
async fn check_status(response: Response, fallback: &str) -> AppResult<Response> {
    // ---
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = provider_message(&body).unwrap_or_else(|| fallback.to_string());
    Err(AppError::Upstream {
        status: status.as_u16(),
        message,
    })
}

fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<RawError>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
}
