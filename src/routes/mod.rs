//! Route gateway: merges every subrouter and attaches the shared state.

use axum::Router;
use serde::Deserialize;

use crate::{Config, WeatherClient};

mod health;
mod records;
mod weather;

// ---

/// State shared by every handler. Both halves are cheap to clone.
pub type AppState = (Config, WeatherClient);

pub fn router(config: Config, weather: WeatherClient) -> Router {
    // ---
    Router::new()
        .merge(weather::router())
        .merge(records::router())
        .merge(health::router())
        .with_state((config, weather))
}

/// `?format=` selector shared by the read endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}
