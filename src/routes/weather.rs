//! Current conditions and daily forecast lookups.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AppState, OutputFormat};
use crate::error::AppResult;
use crate::forecast::summarize_daily;
use crate::models::{require_location, CurrentConditions, DailySummary};
use crate::render::{render_current, render_forecast};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/weather/current", get(current))
        .route("/weather/forecast", get(forecast))
}

#[derive(Debug, Deserialize)]
struct LocationQuery {
    #[serde(default)]
    location: String,
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ForecastResponse {
    current: CurrentConditions,
    daily: Vec<DailySummary>,
}

async fn current(
    Query(params): Query<LocationQuery>,
    State((_, weather)): State<AppState>,
) -> AppResult<Response> {
    // ---
    let location = require_location(&params.location)?;
    info!("GET /weather/current - {}", location);

    let current = weather.current(&location).await?;

    Ok(match params.format {
        OutputFormat::Text => render_current(&current).into_response(),
        OutputFormat::Json => Json(current).into_response(),
    })
}

async fn forecast(
    Query(params): Query<LocationQuery>,
    State((_, weather)): State<AppState>,
) -> AppResult<Response> {
    // ---
    let location = require_location(&params.location)?;
    info!("GET /weather/forecast - {}", location);

    let current = weather.current(&location).await?;
    let samples = weather.forecast(&location).await?;
    let daily = summarize_daily(&samples)?;

    Ok(match params.format {
        OutputFormat::Text => {
            let text = format!("{}\n{}", render_current(&current), render_forecast(&daily));
            text.into_response()
        }
        OutputFormat::Json => Json(ForecastResponse { current, daily }).into_response(),
    })
}
