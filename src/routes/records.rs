//! Create/read/update/delete of stored forecast records.
//!
//! Each handler opens its own store connection, runs its statement(s) and
//! closes the connection before responding.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::Connection;
use tracing::{debug, info};

use super::{AppState, OutputFormat};
use crate::error::AppResult;
use crate::models::{FetchRange, FetchRequest, FilterCriteria, NewForecastRecord, RecordKey, RecordUpdate};
use crate::render::render_records;
use crate::store;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route(
        "/records",
        get(read_handler)
            .post(create_handler)
            .put(update_handler)
            .delete(delete_handler),
    )
}

#[derive(Debug, Deserialize)]
struct ReadQuery {
    location: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct MutationResponse {
    count: u64,
    message: String,
}

/// `POST /records`: fetch the forecast and store the samples inside the range.
async fn create_handler(
    State((config, weather)): State<AppState>,
    Json(request): Json<FetchRequest>,
) -> AppResult<Response> {
    // ---
    let range = FetchRange::try_from(request)?;
    info!(
        "POST /records - {} from {} to {}",
        range.location, range.start, range.end
    );

    let samples = weather.forecast(&range.location).await?;
    let mut records = Vec::new();
    for sample in &samples {
        if range.contains(sample.date()?) {
            records.push(NewForecastRecord::from_sample(&range.location, sample));
        }
    }
    debug!(
        "{} of {} samples fall inside the range",
        records.len(),
        samples.len()
    );

    if records.is_empty() {
        let body = MutationResponse {
            count: 0,
            message: "No forecast data found.".to_string(),
        };
        return Ok((StatusCode::OK, Json(body)).into_response());
    }

    let mut conn = store::connect(&config.db_url).await?;
    let stored = store::insert_records(&mut conn, &records).await?;
    conn.close().await?;

    let body = MutationResponse {
        count: stored,
        message: format!("Stored {stored} entries."),
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// `GET /records`: list records matching the optional filters.
async fn read_handler(
    Query(params): Query<ReadQuery>,
    State((config, _)): State<AppState>,
) -> AppResult<Response> {
    // ---
    let criteria = FilterCriteria {
        location: params.location,
        start_date: params.start_date,
        end_date: params.end_date,
    }
    .validated()?;
    info!("GET /records - {:?}", criteria);

    let mut conn = store::connect(&config.db_url).await?;
    let rows = store::read_records(&mut conn, &criteria).await?;
    conn.close().await?;

    info!("Returning {} records", rows.len());
    Ok(match params.format {
        OutputFormat::Text => render_records(&rows).into_response(),
        OutputFormat::Json => Json(rows).into_response(),
    })
}

/// `PUT /records`: change temperature and/or description in place.
async fn update_handler(
    State((config, _)): State<AppState>,
    Json(update): Json<RecordUpdate>,
) -> AppResult<Json<MutationResponse>> {
    // ---
    let update = update.validated()?;
    info!("PUT /records - '{}' on {}", update.location, update.date);

    let mut conn = store::connect(&config.db_url).await?;
    let updated = store::update_records(&mut conn, &update).await?;
    conn.close().await?;

    Ok(Json(MutationResponse {
        count: updated,
        message: "Record updated.".to_string(),
    }))
}

/// `DELETE /records?location=&date=`
async fn delete_handler(
    Query(key): Query<RecordKey>,
    State((config, _)): State<AppState>,
) -> AppResult<Json<MutationResponse>> {
    // ---
    let key = key.validated()?;
    info!("DELETE /records - '{}' on {}", key.location, key.date);

    let mut conn = store::connect(&config.db_url).await?;
    let deleted = store::delete_records(&mut conn, &key).await?;
    conn.close().await?;

    let message = if deleted > 0 {
        format!("{deleted} record(s) deleted.")
    } else {
        "No matching records.".to_string()
    };
    Ok(Json(MutationResponse {
        count: deleted,
        message,
    }))
}
