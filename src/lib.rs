//! `forecast-desk`: current weather, daily forecast summaries and a small
//! SQLite store of forecast records, served over HTTP.
//!
//! The aggregation ([`forecast`]) and query building ([`query`]) modules are
//! pure; the weather client, store and routes wrap them with I/O.

pub mod config;
pub mod error;
pub mod forecast;
pub mod models;
pub mod query;
pub mod render;
pub mod routes;
pub mod schema;
pub mod store;
pub mod weather;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{DailySummary, FilterCriteria, ForecastSample, StoredForecastRecord};
pub use weather::WeatherClient;
