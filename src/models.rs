//! Data models shared by the aggregator, the query builder and the HTTP surface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

// ---

/// Calendar date format used by the provider, the store and every request.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One timestamped forecast slot as delivered by the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    // ---
    /// `YYYY-MM-DD HH:MM:SS`; seconds may be omitted.
    pub timestamp: String,
    pub temperature: f64,
    pub description: String,
}

impl ForecastSample {
    // ---
    pub fn new(timestamp: &str, temperature: f64, description: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            temperature,
            description: description.to_string(),
        }
    }

    /// The calendar date portion of the timestamp, unparsed.
    pub fn date_part(&self) -> &str {
        self.timestamp.split_whitespace().next().unwrap_or_default()
    }

    /// Parse the calendar date. A sample comes from the provider, so a bad
    /// timestamp is reported as malformed upstream data.
    pub fn date(&self) -> AppResult<NaiveDate> {
        NaiveDate::parse_from_str(self.date_part(), DATE_FORMAT).map_err(|_| {
            AppError::MalformedUpstream(format!("invalid forecast timestamp '{}'", self.timestamp))
        })
    }
}

/// Aggregated view of every sample sharing one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    // ---
    pub date: NaiveDate,
    /// Long form of `date`, e.g. `Tuesday 02 Jan`.
    pub label: String,
    pub average_temperature: f64,
    pub representative_description: String,
}

/// Current conditions for a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    // ---
    pub location: String,
    pub country: String,
    pub temperature: f64,
    pub description: String,
    pub humidity: f64,
    pub wind_speed: f64,
}

/// A row of the `weather` table.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct StoredForecastRecord {
    // ---
    pub id: i64,
    pub location: String,
    pub date: String,
    pub temperature: f64,
    pub description: String,
}

/// Everything needed to create a record; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewForecastRecord {
    // ---
    pub location: String,
    pub date: String,
    pub temperature: f64,
    pub description: String,
}

impl NewForecastRecord {
    // ---
    pub fn from_sample(location: &str, sample: &ForecastSample) -> Self {
        Self {
            location: location.to_string(),
            date: sample.date_part().to_string(),
            temperature: sample.temperature,
            description: sample.description.clone(),
        }
    }
}

/// Optional constraints narrowing a record store lookup.
///
/// Blank strings coming from a form are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterCriteria {
    // ---
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterCriteria {
    // ---
    /// Drop blank fields and reject malformed or inverted dates.
    pub fn validated(self) -> AppResult<Self> {
        // ---
        let criteria = Self {
            location: non_blank(self.location),
            start_date: non_blank(self.start_date),
            end_date: non_blank(self.end_date),
        };

        let start = criteria.start_date.as_deref().map(parse_date).transpose()?;
        let end = criteria.end_date.as_deref().map(parse_date).transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            check_range(start, end)?;
        }

        Ok(criteria)
    }
}

/// Request to fetch a forecast and store the samples falling in a date range.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchRequest {
    // ---
    pub location: String,
    pub start_date: String,
    pub end_date: String,
}

/// A validated [`FetchRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRange {
    // ---
    pub location: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchRange {
    // ---
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl TryFrom<FetchRequest> for FetchRange {
    type Error = AppError;

    fn try_from(req: FetchRequest) -> AppResult<Self> {
        // ---
        let location = require_location(&req.location)?;
        let start = parse_date(&req.start_date)?;
        let end = parse_date(&req.end_date)?;
        check_range(start, end)?;
        Ok(Self {
            location,
            start,
            end,
        })
    }
}

/// In-place change to every record matching (location substring, exact date).
#[derive(Debug, Clone, Deserialize)]
pub struct RecordUpdate {
    // ---
    pub location: String,
    pub date: String,
    pub temperature: Option<f64>,
    pub description: Option<String>,
}

impl RecordUpdate {
    // ---
    pub fn validated(self) -> AppResult<Self> {
        // ---
        let location = require_location(&self.location)?;
        parse_date(&self.date)?;
        let description = non_blank(self.description);
        if self.temperature.is_none() && description.is_none() {
            return Err(AppError::invalid(
                "Nothing to update: provide a temperature and/or a description",
            ));
        }
        Ok(Self {
            location,
            date: self.date.trim().to_string(),
            temperature: self.temperature,
            description,
        })
    }
}

/// Selects records for deletion by (location substring, exact date).
#[derive(Debug, Clone, Deserialize)]
pub struct RecordKey {
    // ---
    pub location: String,
    pub date: String,
}

impl RecordKey {
    // ---
    pub fn validated(self) -> AppResult<Self> {
        let location = require_location(&self.location)?;
        parse_date(&self.date)?;
        Ok(Self {
            location,
            date: self.date.trim().to_string(),
        })
    }
}

// ---

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| AppError::invalid(format!("Invalid date '{s}', expected YYYY-MM-DD")))
}

fn check_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if end < start {
        return Err(AppError::invalid("End date must be after start date."));
    }
    Ok(())
}

pub fn require_location(location: &str) -> AppResult<String> {
    let location = location.trim();
    if location.is_empty() {
        return Err(AppError::invalid("Please enter a location."));
    }
    Ok(location.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
