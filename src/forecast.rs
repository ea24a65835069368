//! Forecast aggregation: raw provider samples to one summary per day.
//!
//! The first calendar date in the input is treated as today and left out,
//! since it only holds the remaining slots of a partial day.

use std::collections::HashMap;

use crate::error::AppResult;
use crate::models::{DailySummary, ForecastSample};

// ---

/// Most summaries produced by one aggregation run.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Long-form date rendering, e.g. `Tuesday 02 Jan`.
pub const LABEL_FORMAT: &str = "%A %d %b";

/// Group `samples` by calendar date and summarize every date after the first.
///
/// Samples are expected in ascending timestamp order, as the provider
/// delivers them. Only summarized dates are parsed; one that does not parse
/// aborts the whole run.
pub fn summarize_daily(samples: &[ForecastSample]) -> AppResult<Vec<DailySummary>> {
    // ---
    let groups = group_by_date(samples);

    let mut summaries = Vec::with_capacity(MAX_FORECAST_DAYS);
    for group in groups.into_iter().skip(1).take(MAX_FORECAST_DAYS) {
        let date = group[0].date()?;
        let summary = DailySummary {
            date,
            label: date.format(LABEL_FORMAT).to_string(),
            average_temperature: average_temperature(&group),
            representative_description: most_frequent_description(&group)
                .unwrap_or_default()
                .to_string(),
        };
        tracing::debug!(
            "Summarized {} ({} samples): {:.1}°C, {}",
            date,
            group.len(),
            summary.average_temperature,
            summary.representative_description
        );
        summaries.push(summary);
    }

    Ok(summaries)
}

/// Group samples by the date portion of their timestamp, keeping first-seen order.
///
/// Every group is non-empty.
fn group_by_date(samples: &[ForecastSample]) -> Vec<Vec<&ForecastSample>> {
    // ---
    let mut groups: Vec<Vec<&ForecastSample>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sample in samples {
        let date_text = sample.date_part();
        match index.get(date_text) {
            Some(&i) => groups[i].push(sample),
            None => {
                index.insert(date_text, groups.len());
                groups.push(vec![sample]);
            }
        }
    }
    groups
}

fn average_temperature(group: &[&ForecastSample]) -> f64 {
    // ---
    if group.is_empty() {
        return 0.0;
    }
    group.iter().map(|s| s.temperature).sum::<f64>() / group.len() as f64
}

/// The description occurring most often in `group`.
///
/// Which of several equally frequent descriptions wins is unspecified.
fn most_frequent_description<'a>(group: &[&'a ForecastSample]) -> Option<&'a str> {
    // ---
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &sample in group {
        *counts.entry(sample.description.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map(|(description, _)| description)
}
