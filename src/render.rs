//! Plain-text rendering of weather data and stored records.

use crate::models::{CurrentConditions, DailySummary, StoredForecastRecord};

// ---

/// Capitalize the first letter of every word, lowercasing the rest.
pub fn title_case(text: &str) -> String {
    // ---
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Format a reading so whole numbers keep one decimal (`5.0`, not `5`).
pub fn decimal(value: f64) -> String {
    // ---
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

pub fn render_current(current: &CurrentConditions) -> String {
    format!(
        "Location: {}, {}\nTemperature: {} °C\nCondition: {}\nHumidity: {}%\nWind Speed: {} m/s\n",
        current.location,
        current.country,
        decimal(current.temperature),
        title_case(&current.description),
        current.humidity,
        decimal(current.wind_speed)
    )
}

pub fn render_forecast(summaries: &[DailySummary]) -> String {
    // ---
    let mut out = String::from("5-Day Forecast:\n");
    for s in summaries {
        out.push_str(&format!(
            "{}: {:.1}°C, {}\n",
            s.label,
            s.average_temperature,
            title_case(&s.representative_description)
        ));
    }
    out
}

pub fn render_records(records: &[StoredForecastRecord]) -> String {
    // ---
    if records.is_empty() {
        return "No records found.\n".to_string();
    }
    records
        .iter()
        .map(|r| {
            format!(
                "{} | {} | {} | {}°C | {}\n",
                r.id,
                r.location,
                r.date,
                decimal(r.temperature),
                title_case(&r.description)
            )
        })
        .collect()
}
