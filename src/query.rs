//! Parameterized SQL fragments built from optional request fields.
//!
//! Nothing here touches the database. The store binds `args` in order
//! against the `?` placeholders of the produced text.

use crate::models::{FilterCriteria, RecordUpdate};

// ---

/// Predicate that matches every stored record.
pub const MATCH_ALL: &str = "1=1";

/// A `WHERE` clause and its bound values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    // ---
    pub clause: String,
    pub args: Vec<String>,
}

/// A bound value of an update statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    Text(String),
    Real(f64),
}

/// A complete `UPDATE` statement and its bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    // ---
    pub sql: String,
    pub args: Vec<QueryArg>,
}

/// Wrap a location so that `LIKE` matches it as a substring.
pub fn substring_pattern(location: &str) -> String {
    format!("%{location}%")
}

/// Build the filter for a read, refining [`MATCH_ALL`] with one `AND` clause
/// per present field: location, then start date, then end date.
pub fn build_filter(criteria: &FilterCriteria) -> FilterQuery {
    // ---
    let mut clause = String::from(MATCH_ALL);
    let mut args = Vec::new();

    if let Some(location) = &criteria.location {
        clause.push_str(" AND location LIKE ?");
        args.push(substring_pattern(location));
    }
    if let Some(start) = &criteria.start_date {
        clause.push_str(" AND date >= ?");
        args.push(start.clone());
    }
    if let Some(end) = &criteria.end_date {
        clause.push_str(" AND date <= ?");
        args.push(end.clone());
    }

    FilterQuery { clause, args }
}

/// Build the statement for an in-place update of temperature and/or
/// description. Returns `None` when the update carries neither.
pub fn build_update(update: &RecordUpdate) -> Option<UpdateQuery> {
    // ---
    let mut assignments = Vec::with_capacity(2);
    let mut args = Vec::with_capacity(4);

    if let Some(temperature) = update.temperature {
        assignments.push("temperature = ?");
        args.push(QueryArg::Real(temperature));
    }
    if let Some(description) = &update.description {
        assignments.push("description = ?");
        args.push(QueryArg::Text(description.clone()));
    }
    if assignments.is_empty() {
        return None;
    }

    args.push(QueryArg::Text(substring_pattern(&update.location)));
    args.push(QueryArg::Text(update.date.clone()));

    Some(UpdateQuery {
        sql: format!(
            "UPDATE weather SET {} WHERE location LIKE ? AND date = ?",
            assignments.join(", ")
        ),
        args,
    })
}
