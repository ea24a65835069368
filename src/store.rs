//! Forecast record store (SQLite).
//!
//! Every function takes the connection of the action that calls it; callers
//! open one connection per action with [`connect`] and drop it when done.
//! All statements are parameterized.

use sqlx::{Connection, SqliteConnection};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{FilterCriteria, NewForecastRecord, RecordKey, RecordUpdate, StoredForecastRecord};
use crate::query::{build_filter, build_update, substring_pattern, QueryArg};
use crate::schema::create_schema;

// ---

/// Open a fresh connection to the record store.
pub async fn connect(db_url: &str) -> Result<SqliteConnection, sqlx::Error> {
    // ---
    debug!("Opening record store connection: {}", db_url);
    SqliteConnection::connect(db_url).await
}

/// Create the schema if needed, on a connection of its own.
pub async fn init_store(db_url: &str) -> Result<(), sqlx::Error> {
    // ---
    let mut conn = connect(db_url).await?;
    create_schema(&mut conn).await?;
    conn.close().await
}

/// Insert all `records` in one transaction, returning how many were written.
pub async fn insert_records(
    conn: &mut SqliteConnection,
    records: &[NewForecastRecord],
) -> Result<u64, sqlx::Error> {
    // ---
    let mut tx = conn.begin().await?;
    let mut inserted = 0;

    for record in records {
        sqlx::query(
            r#"
            INSERT INTO weather (location, date, temperature, description)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&record.location)
        .bind(&record.date)
        .bind(record.temperature)
        .bind(&record.description)
        .execute(&mut *tx)
        .await?;
        inserted += 1;
    }

    tx.commit().await?;
    info!("Stored {} forecast records", inserted);
    Ok(inserted)
}

/// Fetch the records matching `criteria`, oldest first.
pub async fn read_records(
    conn: &mut SqliteConnection,
    criteria: &FilterCriteria,
) -> Result<Vec<StoredForecastRecord>, sqlx::Error> {
    // ---
    let filter = build_filter(criteria);
    let sql = format!(
        "SELECT id, location, date, temperature, description FROM weather WHERE {} ORDER BY id",
        filter.clause
    );
    debug!("Read records: {} {:?}", sql, filter.args);

    let mut query = sqlx::query_as::<_, StoredForecastRecord>(&sql);
    for arg in &filter.args {
        query = query.bind(arg);
    }
    query.fetch_all(&mut *conn).await
}

async fn count_matching(conn: &mut SqliteConnection, location: &str, date: &str) -> Result<i64, sqlx::Error> {
    // ---
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM weather WHERE location LIKE ? AND date = ?")
        .bind(substring_pattern(location))
        .bind(date)
        .fetch_one(&mut *conn)
        .await
}

/// Apply `update` to every record matching (location substring, exact date).
///
/// Fails with [`AppError::NotFound`] when nothing matches.
pub async fn update_records(conn: &mut SqliteConnection, update: &RecordUpdate) -> AppResult<u64> {
    // ---
    let statement = build_update(update).ok_or_else(|| {
        AppError::invalid("Nothing to update: provide a temperature and/or a description")
    })?;

    if count_matching(conn, &update.location, &update.date).await? == 0 {
        return Err(AppError::NotFound("No matching record.".to_string()));
    }

    let mut query = sqlx::query(&statement.sql);
    for arg in &statement.args {
        query = match arg {
            QueryArg::Text(text) => query.bind(text),
            QueryArg::Real(value) => query.bind(*value),
        };
    }
    let updated = query.execute(&mut *conn).await?.rows_affected();

    info!(
        "Updated {} record(s) for '{}' on {}",
        updated, update.location, update.date
    );
    Ok(updated)
}

/// Delete every record matching (location substring, exact date).
pub async fn delete_records(conn: &mut SqliteConnection, key: &RecordKey) -> Result<u64, sqlx::Error> {
    // ---
    let deleted = sqlx::query("DELETE FROM weather WHERE location LIKE ? AND date = ?")
        .bind(substring_pattern(&key.location))
        .bind(&key.date)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    info!("Deleted {} record(s) for '{}' on {}", deleted, key.location, key.date);
    Ok(deleted)
}
