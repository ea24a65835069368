//! Database schema management for `forecast-desk`.
//!
//! Ensures the forecast record table exists before serving requests.
//! Applied once on startup from `main.rs`.

use sqlx::{Connection, SqliteConnection};

// ---

/// Create the `weather` table and its lookup index (idempotent).
///
/// Safe to call on every startup; no-op if objects already exist.
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    // ---
    let mut tx = conn.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weather (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            location    TEXT NOT NULL,
            date        TEXT NOT NULL,
            temperature REAL NOT NULL,
            description TEXT NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Update and delete both key on (location, date)
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_weather_location_date
            ON weather (location, date);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
