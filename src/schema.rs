//! Database schema management for `plantwatch-analytics`.
//!
//! Ensures required tables and indexes exist before serving requests.
//! Applied once on startup from `main.rs` when a database is configured.

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates the `plant_readings` table holding normalized sensor readings,
/// plus indexes for the plant and zone lookups. Safe to
/// call on every startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS plant_readings (
            id            UUID             PRIMARY KEY,
            timestamp     TIMESTAMP        NOT NULL,
            zone_id       TEXT             NOT NULL,
            plant_id      TEXT             NOT NULL,
            temperature   DOUBLE PRECISION NOT NULL,
            humidity      DOUBLE PRECISION NOT NULL,
            soil_moisture DOUBLE PRECISION NOT NULL,
            light_level   DOUBLE PRECISION NOT NULL,
            plant_height  DOUBLE PRECISION,
            leaf_count    INTEGER,
            created_at    TIMESTAMP        NOT NULL DEFAULT (NOW() AT TIME ZONE 'utc')
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_plant_readings_plant_id
            ON plant_readings (plant_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_plant_readings_zone_id
            ON plant_readings (zone_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
