//! PostgreSQL-backed reading store.

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{is_plant_instance, ReadingStore};
use crate::{NewReading, Reading};

// ---

const SELECT_READINGS: &str = r#"
    SELECT id, timestamp, zone_id, plant_id,
           temperature, humidity, soil_moisture, light_level,
           plant_height, leaf_count
    FROM plant_readings
"#;

const INSERT_READING: &str = r#"
    INSERT INTO plant_readings (
        id, timestamp, zone_id, plant_id,
        temperature, humidity, soil_moisture, light_level,
        plant_height, leaf_count
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
"#;

/// Reading store over a shared sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    // ---
    /// Open a pool against `db_url` with at most `max_connections`.
    pub async fn connect(db_url: &str, max_connections: u32) -> Result<Self> {
        // ---
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await
            .with_context(|| "Failed to connect to database")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_where(&self, clause: &str, binds: &[&str]) -> Result<Vec<Reading>> {
        // ---
        let sql = format!("{SELECT_READINGS} WHERE {clause}");
        let mut query = sqlx::query_as::<_, Reading>(&sql);
        for value in binds {
            query = query.bind(*value);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Query failed: WHERE {clause}"))?;

        tracing::debug!("Fetched {} readings WHERE {} {:?}", rows.len(), clause, binds);
        Ok(rows)
    }
}

/// Bind every column of `reading` to [`INSERT_READING`].
fn bind_insert<'q>(
    reading: &'q Reading,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    // ---
    sqlx::query(INSERT_READING)
        .bind(reading.id)
        .bind(reading.timestamp)
        .bind(&reading.zone_id)
        .bind(&reading.plant_id)
        .bind(reading.temperature)
        .bind(reading.humidity)
        .bind(reading.soil_moisture)
        .bind(reading.light_level)
        .bind(reading.plant_height)
        .bind(reading.leaf_count)
}

impl ReadingStore for PgReadingStore {
    // ---
    async fn fetch_by_plant(&self, plant_id: &str) -> Result<Vec<Reading>> {
        self.fetch_where("plant_id = $1", &[plant_id]).await
    }

    async fn fetch_by_species_prefix(&self, species_id: &str) -> Result<Vec<Reading>> {
        // starts_with() keeps `_` and `%` literal, unlike LIKE
        self.fetch_where("starts_with(plant_id, $1)", &[species_id])
            .await
    }

    async fn fetch_by_zone(&self, zone_id: &str) -> Result<Vec<Reading>> {
        self.fetch_where("zone_id = $1", &[zone_id]).await
    }

    async fn fetch_by_zone_and_plant(&self, zone_id: &str, plant_name: &str) -> Result<Vec<Reading>> {
        // ---
        if is_plant_instance(plant_name) {
            self.fetch_where("zone_id = $1 AND plant_id = $2", &[zone_id, plant_name])
                .await
        } else {
            self.fetch_where(
                "zone_id = $1 AND starts_with(plant_id, $2)",
                &[zone_id, plant_name],
            )
            .await
        }
    }

    async fn insert(&self, reading: &NewReading) -> Result<Reading> {
        // ---
        let stored = reading.clone().into_reading();
        bind_insert(&stored)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to store reading for {}", stored.plant_id))?;

        Ok(stored)
    }

    async fn insert_batch(&self, readings: &[NewReading]) -> Result<usize> {
        // ---
        let mut tx = self.pool.begin().await?;

        for reading in readings {
            let stored = reading.clone().into_reading();
            bind_insert(&stored)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to store reading for {}", stored.plant_id))?;
        }

        tx.commit().await?;
        Ok(readings.len())
    }
}
