//! Reading store abstraction.
//!
//! Analytics and handlers only see the [`ReadingStore`] trait. Two backends
//! implement it: [`PgReadingStore`] for PostgreSQL and [`MemoryReadingStore`]
//! for runs without a database. `main.rs` picks one from the configuration.

use std::future::Future;

use anyhow::Result;

use crate::{NewReading, Reading};

mod memory;
mod postgres;

pub use memory::MemoryReadingStore;
pub use postgres::PgReadingStore;

// ---

/// Source and sink of plant sensor readings.
///
/// Fetches return readings in unspecified order and an empty vector (not an
/// error) when nothing matches. Inserts take readings that were already
/// validated and normalized.
pub trait ReadingStore: Clone + Send + Sync + 'static {
    // ---
    /// Readings whose `plant_id` equals `plant_id`.
    fn fetch_by_plant(&self, plant_id: &str) -> impl Future<Output = Result<Vec<Reading>>> + Send;

    /// Readings whose `plant_id` starts with `species_id` (literal prefix).
    fn fetch_by_species_prefix(
        &self,
        species_id: &str,
    ) -> impl Future<Output = Result<Vec<Reading>>> + Send;

    /// Readings recorded in `zone_id`.
    fn fetch_by_zone(&self, zone_id: &str) -> impl Future<Output = Result<Vec<Reading>>> + Send;

    /// Readings in `zone_id` for one plant, or for a whole species when
    /// `plant_name` carries no `_` instance suffix.
    fn fetch_by_zone_and_plant(
        &self,
        zone_id: &str,
        plant_name: &str,
    ) -> impl Future<Output = Result<Vec<Reading>>> + Send;

    /// Store one reading and return it with its assigned id.
    fn insert(&self, reading: &NewReading) -> impl Future<Output = Result<Reading>> + Send;

    /// Store all readings atomically; returns how many were written.
    fn insert_batch(&self, readings: &[NewReading]) -> impl Future<Output = Result<usize>> + Send;
}

/// Whether a zone/plant lookup names a single plant instance.
fn is_plant_instance(plant_name: &str) -> bool {
    // ---
    plant_name.contains('_')
}
