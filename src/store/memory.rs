//! Process-local reading store, used when no `DATABASE_URL` is configured.

use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};

use super::{is_plant_instance, ReadingStore};
use crate::{NewReading, Reading};

// ---

/// Reading store holding every reading in a shared vector.
///
/// Clones share the same data. The lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct MemoryReadingStore {
    readings: Arc<RwLock<Vec<Reading>>>,
}

impl MemoryReadingStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    fn filter<F>(&self, keep: F) -> Result<Vec<Reading>>
    where
        F: Fn(&Reading) -> bool,
    {
        // ---
        let guard = self
            .readings
            .read()
            .map_err(|_| anyhow!("reading store lock poisoned"))?;

        Ok(guard.iter().filter(|r| keep(r)).cloned().collect())
    }
}

impl ReadingStore for MemoryReadingStore {
    // ---
    async fn fetch_by_plant(&self, plant_id: &str) -> Result<Vec<Reading>> {
        self.filter(|r| r.plant_id == plant_id)
    }

    async fn fetch_by_species_prefix(&self, species_id: &str) -> Result<Vec<Reading>> {
        self.filter(|r| r.plant_id.starts_with(species_id))
    }

    async fn fetch_by_zone(&self, zone_id: &str) -> Result<Vec<Reading>> {
        self.filter(|r| r.zone_id == zone_id)
    }

    async fn fetch_by_zone_and_plant(&self, zone_id: &str, plant_name: &str) -> Result<Vec<Reading>> {
        // ---
        let exact = is_plant_instance(plant_name);
        self.filter(|r| {
            r.zone_id == zone_id
                && if exact {
                    r.plant_id == plant_name
                } else {
                    r.plant_id.starts_with(plant_name)
                }
        })
    }

    async fn insert(&self, reading: &NewReading) -> Result<Reading> {
        // ---
        let stored = reading.clone().into_reading();
        self.readings
            .write()
            .map_err(|_| anyhow!("reading store lock poisoned"))?
            .push(stored.clone());

        Ok(stored)
    }

    async fn insert_batch(&self, readings: &[NewReading]) -> Result<usize> {
        // ---
        let stored: Vec<Reading> = readings.iter().cloned().map(NewReading::into_reading).collect();
        let count = stored.len();

        self.readings
            .write()
            .map_err(|_| anyhow!("reading store lock poisoned"))?
            .extend(stored);

        Ok(count)
    }
}
