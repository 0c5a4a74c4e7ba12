//! Observed environmental envelopes per species.

use serde::Serialize;

use crate::store::ReadingStore;
use crate::{AnalyticsError, ApiError, Reading};

// ---

/// `(min, max)` of each factor, `None` when no reading carries it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalConditions {
    // ---
    pub temperature_range: Option<(f64, f64)>,
    pub humidity_range: Option<(f64, f64)>,
    pub soil_moisture_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalReport {
    // ---
    pub species_id: String,
    pub optimal_conditions: OptimalConditions,
}

/// Fetch every reading of a species and reduce it to per-factor ranges.
pub async fn compute_optimal_conditions<S: ReadingStore>(
    store: &S,
    species_id: &str,
) -> Result<OptimalReport, ApiError> {
    // ---
    let readings = store.fetch_by_species_prefix(species_id).await?;
    tracing::debug!(
        "Computing optimal conditions for {} from {} readings",
        species_id,
        readings.len()
    );

    Ok(optimal_report(species_id, &readings)?)
}

pub fn optimal_report(species_id: &str, readings: &[Reading]) -> Result<OptimalReport, AnalyticsError> {
    // ---
    if readings.is_empty() {
        return Err(AnalyticsError::NotFound {
            what: "species_id",
            id: species_id.to_string(),
        });
    }

    Ok(OptimalReport {
        species_id: species_id.to_string(),
        optimal_conditions: OptimalConditions {
            temperature_range: range(readings.iter().map(|r| r.temperature)),
            humidity_range: range(readings.iter().map(|r| r.humidity)),
            soil_moisture_range: range(readings.iter().map(|r| r.soil_moisture)),
        },
    })
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    // ---
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::store::MemoryReadingStore;
    use crate::NewReading;
    use chrono::NaiveDate;

    fn new_reading(plant_id: &str, temperature: f64, humidity: f64, soil: f64) -> NewReading {
        // ---
        NewReading {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 3)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            zone_id: "zone_3".to_string(),
            plant_id: plant_id.to_string(),
            temperature,
            humidity,
            soil_moisture: soil,
            light_level: 0.8,
            plant_height: None,
            leaf_count: None,
        }
    }

    fn basil_store() -> MemoryReadingStore {
        // ---
        let store = MemoryReadingStore::new();
        let batch = vec![
            new_reading("basil_1", 0.45, 0.60, 0.66),
            new_reading("basil_2", 0.52, 0.57, 0.62),
            new_reading("basil_1", 0.48, 0.63, 0.69),
            new_reading("cilantro_1", 0.90, 0.10, 0.10),
        ];
        tokio_test::block_on(store.insert_batch(&batch)).unwrap();
        store
    }

    #[test]
    fn test_ranges_are_min_max() {
        // ---
        let store = basil_store();
        let report = tokio_test::block_on(compute_optimal_conditions(&store, "basil")).unwrap();

        assert_eq!(report.species_id, "basil");
        let c = report.optimal_conditions;
        assert_eq!(c.temperature_range, Some((0.45, 0.52)));
        assert_eq!(c.humidity_range, Some((0.57, 0.63)));
        assert_eq!(c.soil_moisture_range, Some((0.62, 0.69)));
    }

    #[test]
    fn test_unknown_species_is_not_found() {
        // ---
        let store = MemoryReadingStore::new();
        let batch = vec![
            new_reading("basil_1", 0.45, 0.60, 0.66),
            new_reading("basil_2", 0.52, 0.57, 0.62),
        ];
        tokio_test::block_on(store.insert_batch(&batch)).unwrap();

        let err = tokio_test::block_on(compute_optimal_conditions(&store, "cilantro")).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Analytics(AnalyticsError::NotFound { what: "species_id", .. })
        ));
    }

    #[test]
    fn test_single_reading_range_collapses() {
        // ---
        let readings = vec![new_reading("cilantro_1", 0.9, 0.1, 0.1).into_reading()];
        let report = optimal_report("cilantro", &readings).unwrap();
        assert_eq!(report.optimal_conditions.temperature_range, Some((0.9, 0.9)));
    }

    #[test]
    fn test_report_is_idempotent() {
        // ---
        let store = basil_store();
        let first = tokio_test::block_on(compute_optimal_conditions(&store, "basil")).unwrap();
        let second = tokio_test::block_on(compute_optimal_conditions(&store, "basil")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_range_of_nothing_is_none() {
        // ---
        assert_eq!(range(std::iter::empty()), None);
    }

    #[test]
    fn test_serializes_ranges_as_pairs() {
        // ---
        let readings = vec![new_reading("basil_1", 0.4, 0.6, 0.5).into_reading()];
        let json = serde_json::to_value(optimal_report("basil", &readings).unwrap()).unwrap();
        assert_eq!(
            json["optimal_conditions"]["temperature_range"],
            serde_json::json!([0.4, 0.4])
        );
    }
}
