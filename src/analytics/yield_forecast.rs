//! Zone yield projection from current plant heights.
//!
//! The projection is `count(heights) * mean(heights)`, a coarse proxy that
//! stands in for a real yield model. The timeframe label always points 30
//! days past the moment of computation, not past the data.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{mean, round2};
use crate::store::ReadingStore;
use crate::{AnalyticsError, ApiError, Reading};

// ---

const FORECAST_HORIZON_DAYS: i64 = 30;

const SUGGESTIONS: &str = "Consider optimizing temperature and humidity for better yield.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldReport {
    // ---
    pub zone_id: String,
    pub predicted_yield: f64,
    pub prediction_timeframe: String,
    pub suggestions: String,
}

/// Fetch a zone's readings and project its yield as of `now`.
pub async fn compute_yield<S: ReadingStore>(
    store: &S,
    zone_id: &str,
    now: DateTime<Utc>,
) -> Result<YieldReport, ApiError> {
    // ---
    let readings = store.fetch_by_zone(zone_id).await?;
    tracing::debug!("Computing yield for {} from {} readings", zone_id, readings.len());

    Ok(yield_report(zone_id, &readings, now)?)
}

pub fn yield_report(
    zone_id: &str,
    readings: &[Reading],
    now: DateTime<Utc>,
) -> Result<YieldReport, AnalyticsError> {
    // ---
    if readings.is_empty() {
        return Err(AnalyticsError::NotFound {
            what: "zone_id",
            id: zone_id.to_string(),
        });
    }

    let heights: Vec<f64> = readings.iter().filter_map(|r| r.plant_height).collect();
    let Some(average_height) = mean(&heights) else {
        return Err(AnalyticsError::InsufficientData("calculate yield prediction."));
    };

    let target = now + Duration::days(FORECAST_HORIZON_DAYS);

    Ok(YieldReport {
        zone_id: zone_id.to_string(),
        predicted_yield: round2(heights.len() as f64 * average_height),
        prediction_timeframe: format!("By {}", target.format("%B %Y")),
        suggestions: SUGGESTIONS.to_string(),
    })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use uuid::Uuid;

    fn reading(height: Option<f64>) -> Reading {
        // ---
        Reading {
            id: Uuid::new_v4(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            zone_id: "zone_2".to_string(),
            plant_id: "lettuce_1".to_string(),
            temperature: 0.4,
            humidity: 0.7,
            soil_moisture: 0.8,
            light_level: 0.6,
            plant_height: height,
            leaf_count: None,
        }
    }

    fn mid_january() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_missing_heights_are_ignored() {
        // ---
        let readings = vec![reading(Some(10.0)), reading(Some(11.0)), reading(None)];
        let report = yield_report("zone_2", &readings, mid_january()).unwrap();

        // count = 2, mean = 10.5
        assert_eq!(report.predicted_yield, 21.0);
    }

    #[test]
    fn test_yield_is_rounded_to_two_places() {
        // ---
        let readings = vec![reading(Some(10.123)), reading(Some(11.457)), reading(Some(9.9))];
        let report = yield_report("zone_2", &readings, mid_january()).unwrap();

        let heights = [10.123, 11.457, 9.9];
        let expected = round2(3.0 * (heights.iter().sum::<f64>() / 3.0));
        assert_eq!(report.predicted_yield, expected);
        assert_eq!(report.predicted_yield, 31.48);
    }

    #[test]
    fn test_timeframe_is_thirty_days_from_now() {
        // ---
        let readings = vec![reading(Some(10.0))];

        let report = yield_report("zone_2", &readings, mid_january()).unwrap();
        assert_eq!(report.prediction_timeframe, "By February 2024");

        // Year rollover
        let december = Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap();
        let report = yield_report("zone_2", &readings, december).unwrap();
        assert_eq!(report.prediction_timeframe, "By January 2025");
    }

    #[test]
    fn test_suggestions_are_static() {
        // ---
        let a = yield_report("zone_2", &[reading(Some(1.0))], mid_january()).unwrap();
        let b = yield_report("zone_2", &[reading(Some(50.0))], mid_january()).unwrap();
        assert_eq!(a.suggestions, b.suggestions);
        assert_eq!(a.suggestions, SUGGESTIONS);
    }

    #[test]
    fn test_empty_zone_is_not_found() {
        // ---
        let err = yield_report("zone_9", &[], mid_january()).unwrap_err();
        assert!(matches!(err, AnalyticsError::NotFound { what: "zone_id", .. }));
    }

    #[test]
    fn test_zone_without_heights_is_insufficient() {
        // ---
        let readings = vec![reading(None), reading(None)];
        assert_eq!(
            yield_report("zone_2", &readings, mid_january()),
            Err(AnalyticsError::InsufficientData("calculate yield prediction."))
        );
    }

    #[test]
    fn test_report_is_idempotent() {
        // ---
        let readings = vec![reading(Some(10.0)), reading(Some(12.5))];
        assert_eq!(
            yield_report("zone_2", &readings, mid_january()),
            yield_report("zone_2", &readings, mid_january())
        );
    }
}
