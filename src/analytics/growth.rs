//! Growth-rate trends and their correlation with environmental factors.

use std::str::FromStr;

use anyhow::anyhow;
use serde::Serialize;

use super::{mean, pearson};
use crate::store::ReadingStore;
use crate::{AnalyticsError, ApiError, Reading};

// ---

const SECONDS_PER_DAY: f64 = 86_400.0;

/// How environmental values are paired with growth-rate samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrelationAlignment {
    /// Pair the i-th growth rate with the i-th reading of the sorted history,
    /// whether or not that reading contributed a growth sample.
    #[default]
    Positional,

    /// Pair each growth rate with the reading that closed its interval.
    Timestamp,
}

impl FromStr for CorrelationAlignment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(Self::Positional),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(anyhow!(
                "unknown correlation alignment '{other}' (expected 'positional' or 'timestamp')"
            )),
        }
    }
}

/// Pearson coefficient of each factor against the growth-rate sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalCorrelations {
    // ---
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub light_level: Option<f64>,
}

/// Growth analytics for a single plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthReport {
    // ---
    pub plant_id: String,
    pub average_growth_rate: f64,
    pub growth_rate_trends: Vec<f64>,
    pub environmental_correlations: EnvironmentalCorrelations,
}

/// One growth rate and the position of the reading that ended its interval.
#[derive(Debug, Clone, Copy)]
struct GrowthSample {
    rate: f64,
    closing_index: usize,
}

/// Fetch a plant's history and derive its growth report.
pub async fn compute_growth<S: ReadingStore>(
    store: &S,
    plant_id: &str,
    alignment: CorrelationAlignment,
) -> Result<GrowthReport, ApiError> {
    // ---
    let readings = store.fetch_by_plant(plant_id).await?;
    tracing::debug!("Computing growth for {} from {} readings", plant_id, readings.len());

    Ok(growth_report(plant_id, &readings, alignment)?)
}

/// Derive the growth report from a plant's readings in any order.
pub fn growth_report(
    plant_id: &str,
    readings: &[Reading],
    alignment: CorrelationAlignment,
) -> Result<GrowthReport, AnalyticsError> {
    // ---
    if readings.is_empty() {
        return Err(AnalyticsError::NotFound {
            what: "plant_id",
            id: plant_id.to_string(),
        });
    }

    let sorted = sorted_by_time(readings);
    let samples = growth_samples(&sorted);
    if samples.len() < 2 {
        return Err(AnalyticsError::InsufficientData(
            "compute growth rate trends or correlations.",
        ));
    }

    let rates: Vec<f64> = samples.iter().map(|s| s.rate).collect();
    let correlate = |factor: fn(&Reading) -> f64| {
        pearson(&rates, &factor_values(&sorted, &samples, alignment, factor))
    };

    let environmental_correlations = EnvironmentalCorrelations {
        temperature: correlate(temperature),
        humidity: correlate(humidity),
        light_level: correlate(light_level),
    };

    Ok(GrowthReport {
        plant_id: plant_id.to_string(),
        average_growth_rate: mean(&rates).unwrap_or(0.0),
        growth_rate_trends: rates,
        environmental_correlations,
    })
}

/// Readings in ascending timestamp order; ties keep their input order.
fn sorted_by_time(readings: &[Reading]) -> Vec<&Reading> {
    // ---
    let mut sorted: Vec<&Reading> = readings.iter().collect();
    sorted.sort_by_key(|r| r.timestamp);
    sorted
}

fn temperature(r: &Reading) -> f64 {
    r.temperature
}

fn humidity(r: &Reading) -> f64 {
    r.humidity
}

fn light_level(r: &Reading) -> f64 {
    r.light_level
}

/// Values of one factor to pair with the growth-rate sequence.
fn factor_values(
    sorted: &[&Reading],
    samples: &[GrowthSample],
    alignment: CorrelationAlignment,
    factor: fn(&Reading) -> f64,
) -> Vec<f64> {
    // ---
    match alignment {
        CorrelationAlignment::Positional => sorted.iter().map(|r| factor(r)).collect(),
        CorrelationAlignment::Timestamp => samples
            .iter()
            .map(|s| factor(sorted[s.closing_index]))
            .collect(),
    }
}

/// Growth rate (height units per day) for each adjacent pair of sorted
/// readings that both carry a height and are strictly apart in time.
/// Pairs whose rate is not finite are dropped.
fn growth_samples(sorted: &[&Reading]) -> Vec<GrowthSample> {
    // ---
    let mut samples = Vec::new();

    for (i, pair) in sorted.windows(2).enumerate() {
        let (prev, curr) = (pair[0], pair[1]);
        let (Some(h_prev), Some(h_curr)) = (prev.plant_height, curr.plant_height) else {
            continue;
        };

        let elapsed = curr.timestamp - prev.timestamp;
        let days = (elapsed.num_seconds() as f64 + f64::from(elapsed.subsec_nanos()) / 1e9)
            / SECONDS_PER_DAY;
        if days <= 0.0 {
            continue;
        }

        // Overflowing differences would serialize as null
        let rate = (h_curr - h_prev) / days;
        if rate.is_finite() {
            samples.push(GrowthSample {
                rate,
                closing_index: i + 1,
            });
        }
    }

    samples
}
