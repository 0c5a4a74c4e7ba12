//! Data models for plant sensor readings.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::ValidationError;

// ---

/// Reading as submitted by a sensor gateway, before it is stored.
///
/// `timestamp` takes ISO-8601 with a `T` or space separator, optional
/// fractional seconds, and an optional UTC offset (converted to UTC and
/// stored without zone). A bare date means midnight.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReading {
    // ---
    #[serde(deserialize_with = "iso_timestamp")]
    pub timestamp: NaiveDateTime,
    pub zone_id: String,
    pub plant_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    pub light_level: f64,
    #[serde(default)]
    pub plant_height: Option<f64>,
    #[serde(default)]
    pub leaf_count: Option<i32>,
}

/// Stored sensor reading as returned by the reading store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reading {
    // ---
    pub id: Uuid,
    pub timestamp: NaiveDateTime,
    pub zone_id: String,
    pub plant_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    pub light_level: f64,
    pub plant_height: Option<f64>,
    pub leaf_count: Option<i32>,
}

/// Lower bound of the expected raw temperature range, in °C.
const TEMPERATURE_MIN_C: f64 = 10.0;

/// Upper bound of the expected raw temperature range, in °C.
const TEMPERATURE_MAX_C: f64 = 40.0;

/// Largest accepted `plant_height` magnitude. Keeps height differences and
/// the growth statistics built on them finite.
const PLANT_HEIGHT_LIMIT: f64 = 1e6;

fn iso_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp '{raw}'")))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    // ---
    let raw = raw.trim();
    let value = match raw.as_bytes().get(10) {
        Some(b' ') => format!("{}T{}", &raw[..10], &raw[11..]),
        _ => raw.to_string(),
    };

    if let Ok(naive) = value.parse::<NaiveDateTime>() {
        return Some(naive);
    }
    if let Ok(aware) = DateTime::parse_from_rfc3339(&value) {
        return Some(aware.naive_utc());
    }
    value.parse::<NaiveDate>().ok()?.and_hms_opt(0, 0, 0)
}

impl NewReading {
    // ---
    /// Reject readings that must never reach normalization or storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        // ---
        if self.zone_id.trim().is_empty() {
            return Err(ValidationError::EmptyField("zone_id"));
        }
        if self.plant_id.trim().is_empty() {
            return Err(ValidationError::EmptyField("plant_id"));
        }

        let measurements = [
            ("temperature", Some(self.temperature)),
            ("humidity", Some(self.humidity)),
            ("soil_moisture", Some(self.soil_moisture)),
            ("light_level", Some(self.light_level)),
            ("plant_height", self.plant_height),
        ];
        for (field, value) in measurements {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(ValidationError::NotFinite(field));
                }
            }
        }

        if let Some(height) = self.plant_height {
            if height.abs() > PLANT_HEIGHT_LIMIT {
                return Err(ValidationError::OutOfRange {
                    field: "plant_height",
                    limit: PLANT_HEIGHT_LIMIT,
                    value: height,
                });
            }
        }

        if let Some(count) = self.leaf_count {
            if count < 0 {
                return Err(ValidationError::NegativeLeafCount(count));
            }
        }

        Ok(())
    }

    /// Rescale raw sensor values in place.
    ///
    /// Temperature is mapped linearly from the 10–40 °C operating range and
    /// humidity from a 0–100 percentage; neither is clamped, so out-of-range
    /// inputs land outside `[0, 1]`. Soil moisture and light level are
    /// clamped to `[0, 1]`.
    pub fn normalize(&mut self) {
        // ---
        self.temperature =
            (self.temperature - TEMPERATURE_MIN_C) / (TEMPERATURE_MAX_C - TEMPERATURE_MIN_C);
        self.humidity /= 100.0;
        self.soil_moisture = self.soil_moisture.clamp(0.0, 1.0);
        self.light_level = self.light_level.clamp(0.0, 1.0);
    }

    /// Attach a fresh identifier, producing the stored representation.
    pub fn into_reading(self) -> Reading {
        // ---
        Reading {
            id: Uuid::new_v4(),
            timestamp: self.timestamp,
            zone_id: self.zone_id,
            plant_id: self.plant_id,
            temperature: self.temperature,
            humidity: self.humidity,
            soil_moisture: self.soil_moisture,
            light_level: self.light_level,
            plant_height: self.plant_height,
            leaf_count: self.leaf_count,
        }
    }
}
