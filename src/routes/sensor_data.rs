use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::AppState;
use crate::store::ReadingStore;
use crate::{AnalyticsError, ApiError, NewReading, Reading, ValidationError};

// ---

pub fn router<S: ReadingStore>() -> Router<AppState<S>> {
    // ---
    Router::new()
        .route("/api/v1/sensor-data/single", post(add_single::<S>))
        .route("/api/v1/sensor-data/batch", post(add_batch::<S>))
        .route("/api/v1/sensor-data/{zone_id}", get(by_zone::<S>))
        .route(
            "/api/v1/sensor-data/{zone_id}/{plant_name}",
            get(by_zone_and_plant::<S>),
        )
}

#[derive(Debug, Serialize)]
struct ZoneReadings {
    zone_id: String,
    data: Vec<Reading>,
}

#[derive(Debug, Serialize)]
struct PlantReadings {
    zone_id: String,
    plant_name: String,
    data: Vec<Reading>,
}

async fn add_single<S: ReadingStore>(
    State((store, _)): State<AppState<S>>,
    payload: Result<Json<NewReading>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let Json(mut reading) = payload?;
    debug!("POST /api/v1/sensor-data/single - {}", reading.plant_id);

    reading.validate()?;
    reading.normalize();
    let stored = store.insert(&reading).await?;

    info!("Stored reading {} for {} in {}", stored.id, stored.plant_id, stored.zone_id);
    Ok(Json(json!({
        "message": "Single sensor data added successfully!",
        "id": stored.id,
    })))
}

async fn add_batch<S: ReadingStore>(
    State((store, _)): State<AppState<S>>,
    payload: Result<Json<Vec<NewReading>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let Json(mut readings) = payload?;
    debug!("POST /api/v1/sensor-data/batch - {} readings", readings.len());

    // Reject the whole batch before anything is written
    for (index, reading) in readings.iter().enumerate() {
        reading.validate().map_err(|e| ValidationError::BatchItem {
            index,
            source: Box::new(e),
        })?;
    }
    readings.iter_mut().for_each(NewReading::normalize);

    let count = store.insert_batch(&readings).await?;

    info!("Stored batch of {} readings", count);
    Ok(Json(json!({
        "message": "Batch sensor data added successfully!",
        "count": count,
    })))
}

async fn by_zone<S: ReadingStore>(
    State((store, _)): State<AppState<S>>,
    Path(zone_id): Path<String>,
) -> Result<Json<ZoneReadings>, ApiError> {
    // ---
    let data = store.fetch_by_zone(&zone_id).await?;
    debug!("GET /api/v1/sensor-data/{} - {} readings", zone_id, data.len());

    Ok(Json(ZoneReadings { zone_id, data }))
}

async fn by_zone_and_plant<S: ReadingStore>(
    State((store, _)): State<AppState<S>>,
    Path((zone_id, plant_name)): Path<(String, String)>,
) -> Result<Json<PlantReadings>, ApiError> {
    // ---
    let data = store.fetch_by_zone_and_plant(&zone_id, &plant_name).await?;
    debug!(
        "GET /api/v1/sensor-data/{}/{} - {} readings",
        zone_id,
        plant_name,
        data.len()
    );

    if data.is_empty() {
        return Err(AnalyticsError::NotFound {
            what: "plant_name",
            id: format!("{plant_name} in zone_id {zone_id}"),
        }
        .into());
    }

    Ok(Json(PlantReadings {
        zone_id,
        plant_name,
        data,
    }))
}
