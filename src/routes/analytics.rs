use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::info;

use super::AppState;
use crate::analytics::{self, GrowthReport, OptimalReport, YieldReport};
use crate::store::ReadingStore;
use crate::ApiError;

// ---

pub fn router<S: ReadingStore>() -> Router<AppState<S>> {
    // ---
    Router::new()
        .route(
            "/api/v1/analytics/growth-rate/{plant_id}",
            get(growth_rate::<S>),
        )
        .route(
            "/api/v1/analytics/optimal-conditions/{species_id}",
            get(optimal_conditions::<S>),
        )
        .route(
            "/api/v1/analytics/yield-prediction/{zone_id}",
            get(yield_prediction::<S>),
        )
}

async fn growth_rate<S: ReadingStore>(
    State((store, config)): State<AppState<S>>,
    Path(plant_id): Path<String>,
) -> Result<Json<GrowthReport>, ApiError> {
    // ---
    info!("GET /api/v1/analytics/growth-rate/{}", plant_id);

    let report = analytics::compute_growth(&store, &plant_id, config.correlation_alignment).await?;
    Ok(Json(report))
}

async fn optimal_conditions<S: ReadingStore>(
    State((store, _)): State<AppState<S>>,
    Path(species_id): Path<String>,
) -> Result<Json<OptimalReport>, ApiError> {
    // ---
    info!("GET /api/v1/analytics/optimal-conditions/{}", species_id);

    let report = analytics::compute_optimal_conditions(&store, &species_id).await?;
    Ok(Json(report))
}

async fn yield_prediction<S: ReadingStore>(
    State((store, _)): State<AppState<S>>,
    Path(zone_id): Path<String>,
) -> Result<Json<YieldReport>, ApiError> {
    // ---
    info!("GET /api/v1/analytics/yield-prediction/{}", zone_id);

    let report = analytics::compute_yield(&store, &zone_id, Utc::now()).await?;
    Ok(Json(report))
}
