use axum::{middleware, Router};

use crate::store::ReadingStore;
use crate::Config;

mod analytics;
mod auth;
mod health;
mod sensor_data;

// ---

/// State shared by every data route.
pub type AppState<S> = (S, Config);

pub fn router<S: ReadingStore>(store: S, config: Config) -> Router {
    // ---
    let protected = Router::new()
        .merge(sensor_data::router::<S>())
        .merge(analytics::router::<S>())
        .route_layer(middleware::from_fn_with_state(
            config.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .merge(protected)
        .merge(health::router())
        .with_state((store, config))
}
