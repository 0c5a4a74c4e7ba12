//! Application entry point for the `plantwatch-analytics` service.
//!
//! This binary orchestrates the full startup sequence for the plant sensor
//! analytics API, including:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Selecting the reading store: PostgreSQL when `DATABASE_URL` is set,
//!   an in-memory store otherwise
//! - Creating the database schema if it does not exist
//! - Mounting all API routes via the `routes` gateway (EMBP pattern)
//! - Binding the Axum HTTP server and serving requests
//!
//! # Environment Variables
//! - `DATABASE_URL` (optional) – PostgreSQL connection string
//! - `DB_POOL_MAX` (optional) – maximum number of DB connections (default: 5)
//! - `LISTEN_PORT` (optional) – HTTP port (default: 8080)
//! - `API_TOKEN` (optional) – bearer token guarding the data endpoints
//! - `CORRELATION_ALIGNMENT` (optional) – `positional` (default) or `timestamp`
//! - `AXUM_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `AXUM_SPAN_EVENTS` (optional) – span event mode for tracing
//!
//! This module follows the Explicit Module Boundary Pattern (EMBP) by
//! delegating schema setup to `schema`, configuration parsing to `config`,
//! storage to `store`, and route registration to `routes`.
use std::{env, net::SocketAddr};

use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::Result;

mod analytics;
mod config;
mod error;
mod models;
mod routes;
mod schema;
mod store;

pub use config::Config;

// Re-exported so sibling modules import shared types from the crate root
// rather than from each other.
pub use analytics::CorrelationAlignment;
pub use error::{AnalyticsError, ApiError, ValidationError};
pub use models::{NewReading, Reading};

use store::{MemoryReadingStore, PgReadingStore};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    if cfg.api_token.is_none() {
        tracing::warn!("API_TOKEN not set; data endpoints accept unauthenticated requests");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.listen_port));

    // Build app from routes gateway (EMBP)
    let app: Router = match cfg.db_url.clone() {
        Some(db_url) => {
            let masked = config::mask_db_url(&db_url);
            tracing::info!("Attempting to connect to database: {}", masked);

            let store = PgReadingStore::connect(&db_url, cfg.db_pool_max)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to database '{}': {:#}", masked, e))?;

            tracing::info!("Successfully connected to database");

            schema::create_schema(store.pool()).await?;
            routes::router(store, cfg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; readings are kept in memory and lost on exit");
            routes::router(MemoryReadingStore::new(), cfg)
        }
    };

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `AXUM_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by the `AXUM_LOG_LEVEL` env var
///
/// Called once at startup, after `.env` is loaded so the variables above
/// may come from it.
fn init_tracing() {
    // ---
    let span_events = match env::var("AXUM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to AXUM_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("AXUM_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},sqlx::query=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
