//! Query server for zoning classification.
//!
//! Loads every dataset once at startup and answers classification requests
//! for single points or batches of points.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tlalli::loader::load_bundle;
use tlalli::models::RawCoordinate;
use tlalli::{AppConfig, Classification, DatasetBundle, Resolver};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Zoning classification query server")]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, default_value = "tlalli.toml")]
    config: PathBuf,

    /// Listen address, overrides `[server] listen`
    #[arg(short, long)]
    listen: Option<String>,
}

/// Application state shared across handlers
struct AppState {
    resolver: Resolver,
    bundle: DatasetBundle,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Tlalli Query Server");
    info!("Loading config from {}", args.config.display());

    let config = AppConfig::load_from_file(&args.config)?;
    let bundle = load_bundle(&config.datasets).context("Failed to load datasets")?;

    let listen = args.listen.unwrap_or_else(|| config.server.listen.clone());
    let state = Arc::new(AppState {
        resolver: Resolver::new(config.resolver_config()),
        bundle,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/v1/classify",
            get(classify_handler).post(classify_batch_handler),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        features: state.bundle.feature_count(),
        rules: state.bundle.rules.len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    features: usize,
    rules: usize,
}

#[derive(Deserialize)]
struct ClassifyQueryParams {
    lat: f64,
    lng: f64,
}

/// Classify a single point
async fn classify_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClassifyQueryParams>,
) -> Result<Json<Classification>, (StatusCode, String)> {
    state
        .resolver
        .classify_raw(params.lat, params.lng, &state.bundle)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

/// Per-point outcome of a batch request
#[derive(Serialize)]
#[serde(untagged)]
enum BatchItem {
    Classified(Box<Classification>),
    Rejected { error: String },
}

/// Classify a batch of points in parallel
async fn classify_batch_handler(
    State(state): State<Arc<AppState>>,
    Json(points): Json<Vec<RawCoordinate>>,
) -> Result<Json<Vec<BatchItem>>, (StatusCode, String)> {
    let count = points.len();

    let items = tokio::task::spawn_blocking(move || {
        points
            .par_iter()
            .map(
                |point| match state.resolver.classify_raw(point.lat, point.lng, &state.bundle) {
                    Ok(result) => BatchItem::Classified(Box::new(result)),
                    Err(e) => BatchItem::Rejected {
                        error: e.to_string(),
                    },
                },
            )
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| {
        tracing::error!("Batch classification failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!("Classified batch of {} points", count);
    Ok(Json(items))
}
