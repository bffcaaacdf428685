//! Query server for country and subdivision lookups.
//!
//! Loads the dataset written by the ingest binary once at startup and serves
//! read-only lookups over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use country_states::dataset::load_dataset;

mod handlers;
use handlers::{
    country_alpha2_handler, country_handler, health_handler, subdivision_code_handler,
    subdivision_name_handler, subdivision_valid_handler, AppState,
};

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Country and subdivision lookup server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Dataset file written by the ingest binary
    #[arg(short, long, default_value = "data/country-states.json")]
    dataset: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Country States Query Server");

    let dataset = load_dataset(&args.dataset)?;
    let state = Arc::new(AppState { dataset });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/countries/{alpha2}", get(country_handler))
        .route("/v1/country/alpha2", get(country_alpha2_handler))
        .route("/v1/subdivision/code", get(subdivision_code_handler))
        .route("/v1/subdivision/name", get(subdivision_name_handler))
        .route("/v1/subdivision/valid", get(subdivision_valid_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
