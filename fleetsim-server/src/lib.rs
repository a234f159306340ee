//! HTTP service around the fleet simulator.
//!
//! One task owns the simulation and advances it on a timer; handlers read
//! the last published state. The chat endpoint proxies to an AI gateway.

pub mod api;
pub mod chat;
pub mod config;
pub mod state;
pub mod ticker;

use std::{sync::Arc, time::Duration};

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{
        HeaderName, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use chrono::Utc;
use fleetsim_core::prelude::*;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer, timeout::TimeoutLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    chat::{ChatError, GatewayClient},
    config::{HttpConfig, ServerConfig},
    state::AppState,
    ticker::spawn_ticker,
};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Fleet error: {0}")]
    Fleet(#[from] fleetsim_core::Error),
    #[error("Chat client error: {0}")]
    Chat(#[from] ChatError),
}

/// Origin `*` and the headers browser clients of the chat endpoint send
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {err}"),
        )
    }
}

pub fn router(state: Arc<AppState>, http: &HttpConfig) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/vehicles", get(api::list_vehicles))
        .route("/api/vehicles/geojson", get(api::vehicles_geojson))
        .route("/api/vehicles/{id}", get(api::get_vehicle))
        .route("/api/vehicles/{id}/reset", post(api::reset_vehicle))
        .route("/api/routes", get(api::routes))
        .route("/api/summary", get(api::summary))
        .route("/api/chat", post(chat::chat))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(GlobalConcurrencyLimitLayer::new(
                    http.max_concurrent_requests,
                ))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    http.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

/// Load the roster, start the ticker and serve until ctrl-c
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;

    let fleet_config = config.fleet_config()?;
    let state = create_fleet(&fleet_config)?.with_clock(Utc::now());

    let seed = config
        .simulation
        .seed
        .unwrap_or_else(|| Utc::now().timestamp_micros().unsigned_abs());
    info!("Simulation seed {seed} (set simulation.seed to replay this run)");

    let period = config.tick_period()?;
    let (fleet, ticker) = spawn_ticker(Simulation::seeded(state, seed), period);

    let chat = Arc::new(GatewayClient::from_config(&config.chat)?);
    let app = router(AppState::new(fleet, chat), &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ticker.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
