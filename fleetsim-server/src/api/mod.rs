//! Read-only fleet endpoints plus the vehicle reset

mod error;

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use fleetsim_core::prelude::*;
use geojson::FeatureCollection;
use serde::Deserialize;
use serde_json::{Value, json};

pub use error::ApiError;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let fleet = state.fleet.current().await;
    Json(json!({
        "status": "ok",
        "tick": fleet.tick(),
        "vehicles": fleet.len(),
        "clock": fleet.clock(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct VehicleFilter {
    /// Case-insensitive match on vehicle id, route id or route name
    pub q: Option<String>,
    /// Exact route id
    pub route: Option<String>,
}

pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<VehicleFilter>,
) -> Json<Vec<VehicleSnapshot>> {
    let fleet = state.fleet.current().await;
    let term = filter.q.as_deref().unwrap_or("");
    let route = filter.route.as_deref().filter(|r| !r.is_empty());

    let vehicles = fleet
        .search(term)
        .into_iter()
        .filter(|vehicle| route.is_none_or(|r| vehicle.route_id() == r))
        .map(|vehicle| fleet.snapshot_of(vehicle))
        .collect();
    Json(vehicles)
}

pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<VehicleSnapshot>, ApiError> {
    let fleet = state.fleet.current().await;
    fleet
        .vehicle_snapshot(&vehicle_id)
        .map(Json)
        .ok_or(ApiError::NotFound(vehicle_id))
}

pub async fn reset_vehicle(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<VehicleSnapshot>, ApiError> {
    Ok(Json(state.fleet.reset(&vehicle_id).await?))
}

pub async fn vehicles_geojson(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let fleet = state.fleet.current().await;
    Ok(Json(snapshot_geojson(&fleet)?))
}

pub async fn routes(State(state): State<Arc<AppState>>) -> Json<Vec<Route>> {
    let fleet = state.fleet.current().await;
    Json(fleet.routes().to_vec())
}

pub async fn summary(State(state): State<Arc<AppState>>) -> Json<FleetSummary> {
    let fleet = state.fleet.current().await;
    Json(fleet.summary())
}
