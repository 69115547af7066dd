use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fleetline::repository::{BusConfig, BusPatch, RouteConfig, RoutePatch};
use std::sync::Arc;
use tracing::error;

pub async fn list_buses(State(state): State<Arc<AppState>>) -> Response {
    Json(state.dispatcher.buses()).into_response()
}

pub async fn add_bus(
    State(state): State<Arc<AppState>>,
    Json(config): Json<BusConfig>,
) -> Response {
    Json(state.dispatcher.add_bus(config)).into_response()
}

pub async fn update_bus(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<BusPatch>,
) -> Result<Response, StatusCode> {
    match state.dispatcher.update_bus(&id, patch) {
        Ok(bus) => Ok(Json(bus).into_response()),
        Err(err) => {
            error!("Failed to update bus: {err}");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

pub async fn current_trip(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    match state.dispatcher.current_trip_for_bus(&id) {
        Some(trip) => Ok(Json(trip).into_response()),
        None => Err(StatusCode::NOT_FOUND),
    }
}

pub async fn list_routes(State(state): State<Arc<AppState>>) -> Response {
    Json(state.dispatcher.routes()).into_response()
}

pub async fn add_route(
    State(state): State<Arc<AppState>>,
    Json(config): Json<RouteConfig>,
) -> Response {
    Json(state.dispatcher.add_route(config)).into_response()
}

pub async fn update_route(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<RoutePatch>,
) -> Result<Response, StatusCode> {
    match state.dispatcher.update_route(&id, patch) {
        Ok(route) => Ok(Json(route).into_response()),
        Err(err) => {
            error!("Failed to update route: {err}");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

pub async fn list_trips(State(state): State<Arc<AppState>>) -> Response {
    Json(state.dispatcher.trips()).into_response()
}
