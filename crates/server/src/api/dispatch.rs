use crate::{
    dto::{ArrivalDto, CancellationDto, DepartureDto, ScheduleDto},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use std::{collections::HashMap, sync::Arc};
use tracing::error;

pub async fn mark_departure(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    match state.dispatcher.mark_departure(&id) {
        Ok(outcome) => Ok(Json(DepartureDto::from(&outcome)).into_response()),
        Err(err) => {
            error!("Failed to mark departure: {err}");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

pub async fn mark_arrival(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    match state.dispatcher.mark_arrival(&id) {
        Ok(outcome) => Ok(Json(ArrivalDto::from(&outcome)).into_response()),
        Err(err) => {
            error!("Failed to mark arrival: {err}");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

pub async fn cancel_trip(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    match state.dispatcher.cancel_trip(&id) {
        Ok(outcome) => Ok(Json(CancellationDto::from(&outcome)).into_response()),
        Err(err) => {
            error!("Failed to cancel trip: {err}");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

pub async fn generate_schedule(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let report = match params.get("day") {
        Some(day) => {
            let day: NaiveDate = day.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
            state.dispatcher.generate_schedule(day)
        }
        None => state.dispatcher.generate_daily_schedule(),
    };
    Ok(Json(ScheduleDto::from(&report)).into_response())
}

pub async fn day_report(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let day: NaiveDate = match params.get("day") {
        Some(day) => day.parse().map_err(|_| StatusCode::BAD_REQUEST)?,
        None => Local::now().date_naive(),
    };
    Ok(Json(state.dispatcher.day_report(day)).into_response())
}
