mod api;
mod dto;
mod state;

use crate::state::AppState;
use axum::routing::{get, patch, post};
use fleetline::{
    engine::Dispatcher,
    fleet::{Config, Fleet},
    repository::Store,
};
use std::{sync::Arc, time::Instant};
use tracing::{error, info};

const PORT: u32 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting dispatcher...");
    let args: Vec<_> = std::env::args().collect();
    let store = if let Some(dir) = args.get(1) {
        info!("Loading fleet configuration...");
        let now = Instant::now();
        let fleet = Fleet::new(Config::default()).from_dir(dir);
        let store = match Store::new().load_fleet(fleet) {
            Ok(store) => store,
            Err(err) => {
                error!("Failed to load fleet configuration: {err}");
                std::process::exit(1);
            }
        };
        info!("Loading fleet configuration took {:?}", now.elapsed());
        store
    } else {
        info!("No fleet directory given, starting empty");
        Store::new()
    };
    let state = Arc::new(AppState::new(Dispatcher::new(store)));

    let app = axum::Router::new()
        .route("/buses", get(api::list_buses).post(api::add_bus))
        .route("/buses/{id}", patch(api::update_bus))
        .route("/buses/{id}/trip", get(api::current_trip))
        .route("/routes", get(api::list_routes).post(api::add_route))
        .route("/routes/{id}", patch(api::update_route))
        .route("/trips", get(api::list_trips))
        .route("/trips/{id}/departure", post(api::mark_departure))
        .route("/trips/{id}/arrival", post(api::mark_arrival))
        .route("/trips/{id}/cancellation", post(api::cancel_trip))
        .route("/schedule", post(api::generate_schedule))
        .route("/report", get(api::day_report))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", PORT))
        .await
        .unwrap();
    info!("Listening to port {PORT}");
    axum::serve(listener, app).await.unwrap();
}
