use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FleetBus {
    pub bus_id: String,
    pub number_plate: String,
    pub home_stand: String,
    pub max_trips_per_day: u32,
    pub max_active_hours: f64,
    pub status: Option<String>,
    pub assigned_route: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FleetRoute {
    pub route_id: String,
    pub from_location: String,
    pub to_location: String,
    pub base_travel_time: u32,
    pub middle_stop_count: u32,
    pub stop_delay_per_stop: u32,
    pub distance: f64,
}
