use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Operational state of a vehicle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusStatus {
    /// At a stand, available for dispatch.
    #[default]
    Active,
    /// Parked; not part of the service day.
    Inactive,
    /// In the workshop.
    Maintenance,
    /// Currently out on a running trip.
    InTrip,
}

/// A physical vehicle with its daily duty limits and running duty counters.
///
/// `current_trips` and `active_hours` reset when a day is planned and
/// accumulate as arrivals are recorded. `active_hours` is a soft target: a
/// trip already in progress may push it slightly past `max_active_hours`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: Arc<str>,
    pub number_plate: Arc<str>,
    /// The stand the bus is based at; drives the foreign-stand dwell rule.
    pub home_stand: Arc<str>,
    pub max_trips_per_day: u32,
    pub max_active_hours: f64,
    pub status: BusStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_route: Option<Arc<str>>,
    /// Trips completed so far today.
    pub current_trips: u32,
    /// Duty hours accumulated so far today.
    pub active_hours: f64,
    pub last_updated: NaiveDateTime,
}

/// A fixed bidirectional corridor between two named stands.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Arc<str>,
    pub from_location: Arc<str>,
    pub to_location: Arc<str>,
    /// Stand-to-stand driving time in minutes, without intermediate stops.
    pub base_travel_time: u32,
    pub middle_stop_count: u32,
    /// Dwell per intermediate stop, in minutes.
    pub stop_delay_per_stop: u32,
    /// Corridor length in km.
    pub distance: f64,
}

impl Route {
    /// End-to-end travel time in minutes, including every intermediate stop.
    pub fn total_travel_time(&self) -> u32 {
        self.base_travel_time + self.middle_stop_count * self.stop_delay_per_stop
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Scheduled,
    Running,
    Completed,
    Cancelled,
    /// Display-only: derived by [`Trip::display_status`], never stored.
    Delayed,
}

/// One scheduled or realized one-way run of a bus along its assigned route.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Arc<str>,
    pub bus_id: Arc<str>,
    pub route_id: Arc<str>,
    pub departure_time: NaiveDateTime,
    pub estimated_arrival_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_departure_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_arrival_time: Option<NaiveDateTime>,
    /// Direction along the corridor, alternating per run starting forward.
    pub is_return_trip: bool,
    pub includes_lunch_break: bool,
    pub status: TripStatus,
    /// 1-based ordinal within the bus's day.
    pub trip_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_minutes: Option<i64>,
}

impl Trip {
    /// A trip still occupying its bus: scheduled or already running.
    pub fn is_open(&self) -> bool {
        matches!(self.status, TripStatus::Scheduled | TripStatus::Running)
    }

    /// Status for display purposes: a scheduled trip past its departure time
    /// reads as delayed. The stored status never becomes
    /// [`TripStatus::Delayed`].
    pub fn display_status(&self, now: NaiveDateTime) -> TripStatus {
        if self.status == TripStatus::Scheduled && now > self.departure_time {
            TripStatus::Delayed
        } else {
            self.status
        }
    }
}

/// Caller-supplied fields for a new bus; duty counters start at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusConfig {
    pub number_plate: String,
    pub home_stand: String,
    pub max_trips_per_day: u32,
    pub max_active_hours: f64,
    #[serde(default)]
    pub status: BusStatus,
    #[serde(default)]
    pub assigned_route: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    pub from_location: String,
    pub to_location: String,
    pub base_travel_time: u32,
    pub middle_stop_count: u32,
    pub stop_delay_per_stop: u32,
    pub distance: f64,
}

/// Partial update for a bus, applied atomically under the store lock.
/// Absent fields are left untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusPatch {
    pub number_plate: Option<String>,
    pub home_stand: Option<String>,
    pub max_trips_per_day: Option<u32>,
    pub max_active_hours: Option<f64>,
    pub status: Option<BusStatus>,
    pub assigned_route: Option<String>,
    pub current_trips: Option<u32>,
    pub active_hours: Option<f64>,
}

impl BusPatch {
    pub(crate) fn apply(&self, bus: &mut Bus) {
        if let Some(number_plate) = &self.number_plate {
            bus.number_plate = number_plate.as_str().into();
        }
        if let Some(home_stand) = &self.home_stand {
            bus.home_stand = home_stand.as_str().into();
        }
        if let Some(max_trips_per_day) = self.max_trips_per_day {
            bus.max_trips_per_day = max_trips_per_day;
        }
        if let Some(max_active_hours) = self.max_active_hours {
            bus.max_active_hours = max_active_hours;
        }
        if let Some(status) = self.status {
            bus.status = status;
        }
        if let Some(assigned_route) = &self.assigned_route {
            bus.assigned_route = Some(assigned_route.as_str().into());
        }
        if let Some(current_trips) = self.current_trips {
            bus.current_trips = current_trips;
        }
        if let Some(active_hours) = self.active_hours {
            bus.active_hours = active_hours;
        }
    }
}

/// Partial update for a route.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutePatch {
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub base_travel_time: Option<u32>,
    pub middle_stop_count: Option<u32>,
    pub stop_delay_per_stop: Option<u32>,
    pub distance: Option<f64>,
}

impl RoutePatch {
    pub(crate) fn apply(&self, route: &mut Route) {
        if let Some(from_location) = &self.from_location {
            route.from_location = from_location.as_str().into();
        }
        if let Some(to_location) = &self.to_location {
            route.to_location = to_location.as_str().into();
        }
        if let Some(base_travel_time) = self.base_travel_time {
            route.base_travel_time = base_travel_time;
        }
        if let Some(middle_stop_count) = self.middle_stop_count {
            route.middle_stop_count = middle_stop_count;
        }
        if let Some(stop_delay_per_stop) = self.stop_delay_per_stop {
            route.stop_delay_per_stop = stop_delay_per_stop;
        }
        if let Some(distance) = self.distance {
            route.distance = distance;
        }
    }
}

/// The three keyed collections as a serializable unit. Every date-valued
/// field round-trips through ISO-8601 exactly.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub buses: Vec<Bus>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
}
