use crate::{
    repository::{
        Bus, BusConfig, BusPatch, Route, RouteConfig, RoutePatch, Store, Trip, TripStatus,
    },
    shared::clock::{Clock, SystemClock},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

mod chaining;
mod lifecycle;
mod schedule;

pub use lifecycle::{ArrivalOutcome, CancellationOutcome, DepartureOutcome};
pub use schedule::{ScheduleReport, SkipReason, SkippedBus};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Trip id {0} does not match any entry")]
    TripNotFound(Arc<str>),
    #[error("Bus id {0} does not match any entry")]
    BusNotFound(Arc<str>),
    #[error("Route id {0} does not match any entry")]
    RouteNotFound(Arc<str>),
}

/// The dispatch engine facade: the only component that mutates bus and trip
/// state. Every command reads the injected clock once and runs as a single
/// critical section on the store, so concurrent operator actions cannot race
/// on a bus's duty counters.
pub struct Dispatcher<C: Clock = SystemClock> {
    store: Store,
    clock: C,
}

impl Dispatcher {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Dispatcher<C> {
    pub fn with_clock(store: Store, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn add_bus(&self, config: BusConfig) -> Bus {
        let now = self.clock.now();
        let mut catalog = self.store.write();
        let id = catalog.next_bus_id();
        let bus = Bus {
            id,
            number_plate: config.number_plate.into(),
            home_stand: config.home_stand.into(),
            max_trips_per_day: config.max_trips_per_day,
            max_active_hours: config.max_active_hours,
            status: config.status,
            assigned_route: config.assigned_route.map(Into::into),
            current_trips: 0,
            active_hours: 0.0,
            last_updated: now,
        };
        catalog.insert_bus(bus.clone());
        bus
    }

    pub fn update_bus(&self, id: &str, patch: BusPatch) -> Result<Bus, Error> {
        let now = self.clock.now();
        let mut catalog = self.store.write();
        let Some(bus) = catalog.bus_mut(id) else {
            return Err(Error::BusNotFound(id.into()));
        };
        patch.apply(bus);
        bus.last_updated = now;
        Ok(bus.clone())
    }

    pub fn add_route(&self, config: RouteConfig) -> Route {
        let mut catalog = self.store.write();
        let id = catalog.next_route_id();
        let route = Route {
            id,
            from_location: config.from_location.into(),
            to_location: config.to_location.into(),
            base_travel_time: config.base_travel_time,
            middle_stop_count: config.middle_stop_count,
            stop_delay_per_stop: config.stop_delay_per_stop,
            distance: config.distance,
        };
        catalog.insert_route(route.clone());
        route
    }

    pub fn update_route(&self, id: &str, patch: RoutePatch) -> Result<Route, Error> {
        let mut catalog = self.store.write();
        let Some(route) = catalog.route_mut(id) else {
            return Err(Error::RouteNotFound(id.into()));
        };
        patch.apply(route);
        Ok(route.clone())
    }

    pub fn buses(&self) -> Vec<Bus> {
        self.store.buses()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.store.routes()
    }

    pub fn trips(&self) -> Vec<Trip> {
        self.store.trips()
    }

    pub fn bus_by_id(&self, id: &str) -> Option<Bus> {
        self.store.bus_by_id(id)
    }

    pub fn route_by_id(&self, id: &str) -> Option<Route> {
        self.store.route_by_id(id)
    }

    pub fn current_trip_for_bus(&self, bus_id: &str) -> Option<Trip> {
        self.store.current_trip_for_bus(bus_id)
    }

    /// Per-status trip counts and delay summary for one service day.
    pub fn day_report(&self, day: NaiveDate) -> DayReport {
        let catalog = self.store.read();
        let mut report = DayReport {
            day,
            total_trips: 0,
            scheduled: 0,
            running: 0,
            completed: 0,
            cancelled: 0,
            average_delay_minutes: 0.0,
        };
        let mut delay_sum = 0i64;
        let mut delayed = 0usize;
        for trip in catalog
            .trips()
            .iter()
            .filter(|trip| trip.departure_time.date() == day)
        {
            report.total_trips += 1;
            match trip.status {
                TripStatus::Scheduled => report.scheduled += 1,
                TripStatus::Running => report.running += 1,
                TripStatus::Completed => report.completed += 1,
                TripStatus::Cancelled => report.cancelled += 1,
                // Derived for display only, never stored.
                TripStatus::Delayed => {}
            }
            if let Some(delay) = trip.delay_minutes
                && delay > 0
            {
                delay_sum += delay;
                delayed += 1;
            }
        }
        if delayed > 0 {
            report.average_delay_minutes = delay_sum as f64 / delayed as f64;
        }
        report
    }
}

/// Aggregate view of one service day, as surfaced on operator dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub day: NaiveDate,
    pub total_trips: usize,
    pub scheduled: usize,
    pub running: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Mean recorded delay across trips that departed (or were cancelled)
    /// late; zero when nothing ran late.
    pub average_delay_minutes: f64,
}
