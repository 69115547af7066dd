use super::{Dispatcher, chaining};
use crate::{
    repository::{Bus, BusStatus, Route, Trip, TripStatus},
    shared::clock::Clock,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rayon::prelude::*;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// First departure of the service day.
const DAY_START_HOUR: u32 = 6;
/// Offset between consecutive buses' first departures.
const STAGGER_MINUTES: i64 = 10;
/// No departure is planned at or after this hour.
const LAST_DEPARTURE_HOUR: u32 = 22;

/// Everything one generation run produced: the day's fresh trips in fleet
/// order, plus the buses that could not be planned and why.
#[derive(Debug, Clone)]
pub struct ScheduleReport {
    pub day: NaiveDate,
    pub trips: Vec<Trip>,
    pub skipped: Vec<SkippedBus>,
}

/// A configuration gap: the bus stayed unplanned but the day went ahead.
#[derive(Debug, Clone)]
pub struct SkippedBus {
    pub bus_id: Arc<str>,
    pub reason: SkipReason,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("no route assigned")]
    NoAssignedRoute,
    #[error("assigned route {0} does not match any entry")]
    UnknownRoute(Arc<str>),
}

impl<C: Clock> Dispatcher<C> {
    /// Regenerates today's schedule. See [`Self::generate_schedule`].
    pub fn generate_daily_schedule(&self) -> ScheduleReport {
        self.generate_schedule(self.clock.now().date())
    }

    /// Replaces every trip departing on `day` with a freshly planned
    /// schedule and resets fleet duty counters for the day. Trips of other
    /// days are untouched. Buses that are not active, have no route, or
    /// reference a missing route are left unplanned; the last two are
    /// configuration gaps and land in the report.
    pub fn generate_schedule(&self, day: NaiveDate) -> ScheduleReport {
        let now = self.clock.now();
        let mut catalog = self.store.write();

        catalog.retain_trips(|trip| trip.departure_time.date() != day);

        // Skip decisions read the fleet as it stood before the reset, so a
        // bus normalized out of in-trip does not pick up a mid-day schedule.
        let fleet: Vec<Bus> = catalog.buses().to_vec();
        let routes: Vec<Route> = catalog.routes().to_vec();
        for bus in catalog.buses_mut() {
            bus.current_trips = 0;
            bus.active_hours = 0.0;
            if bus.status == BusStatus::InTrip {
                bus.status = BusStatus::Active;
            }
            bus.last_updated = now;
        }

        let start = day.and_hms_opt(DAY_START_HOUR, 0, 0).unwrap();
        let plans: Vec<Result<Vec<Trip>, SkippedBus>> = fleet
            .par_iter()
            .enumerate()
            .map(|(fleet_index, bus)| {
                if bus.status != BusStatus::Active {
                    return Ok(Vec::new());
                }
                let Some(route_id) = &bus.assigned_route else {
                    return Err(SkippedBus {
                        bus_id: bus.id.clone(),
                        reason: SkipReason::NoAssignedRoute,
                    });
                };
                let Some(route) = routes.iter().find(|route| route.id == *route_id) else {
                    return Err(SkippedBus {
                        bus_id: bus.id.clone(),
                        reason: SkipReason::UnknownRoute(route_id.clone()),
                    });
                };
                Ok(plan_day(bus, fleet_index, route, start))
            })
            .collect();

        let mut trips = Vec::new();
        let mut skipped = Vec::new();
        for plan in plans {
            match plan {
                Ok(planned) => {
                    for mut trip in planned {
                        trip.id = catalog.next_trip_id();
                        catalog.insert_trip(trip.clone());
                        trips.push(trip);
                    }
                }
                Err(skip) => {
                    warn!("Skipping bus {}: {}", skip.bus_id, skip.reason);
                    skipped.push(skip);
                }
            }
        }

        info!(
            "Planned {} trips for {day} ({} buses skipped)",
            trips.len(),
            skipped.len()
        );
        ScheduleReport { day, trips, skipped }
    }
}

/// Greedy forward fill of one bus's day: emit a run, dwell, flip direction,
/// repeat until the trip count, duty-hour, or evening limit is hit. No
/// backtracking, so identical inputs always reproduce the same plan.
fn plan_day(bus: &Bus, fleet_index: usize, route: &Route, start: NaiveDateTime) -> Vec<Trip> {
    let travel_minutes = i64::from(route.total_travel_time());
    let lunch_index = bus.max_trips_per_day / 2;

    let mut departure = start + Duration::minutes(STAGGER_MINUTES * fleet_index as i64);
    let mut trip_count = 0;
    let mut is_return_trip = false;
    let mut active_hours = 0.0;
    let mut trips = Vec::new();

    while trip_count < bus.max_trips_per_day
        && departure.hour() < LAST_DEPARTURE_HOUR
        && active_hours < bus.max_active_hours
    {
        let estimated_arrival_time = departure + Duration::minutes(travel_minutes);
        // The meal stop sits on the middle trip of the planned day; the bus
        // keeps the flag even where the foreign-stand rule shortens the dwell.
        let includes_lunch_break = trip_count == lunch_index;

        trips.push(Trip {
            id: "".into(),
            bus_id: bus.id.clone(),
            route_id: route.id.clone(),
            departure_time: departure,
            estimated_arrival_time,
            actual_departure_time: None,
            actual_arrival_time: None,
            is_return_trip,
            includes_lunch_break,
            status: TripStatus::Scheduled,
            trip_number: trip_count + 1,
            delay_minutes: None,
        });

        let break_minutes =
            chaining::dwell_minutes(bus, route, is_return_trip, includes_lunch_break);
        departure = estimated_arrival_time + Duration::minutes(break_minutes);
        active_hours += (travel_minutes + break_minutes) as f64 / 60.0;
        trip_count += 1;
        is_return_trip = !is_return_trip;
    }

    trips
}
