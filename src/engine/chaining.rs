use crate::repository::{Bus, Route, Trip, TripStatus};
use chrono::{Duration, NaiveDateTime, Timelike};

/// Dwell at a stand between two consecutive runs.
pub(crate) const STAND_BREAK_MINUTES: i64 = 5;
/// Dwell for the mid-day meal stop.
pub(crate) const LUNCH_BREAK_MINUTES: i64 = 30;
/// No follow-on trip is dispatched at or after this hour. The planned
/// schedule keeps filling until 22:00; live dispatch stops an hour earlier.
const CHAIN_CUTOFF_HOUR: u32 = 21;

/// Raniganj-homed buses may not dwell at the opposite stand.
const RANIGANJ_STAND: &str = "Raniganj";
/// The hub stand on the Raniganj corridor.
const ASANSOL_STAND: &str = "Asansol";

/// Break length after a leg, in minutes. Lunch stretches the dwell to 30
/// minutes unless the leg left the bus at a foreign stand, where Raniganj
/// crews turn straight around.
pub(crate) fn dwell_minutes(bus: &Bus, route: &Route, is_return_trip: bool, lunch: bool) -> i64 {
    let minutes = if lunch {
        LUNCH_BREAK_MINUTES
    } else {
        STAND_BREAK_MINUTES
    };
    if ends_away_from_home(bus, route, is_return_trip) {
        minutes.min(STAND_BREAK_MINUTES)
    } else {
        minutes
    }
}

/// Whether the just-run leg leaves a Raniganj-homed bus away from its home
/// stand: a return leg on the Raniganj side of the corridor, or a forward
/// leg terminating at the Asansol hub.
fn ends_away_from_home(bus: &Bus, route: &Route, is_return_trip: bool) -> bool {
    bus.home_stand.as_ref() == RANIGANJ_STAND
        && ((is_return_trip && route.from_location.as_ref() == RANIGANJ_STAND)
            || (!is_return_trip && route.to_location.as_ref() == ASANSOL_STAND))
}

/// Decides whether a bus gets a follow-on trip after an arrival and builds
/// it (id left for the store) when duty limits and the evening cutoff allow.
///
/// The lunch window here keys off the bus's updated trip count and is two
/// trips wide, unlike the planner's fixed mid-day index: a bus that lost a
/// run to a cancellation still gets its meal stop near the middle of its
/// realized day.
pub(crate) fn next_trip(
    bus: &Bus,
    completed: &Trip,
    route: &Route,
    now: NaiveDateTime,
) -> Option<Trip> {
    if bus.current_trips >= bus.max_trips_per_day || bus.active_hours >= bus.max_active_hours {
        return None;
    }
    if now.hour() >= CHAIN_CUTOFF_HOUR {
        return None;
    }

    let window_start = bus.max_trips_per_day / 2;
    let lunch = (window_start..=window_start + 1).contains(&bus.current_trips);
    let break_minutes = dwell_minutes(bus, route, completed.is_return_trip, lunch);

    let departure_time = now + Duration::minutes(break_minutes);
    let estimated_arrival_time =
        departure_time + Duration::minutes(i64::from(route.total_travel_time()));

    Some(Trip {
        id: "".into(),
        bus_id: bus.id.clone(),
        route_id: route.id.clone(),
        departure_time,
        estimated_arrival_time,
        actual_departure_time: None,
        actual_arrival_time: None,
        is_return_trip: !completed.is_return_trip,
        includes_lunch_break: break_minutes == LUNCH_BREAK_MINUTES,
        status: TripStatus::Scheduled,
        trip_number: bus.current_trips + 1,
        delay_minutes: None,
    })
}

#[cfg(test)]
fn homed_at(stand: &str) -> Bus {
    Bus {
        home_stand: stand.into(),
        max_trips_per_day: 14,
        max_active_hours: 12.0,
        ..Default::default()
    }
}

#[cfg(test)]
fn corridor(from: &str, to: &str) -> Route {
    Route {
        from_location: from.into(),
        to_location: to.into(),
        base_travel_time: 45,
        middle_stop_count: 12,
        stop_delay_per_stop: 1,
        ..Default::default()
    }
}

#[test]
fn default_dwell_is_five_minutes() {
    let bus = homed_at("Asansol");
    let route = corridor("Asansol", "Raniganj");
    assert_eq!(dwell_minutes(&bus, &route, false, false), 5);
}

#[test]
fn lunch_dwell_is_thirty_minutes() {
    let bus = homed_at("Asansol");
    let route = corridor("Asansol", "Raniganj");
    assert_eq!(dwell_minutes(&bus, &route, false, true), 30);
}

#[test]
fn forward_leg_into_asansol_clamps_lunch() {
    let bus = homed_at("Raniganj");
    let route = corridor("Raniganj", "Asansol");
    assert_eq!(dwell_minutes(&bus, &route, false, true), 5);
}

#[test]
fn return_leg_on_raniganj_corridor_clamps_lunch() {
    let bus = homed_at("Raniganj");
    let route = corridor("Raniganj", "Asansol");
    assert_eq!(dwell_minutes(&bus, &route, true, true), 5);
}

#[test]
fn asansol_bus_keeps_its_lunch_at_either_stand() {
    let bus = homed_at("Asansol");
    let route = corridor("Raniganj", "Asansol");
    assert_eq!(dwell_minutes(&bus, &route, false, true), 30);
}
