use chrono::{NaiveDate, NaiveDateTime};
use fleetline::{
    engine::Dispatcher,
    fleet::{Config, Error, Fleet},
    repository::{BusStatus, Store},
    shared::clock::FixedClock,
};
use std::sync::Arc;

fn fleet_dir() -> String {
    format!("{}/tests/fleet", env!("CARGO_MANIFEST_DIR"))
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).unwrap()
}

#[test]
fn loads_a_fleet_directory() {
    let fleet = Fleet::new(Config::default()).from_dir(fleet_dir());
    let store = Store::new().load_fleet(fleet).unwrap();

    let buses = store.buses();
    assert_eq!(buses.len(), 3);

    let b1 = store.bus_by_id("b1").unwrap();
    assert_eq!(b1.number_plate.as_ref(), "WB 02 AB 1234");
    assert_eq!(b1.status, BusStatus::Active);
    assert_eq!(b1.assigned_route.as_deref(), Some("r1"));
    assert_eq!(b1.current_trips, 0);
    assert_eq!(b1.active_hours, 0.0);

    // A blank status column means active.
    let b2 = store.bus_by_id("b2").unwrap();
    assert_eq!(b2.status, BusStatus::Active);
    assert_eq!(b2.home_stand.as_ref(), "Raniganj");

    let b3 = store.bus_by_id("b3").unwrap();
    assert_eq!(b3.status, BusStatus::Maintenance);

    let r1 = store.route_by_id("r1").unwrap();
    assert_eq!(r1.total_travel_time(), 57);
    assert_eq!(store.routes().len(), 2);
}

#[test]
fn a_missing_file_is_reported() {
    let dir = format!("{}/tests", env!("CARGO_MANIFEST_DIR"));
    let fleet = Fleet::new(Config::default()).from_dir(dir);
    assert!(matches!(
        Store::new().load_fleet(fleet),
        Err(Error::FileNotFound(_))
    ));
}

#[test]
fn an_empty_source_loads_an_empty_store() {
    let store = Store::new().load_fleet(Fleet::default()).unwrap();
    assert!(store.buses().is_empty());
    assert!(store.routes().is_empty());
}

#[test]
fn a_loaded_fleet_plans_its_day() {
    let fleet = Fleet::new(Config::default()).from_dir(fleet_dir());
    let store = Store::new().load_fleet(fleet).unwrap();
    let clock = Arc::new(FixedClock::new(at(5, 0)));
    let dispatcher = Dispatcher::with_clock(store, clock);

    let report = dispatcher.generate_schedule(day());
    assert!(report.skipped.is_empty());

    let b1_trips: Vec<_> = report
        .trips
        .iter()
        .filter(|trip| trip.bus_id.as_ref() == "b1")
        .collect();
    let b2_trips: Vec<_> = report
        .trips
        .iter()
        .filter(|trip| trip.bus_id.as_ref() == "b2")
        .collect();

    assert_eq!(b1_trips.len(), 12);
    assert_eq!(b1_trips[0].departure_time, at(6, 0));
    // Second bus in the fleet file: staggered ten minutes, capped at eleven
    // duty hours.
    assert_eq!(b2_trips.len(), 11);
    assert_eq!(b2_trips[0].departure_time, at(6, 10));

    // The bus in the workshop is not planned and not a configuration gap.
    assert!(report.trips.iter().all(|trip| trip.bus_id.as_ref() != "b3"));
}
