use chrono::{NaiveDate, NaiveDateTime};
use fleetline::{
    engine::{DepartureOutcome, Dispatcher, Error},
    repository::{BusConfig, BusPatch, BusStatus, RouteConfig, Store, Trip, TripStatus},
    shared::clock::FixedClock,
};
use std::sync::Arc;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).unwrap()
}

fn fixture() -> (Dispatcher<Arc<FixedClock>>, Arc<FixedClock>, Vec<Trip>) {
    let clock = Arc::new(FixedClock::new(at(5, 0)));
    let dispatcher = Dispatcher::with_clock(Store::new(), clock.clone());
    let route = dispatcher.add_route(RouteConfig {
        from_location: "Asansol".into(),
        to_location: "Raniganj".into(),
        base_travel_time: 45,
        middle_stop_count: 12,
        stop_delay_per_stop: 1,
        distance: 25.0,
    });
    dispatcher.add_bus(BusConfig {
        number_plate: "WB 02 AB 1234".into(),
        home_stand: "Asansol".into(),
        max_trips_per_day: 14,
        max_active_hours: 12.0,
        status: BusStatus::Active,
        assigned_route: Some(route.id.to_string()),
    });
    let trips = dispatcher.generate_schedule(day()).trips;
    (dispatcher, clock, trips)
}

#[test]
fn first_trip_tolerates_eight_minutes() {
    let (dispatcher, clock, trips) = fixture();
    clock.set(at(6, 8));

    let outcome = dispatcher.mark_departure(&trips[0].id).unwrap();
    let DepartureOutcome::Departed(trip) = outcome else {
        panic!("expected the trip to depart");
    };
    assert_eq!(trip.status, TripStatus::Running);
    assert_eq!(trip.delay_minutes, Some(8));
    assert_eq!(trip.actual_departure_time, Some(at(6, 8)));
    let bus = dispatcher.bus_by_id(&trip.bus_id).unwrap();
    assert_eq!(bus.status, BusStatus::InTrip);
}

#[test]
fn nine_minutes_cancels_the_first_trip() {
    let (dispatcher, clock, trips) = fixture();
    clock.set(at(6, 9));

    let outcome = dispatcher.mark_departure(&trips[0].id).unwrap();
    let DepartureOutcome::Cancelled(trip) = outcome else {
        panic!("expected the trip to be cancelled");
    };
    assert_eq!(trip.status, TripStatus::Cancelled);
    assert_eq!(trip.delay_minutes, Some(9));
    assert!(trip.actual_departure_time.is_none());
    let bus = dispatcher.bus_by_id(&trip.bus_id).unwrap();
    assert_eq!(bus.status, BusStatus::Active);
}

#[test]
fn later_trips_tolerate_five_minutes() {
    let (dispatcher, clock, trips) = fixture();
    // Trip 2 is scheduled for 07:02.
    clock.set(at(7, 7));
    let outcome = dispatcher.mark_departure(&trips[1].id).unwrap();
    assert!(matches!(outcome, DepartureOutcome::Departed(_)));
    assert_eq!(outcome.trip().delay_minutes, Some(5));
}

#[test]
fn six_minutes_cancels_a_later_trip() {
    let (dispatcher, clock, trips) = fixture();
    clock.set(at(7, 8));
    let outcome = dispatcher.mark_departure(&trips[1].id).unwrap();
    assert!(matches!(outcome, DepartureOutcome::Cancelled(_)));
    assert_eq!(outcome.trip().delay_minutes, Some(6));
}

#[test]
fn on_time_departure_records_no_delay() {
    let (dispatcher, clock, trips) = fixture();
    clock.set(at(6, 0));
    let outcome = dispatcher.mark_departure(&trips[0].id).unwrap();
    let trip = outcome.trip();
    assert_eq!(trip.status, TripStatus::Running);
    assert!(trip.delay_minutes.is_none());
    assert_eq!(trip.actual_departure_time, Some(at(6, 0)));
}

#[test]
fn early_departure_is_not_a_delay() {
    let (dispatcher, clock, trips) = fixture();
    clock.set(at(5, 58));
    let outcome = dispatcher.mark_departure(&trips[0].id).unwrap();
    assert!(matches!(outcome, DepartureOutcome::Departed(_)));
    assert!(outcome.trip().delay_minutes.is_none());
}

#[test]
fn arrival_updates_duty_and_chains() {
    let (dispatcher, clock, trips) = fixture();
    let before = dispatcher.trips().len();
    clock.set(at(6, 0));
    dispatcher.mark_departure(&trips[0].id).unwrap();
    clock.set(at(6, 57));

    let outcome = dispatcher.mark_arrival(&trips[0].id).unwrap();
    assert_eq!(outcome.trip.status, TripStatus::Completed);
    assert_eq!(outcome.trip.actual_arrival_time, Some(at(6, 57)));

    let bus = dispatcher.bus_by_id(&outcome.trip.bus_id).unwrap();
    assert_eq!(bus.status, BusStatus::Active);
    assert_eq!(bus.current_trips, 1);
    assert!((bus.active_hours - 57.0 / 60.0).abs() < 1e-9);

    let next = outcome.next_trip.expect("a follow-on trip");
    assert_eq!(next.trip_number, 2);
    assert_eq!(next.departure_time, at(7, 2));
    assert_eq!(next.status, TripStatus::Scheduled);
    assert!(next.is_return_trip);
    assert_eq!(dispatcher.trips().len(), before + 1);
}

#[test]
fn arrival_without_departure_counts_planned_time() {
    let (dispatcher, clock, trips) = fixture();
    clock.set(at(6, 57));

    let outcome = dispatcher.mark_arrival(&trips[0].id).unwrap();
    assert_eq!(outcome.trip.status, TripStatus::Completed);

    let bus = dispatcher.bus_by_id(&outcome.trip.bus_id).unwrap();
    assert_eq!(bus.current_trips, 1);
    // The 57 minute planned running time stands in for the unrecorded leg.
    assert!((bus.active_hours - 57.0 / 60.0).abs() < 1e-9);
    assert_eq!(outcome.next_trip.unwrap().departure_time, at(7, 2));
}

#[test]
fn cancelling_a_scheduled_trip_releases_the_bus() {
    let (dispatcher, _clock, trips) = fixture();
    let bus_id = trips[0].bus_id.clone();
    dispatcher
        .update_bus(
            &bus_id,
            BusPatch {
                status: Some(BusStatus::InTrip),
                ..Default::default()
            },
        )
        .unwrap();

    let outcome = dispatcher.cancel_trip(&trips[1].id).unwrap();
    assert!(outcome.released_bus);
    assert_eq!(outcome.trip.status, TripStatus::Cancelled);
    assert_eq!(
        dispatcher.bus_by_id(&bus_id).unwrap().status,
        BusStatus::Active
    );
}

#[test]
fn cancelling_a_running_trip_leaves_the_bus() {
    let (dispatcher, clock, trips) = fixture();
    clock.set(at(6, 0));
    dispatcher.mark_departure(&trips[0].id).unwrap();

    let outcome = dispatcher.cancel_trip(&trips[0].id).unwrap();
    assert!(!outcome.released_bus);
    assert_eq!(outcome.trip.status, TripStatus::Cancelled);
    assert_eq!(
        dispatcher.bus_by_id(&outcome.trip.bus_id).unwrap().status,
        BusStatus::InTrip
    );
}

#[test]
fn unknown_trips_are_an_explicit_outcome() {
    let (dispatcher, _clock, _trips) = fixture();
    let before = dispatcher.trips();
    assert!(matches!(
        dispatcher.mark_departure("ghost"),
        Err(Error::TripNotFound(_))
    ));
    assert!(matches!(
        dispatcher.mark_arrival("ghost"),
        Err(Error::TripNotFound(_))
    ));
    assert!(matches!(
        dispatcher.cancel_trip("ghost"),
        Err(Error::TripNotFound(_))
    ));
    assert_eq!(dispatcher.trips(), before);
}
