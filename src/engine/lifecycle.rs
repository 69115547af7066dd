use super::{Dispatcher, Error, chaining};
use crate::{
    repository::{BusStatus, Trip, TripStatus},
    shared::clock::Clock,
};
use tracing::{debug, warn};

/// Grace for the first departure of a bus's day.
const FIRST_TRIP_TOLERANCE_MINUTES: i64 = 8;
/// Grace for every later departure.
const TRIP_TOLERANCE_MINUTES: i64 = 5;

/// Result of [`Dispatcher::mark_departure`]. A cancellation here is a
/// business outcome, not an error: the recorded delay exceeded tolerance and
/// the bus was released instead of sent out.
#[derive(Debug, Clone)]
pub enum DepartureOutcome {
    Departed(Trip),
    Cancelled(Trip),
}

impl DepartureOutcome {
    pub fn trip(&self) -> &Trip {
        match self {
            Self::Departed(trip) | Self::Cancelled(trip) => trip,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArrivalOutcome {
    pub trip: Trip,
    /// Follow-on trip created by the chaining policy, if limits allowed one.
    pub next_trip: Option<Trip>,
}

#[derive(Debug, Clone)]
pub struct CancellationOutcome {
    pub trip: Trip,
    /// Whether the owning bus went back to active service. Only a trip that
    /// was still scheduled releases its bus.
    pub released_bus: bool,
}

impl<C: Clock> Dispatcher<C> {
    /// Records a real-world departure. Departing within tolerance (8 minutes
    /// for the day's first trip, 5 otherwise) sets the trip running and the
    /// bus in-trip; anything later cancels the trip and releases the bus.
    pub fn mark_departure(&self, trip_id: &str) -> Result<DepartureOutcome, Error> {
        let now = self.clock.now();
        let mut catalog = self.store.write();
        let Some(trip) = catalog.trip_mut(trip_id) else {
            return Err(Error::TripNotFound(trip_id.into()));
        };

        let delay_minutes = (now - trip.departure_time).num_minutes().max(0);
        let tolerance = if trip.trip_number == 1 {
            FIRST_TRIP_TOLERANCE_MINUTES
        } else {
            TRIP_TOLERANCE_MINUTES
        };

        if delay_minutes > tolerance {
            trip.status = TripStatus::Cancelled;
            trip.delay_minutes = Some(delay_minutes);
            let trip = trip.clone();
            debug!(
                "Trip {} cancelled, {delay_minutes} min late against a tolerance of {tolerance}",
                trip.id
            );
            catalog.set_bus_status(&trip.bus_id, BusStatus::Active, now);
            Ok(DepartureOutcome::Cancelled(trip))
        } else {
            trip.status = TripStatus::Running;
            trip.actual_departure_time = Some(now);
            trip.delay_minutes = (delay_minutes > 0).then_some(delay_minutes);
            let trip = trip.clone();
            catalog.set_bus_status(&trip.bus_id, BusStatus::InTrip, now);
            Ok(DepartureOutcome::Departed(trip))
        }
    }

    /// Records a real-world arrival: completes the trip, adds the realized
    /// travel time to the bus's duty counters, and lets the chaining policy
    /// schedule the follow-on run.
    pub fn mark_arrival(&self, trip_id: &str) -> Result<ArrivalOutcome, Error> {
        let now = self.clock.now();
        let mut catalog = self.store.write();
        let Some(trip) = catalog.trip_mut(trip_id) else {
            return Err(Error::TripNotFound(trip_id.into()));
        };
        trip.status = TripStatus::Completed;
        trip.actual_arrival_time = Some(now);
        let completed = trip.clone();

        let Some(route) = catalog.route(&completed.route_id).cloned() else {
            warn!(
                "Route id {} does not match any entry, bus stats left untouched",
                completed.route_id
            );
            return Ok(ArrivalOutcome {
                trip: completed,
                next_trip: None,
            });
        };
        let travel_minutes = match completed.actual_departure_time {
            Some(departed) => (now - departed).num_minutes(),
            // Departure was never recorded; count the planned running time.
            None => i64::from(route.total_travel_time()),
        };
        let Some(bus) = catalog.bus_mut(&completed.bus_id) else {
            warn!(
                "Bus id {} does not match any entry, bus stats left untouched",
                completed.bus_id
            );
            return Ok(ArrivalOutcome {
                trip: completed,
                next_trip: None,
            });
        };
        bus.status = BusStatus::Active;
        bus.current_trips += 1;
        bus.active_hours += travel_minutes as f64 / 60.0;
        bus.last_updated = now;
        let bus = bus.clone();

        let next_trip = chaining::next_trip(&bus, &completed, &route, now).map(|mut trip| {
            trip.id = catalog.next_trip_id();
            catalog.insert_trip(trip.clone());
            debug!(
                "Chained trip {} for bus {} departing {}",
                trip.id, trip.bus_id, trip.departure_time
            );
            trip
        });

        Ok(ArrivalOutcome {
            trip: completed,
            next_trip,
        })
    }

    /// Cancels a trip outright. A still-scheduled trip releases its bus back
    /// to active service; a trip already past departure leaves the bus alone.
    pub fn cancel_trip(&self, trip_id: &str) -> Result<CancellationOutcome, Error> {
        let now = self.clock.now();
        let mut catalog = self.store.write();
        let Some(trip) = catalog.trip_mut(trip_id) else {
            return Err(Error::TripNotFound(trip_id.into()));
        };
        let released_bus = trip.status == TripStatus::Scheduled;
        trip.status = TripStatus::Cancelled;
        let trip = trip.clone();
        if released_bus {
            catalog.set_bus_status(&trip.bus_id, BusStatus::Active, now);
        }
        Ok(CancellationOutcome { trip, released_bus })
    }
}
