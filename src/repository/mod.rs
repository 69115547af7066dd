use chrono::NaiveDateTime;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::warn;

mod models;
mod source;

pub use models::*;

/// Keyed collections of every dispatch record: buses, routes, trips.
///
/// Collections keep insertion order (a `Vec` per kind plus an id lookup), so
/// fleet order drives the schedule stagger and `current_trip_for_bus` is
/// deterministic. All access goes through one lock; mutating commands hold
/// the write guard for their whole read-then-write sequence, which rules out
/// lost updates on the duty counters.
#[derive(Debug, Default)]
pub struct Store {
    inner: RwLock<Catalog>,
}

impl Store {
    pub fn new() -> Self {
        Default::default()
    }

    /// Rebuilds a store from a previously exported [`Snapshot`].
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let store = Self::new();
        {
            let mut catalog = store.write();
            for route in snapshot.routes {
                catalog.insert_route(route);
            }
            for bus in snapshot.buses {
                catalog.insert_bus(bus);
            }
            for trip in snapshot.trips {
                catalog.insert_trip(trip);
            }
        }
        store
    }

    pub fn snapshot(&self) -> Snapshot {
        let catalog = self.read();
        Snapshot {
            buses: catalog.buses.clone(),
            routes: catalog.routes.clone(),
            trips: catalog.trips.clone(),
        }
    }

    pub fn buses(&self) -> Vec<Bus> {
        self.read().buses.clone()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.read().routes.clone()
    }

    pub fn trips(&self) -> Vec<Trip> {
        self.read().trips.clone()
    }

    pub fn bus_by_id(&self, id: &str) -> Option<Bus> {
        self.read().bus(id).cloned()
    }

    pub fn route_by_id(&self, id: &str) -> Option<Route> {
        self.read().route(id).cloned()
    }

    pub fn trip_by_id(&self, id: &str) -> Option<Trip> {
        self.read().trip(id).cloned()
    }

    /// The trip currently occupying a bus: the first stored trip for that
    /// bus still scheduled or running. At most one is expected by
    /// construction; if that is ever violated the first match wins.
    pub fn current_trip_for_bus(&self, bus_id: &str) -> Option<Trip> {
        self.read()
            .trips
            .iter()
            .find(|trip| trip.bus_id.as_ref() == bus_id && trip.is_open())
            .cloned()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.inner.read().unwrap()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.inner.write().unwrap()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Catalog {
    seq: u64,
    buses: Vec<Bus>,
    bus_lookup: HashMap<Arc<str>, usize>,
    routes: Vec<Route>,
    route_lookup: HashMap<Arc<str>, usize>,
    trips: Vec<Trip>,
    trip_lookup: HashMap<Arc<str>, usize>,
}

impl Catalog {
    pub(crate) fn bus(&self, id: &str) -> Option<&Bus> {
        self.bus_lookup.get(id).map(|index| &self.buses[*index])
    }

    pub(crate) fn bus_mut(&mut self, id: &str) -> Option<&mut Bus> {
        self.bus_lookup
            .get(id)
            .map(|index| &mut self.buses[*index])
    }

    pub(crate) fn buses(&self) -> &[Bus] {
        &self.buses
    }

    pub(crate) fn buses_mut(&mut self) -> &mut [Bus] {
        &mut self.buses
    }

    pub(crate) fn route(&self, id: &str) -> Option<&Route> {
        self.route_lookup.get(id).map(|index| &self.routes[*index])
    }

    pub(crate) fn route_mut(&mut self, id: &str) -> Option<&mut Route> {
        self.route_lookup
            .get(id)
            .map(|index| &mut self.routes[*index])
    }

    pub(crate) fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub(crate) fn trip(&self, id: &str) -> Option<&Trip> {
        self.trip_lookup.get(id).map(|index| &self.trips[*index])
    }

    pub(crate) fn trip_mut(&mut self, id: &str) -> Option<&mut Trip> {
        self.trip_lookup
            .get(id)
            .map(|index| &mut self.trips[*index])
    }

    pub(crate) fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub(crate) fn insert_bus(&mut self, bus: Bus) {
        match self.bus_lookup.get(&bus.id) {
            Some(index) => self.buses[*index] = bus,
            None => {
                self.bus_lookup.insert(bus.id.clone(), self.buses.len());
                self.buses.push(bus);
            }
        }
    }

    pub(crate) fn insert_route(&mut self, route: Route) {
        match self.route_lookup.get(&route.id) {
            Some(index) => self.routes[*index] = route,
            None => {
                self.route_lookup
                    .insert(route.id.clone(), self.routes.len());
                self.routes.push(route);
            }
        }
    }

    pub(crate) fn insert_trip(&mut self, trip: Trip) {
        match self.trip_lookup.get(&trip.id) {
            Some(index) => self.trips[*index] = trip,
            None => {
                self.trip_lookup.insert(trip.id.clone(), self.trips.len());
                self.trips.push(trip);
            }
        }
    }

    pub(crate) fn retain_trips<F>(&mut self, keep: F)
    where
        F: FnMut(&Trip) -> bool,
    {
        self.trips.retain(keep);
        self.trip_lookup = self
            .trips
            .iter()
            .enumerate()
            .map(|(index, trip)| (trip.id.clone(), index))
            .collect();
    }

    /// Sets a bus's status, stamping `last_updated`. A missing bus degrades
    /// to a logged no-op.
    pub(crate) fn set_bus_status(&mut self, bus_id: &str, status: BusStatus, now: NaiveDateTime) {
        match self.bus_mut(bus_id) {
            Some(bus) => {
                bus.status = status;
                bus.last_updated = now;
            }
            None => warn!("Bus id {bus_id} does not match any entry"),
        }
    }

    pub(crate) fn next_bus_id(&mut self) -> Arc<str> {
        allocate_id(&mut self.seq, "b", &self.bus_lookup)
    }

    pub(crate) fn next_route_id(&mut self) -> Arc<str> {
        allocate_id(&mut self.seq, "r", &self.route_lookup)
    }

    pub(crate) fn next_trip_id(&mut self) -> Arc<str> {
        allocate_id(&mut self.seq, "t", &self.trip_lookup)
    }
}

/// Ids from the store sequence skip anything the loader already claimed.
fn allocate_id(seq: &mut u64, prefix: &str, lookup: &HashMap<Arc<str>, usize>) -> Arc<str> {
    loop {
        *seq += 1;
        let id: Arc<str> = format!("{prefix}{}", *seq).into();
        if !lookup.contains_key(&id) {
            return id;
        }
    }
}
