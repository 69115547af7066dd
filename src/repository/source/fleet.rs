use crate::{
    fleet::{self, Fleet},
    repository::{Bus, BusStatus, Route, Store},
};
use chrono::Local;
use std::{sync::Arc, time::Instant};
use tracing::{debug, warn};

impl Store {
    /// Seeds the store from a fleet configuration source. Routes load first
    /// so bus route references can be checked against them.
    pub fn load_fleet(self, fleet: Fleet) -> Result<Self, fleet::Error> {
        self.load_routes(&fleet)?;
        self.load_buses(&fleet)?;
        Ok(self)
    }

    fn load_routes(&self, fleet: &Fleet) -> Result<(), fleet::Error> {
        debug!("Loading routes...");
        let now = Instant::now();
        let mut catalog = self.write();
        fleet.stream_routes(|(_, record)| {
            catalog.insert_route(Route {
                id: record.route_id.into(),
                from_location: record.from_location.into(),
                to_location: record.to_location.into(),
                base_travel_time: record.base_travel_time,
                middle_stop_count: record.middle_stop_count,
                stop_delay_per_stop: record.stop_delay_per_stop,
                distance: record.distance,
            });
        })?;
        debug!("Loading routes took {:?}", now.elapsed());
        Ok(())
    }

    fn load_buses(&self, fleet: &Fleet) -> Result<(), fleet::Error> {
        debug!("Loading buses...");
        let now = Instant::now();
        let loaded_at = Local::now().naive_local();
        let mut catalog = self.write();
        fleet.stream_buses(|(_, record)| {
            let status = match record.status.as_deref() {
                None | Some("active") => BusStatus::Active,
                Some("inactive") => BusStatus::Inactive,
                Some("maintenance") => BusStatus::Maintenance,
                Some("in-trip") => BusStatus::InTrip,
                Some(other) => {
                    warn!(
                        "Bus {} has unknown status {other}, keeping it active",
                        record.bus_id
                    );
                    BusStatus::Active
                }
            };
            let assigned_route: Option<Arc<str>> = record.assigned_route.map(Into::into);
            if let Some(route_id) = &assigned_route
                && catalog.route(route_id).is_none()
            {
                warn!("Bus {} references unknown route {route_id}", record.bus_id);
            }
            catalog.insert_bus(Bus {
                id: record.bus_id.into(),
                number_plate: record.number_plate.into(),
                home_stand: record.home_stand.into(),
                max_trips_per_day: record.max_trips_per_day,
                max_active_hours: record.max_active_hours,
                status,
                assigned_route,
                current_trips: 0,
                active_hours: 0.0,
                last_updated: loaded_at,
            });
        })?;
        debug!("Loading buses took {:?}", now.elapsed());
        Ok(())
    }
}
