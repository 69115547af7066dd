//! Dispatch engine for fixed-route bus fleets: plans a full service day per
//! bus, advances trips through their lifecycle on departure/arrival events,
//! and chains follow-on trips as buses complete runs.

pub mod engine;
pub mod fleet;
pub mod repository;
pub mod shared;

pub mod prelude {
    pub use crate::engine::{
        ArrivalOutcome, CancellationOutcome, DayReport, DepartureOutcome, Dispatcher, Error,
        ScheduleReport, SkipReason, SkippedBus,
    };
    pub use crate::fleet::Fleet;
    pub use crate::repository::{
        Bus, BusConfig, BusPatch, BusStatus, Route, RouteConfig, RoutePatch, Snapshot, Store,
        Trip, TripStatus,
    };
    pub use crate::shared::clock::{Clock, FixedClock, SystemClock};
}
