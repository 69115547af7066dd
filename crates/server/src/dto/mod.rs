use chrono::NaiveDate;
use fleetline::{
    engine::{ArrivalOutcome, CancellationOutcome, DepartureOutcome, ScheduleReport},
    repository::Trip,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureDto {
    pub outcome: &'static str,
    pub trip: Trip,
}

impl DepartureDto {
    pub fn from(outcome: &DepartureOutcome) -> Self {
        match outcome {
            DepartureOutcome::Departed(trip) => Self {
                outcome: "departed",
                trip: trip.clone(),
            },
            DepartureOutcome::Cancelled(trip) => Self {
                outcome: "cancelled",
                trip: trip.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalDto {
    pub trip: Trip,
    pub next_trip: Option<Trip>,
}

impl ArrivalDto {
    pub fn from(outcome: &ArrivalOutcome) -> Self {
        Self {
            trip: outcome.trip.clone(),
            next_trip: outcome.next_trip.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationDto {
    pub trip: Trip,
    pub released_bus: bool,
}

impl CancellationDto {
    pub fn from(outcome: &CancellationOutcome) -> Self {
        Self {
            trip: outcome.trip.clone(),
            released_bus: outcome.released_bus,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub day: NaiveDate,
    pub created: usize,
    pub trips: Vec<Trip>,
    pub skipped: Vec<SkippedDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDto {
    pub bus_id: String,
    pub reason: String,
}

impl ScheduleDto {
    pub fn from(report: &ScheduleReport) -> Self {
        Self {
            day: report.day,
            created: report.trips.len(),
            trips: report.trips.clone(),
            skipped: report
                .skipped
                .iter()
                .map(|skip| SkippedDto {
                    bus_id: skip.bus_id.to_string(),
                    reason: skip.reason.to_string(),
                })
                .collect(),
        }
    }
}
