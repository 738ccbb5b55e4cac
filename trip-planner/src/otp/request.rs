//! Trip-planning request.

use crate::domain::Coordinate;

use super::types::{CoordinateInput, DateTimeInput, LabeledLocation, LocationInput, PlanVariables};

/// Maximum itineraries requested and shown.
pub const MAX_ITINERARIES: usize = 10;

/// Origin or destination of a plan request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEndpoint {
    /// Display text of the endpoint, if any.
    pub label: Option<String>,
    pub coordinate: Coordinate,
}

impl PlanEndpoint {
    /// An endpoint; blank labels are dropped.
    pub fn new(label: impl Into<String>, coordinate: Coordinate) -> Self {
        let label = label.into();
        Self {
            label: (!label.trim().is_empty()).then_some(label),
            coordinate,
        }
    }

    fn to_input(&self) -> LabeledLocation {
        LabeledLocation {
            label: self.label.clone(),
            location: LocationInput {
                coordinate: CoordinateInput {
                    latitude: self.coordinate.lat,
                    longitude: self.coordinate.lng,
                },
            },
        }
    }
}

/// Everything the trip planner needs for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub origin: PlanEndpoint,
    pub destination: PlanEndpoint,
    /// Earliest departure, `YYYY-MM-DDTHH:MM:SS±HH:MM`.
    pub earliest_departure: String,
    /// Number of itineraries to request.
    pub first: usize,
}

impl PlanRequest {
    pub fn new(
        origin: PlanEndpoint,
        destination: PlanEndpoint,
        earliest_departure: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            destination,
            earliest_departure: earliest_departure.into(),
            first: MAX_ITINERARIES,
        }
    }

    pub fn with_first(mut self, first: usize) -> Self {
        self.first = first;
        self
    }

    pub fn to_variables(&self) -> PlanVariables {
        PlanVariables {
            origin: self.origin.to_input(),
            destination: self.destination.to_input(),
            date_time: DateTimeInput {
                earliest_departure: self.earliest_departure.clone(),
            },
            first: self.first,
        }
    }
}
