//! Orchestrator phases, plan status and effects.

use crate::domain::{Coordinate, DepartureTime};
use crate::otp::PlanRequest;
use crate::reconcile::Side;
use crate::reverse::ReverseTicket;
use crate::search::SearchTicket;

/// Where the trip-planning flow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// An endpoint or the departure time is missing.
    Idle,
    /// Everything needed to plan is set; a plan is pending or produced
    /// nothing to show.
    Ready,
    /// Itineraries are listed but none is selected.
    Planned,
    /// One itinerary is selected and drawn.
    Selected,
    /// The selected itinerary's timeline is open.
    Detail,
}

/// Outcome of the most recent plan request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlanStatus {
    /// Nothing requested for the current inputs.
    #[default]
    Idle,
    Loading,
    /// At least one itinerary was returned.
    Found,
    /// The planner answered with zero itineraries.
    NoRoute,
    /// The request failed; the message is shown inline.
    Failed(String),
}

/// The inputs a plan was requested for. Labels are not part of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanParams {
    pub from: Coordinate,
    pub to: Coordinate,
    pub departure: DepartureTime,
}

/// An issued plan request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanTicket {
    pub(super) seq: u64,
    pub(super) params: PlanParams,
    pub(super) request: PlanRequest,
}

impl PlanTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn params(&self) -> &PlanParams {
        &self.params
    }

    pub fn request(&self) -> &PlanRequest {
        &self.request
    }
}

/// I/O the orchestrator wants performed.
///
/// Each effect carries the ticket its result must be completed with.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Query the place provider for an endpoint's text.
    Search { side: Side, ticket: SearchTicket },
    /// Resolve an endpoint's coordinate to an address.
    Reverse { side: Side, ticket: ReverseTicket },
    /// Ask the trip planner for itineraries.
    Plan(PlanTicket),
}
