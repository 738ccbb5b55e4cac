//! Trip-planning orchestration.
//!
//! [`TripOrchestrator`] ties the endpoints, the trip planner and the map
//! together: it decides when a plan is requested, which results still
//! apply, what is selected and what the map should show.

mod route;
mod state;
mod trip;

pub use route::project_route;
pub use state::{Effect, Phase, PlanParams, PlanStatus, PlanTicket};
pub use trip::TripOrchestrator;

#[cfg(test)]
mod orchestrator_tests;
