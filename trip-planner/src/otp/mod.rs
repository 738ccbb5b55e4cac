//! Trip-planning collaborator.
//!
//! Itinerary ranking is entirely the planner's job. The core only depends
//! on the [`TripPlanner`] trait; [`OtpClient`] implements it against an
//! OpenTripPlanner GTFS GraphQL endpoint.

mod client;
mod convert;
mod error;
mod query;
mod request;
mod types;

use std::future::Future;

use crate::domain::Itinerary;

pub use client::{OtpClient, OtpConfig, parse_plan_response};
pub use convert::{ConversionError, convert_connection, convert_itinerary, convert_leg};
pub use error::PlanError;
pub use query::PLAN_CONNECTION_QUERY;
pub use request::{MAX_ITINERARIES, PlanEndpoint, PlanRequest};
pub use types::{
    AlertNode, GraphQlError, GraphQlRequest, GraphQlResponse, IntermediatePlace, ItineraryEdge,
    ItineraryNode, LegGeometry, LegNode, PlaceNode, PlanConnection, PlanData, PlanVariables,
    RouteNode, StopRef, TranslatedText, TripNode,
};

/// Source of itineraries.
///
/// This abstraction allows the orchestrator to be tested with mock data.
pub trait TripPlanner: Send + Sync + 'static {
    /// Plan a trip. The result is ordered best first.
    fn plan(
        &self,
        request: &PlanRequest,
    ) -> impl Future<Output = Result<Vec<Itinerary>, PlanError>> + Send;
}
