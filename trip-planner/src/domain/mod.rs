//! Domain types for the trip planner.
//!
//! This module contains the validated model shared by every component:
//! coordinates, places, legs, alerts and itineraries. Types that carry
//! invariants enforce them at construction time, so code receiving them can
//! trust their validity.

mod alert;
mod color;
mod coordinate;
mod error;
mod itinerary;
mod leg;
mod mode;
mod place;
mod time;

pub use alert::{Alert, AlertFilter, AlertLevel, AlertSeverity, SuppressionRule};
pub use color::{HexColor, InvalidHexColor};
pub use coordinate::{Bounds, Coordinate, MAX_LATITUDE, MAX_LONGITUDE};
pub use error::DomainError;
pub use itinerary::Itinerary;
pub use leg::{Leg, LegPlace, RouteInfo, StopTime, UNKNOWN_PLACE, UNNAMED_INTERMEDIATE_STOP};
pub use mode::{Mode, ModeIcon};
pub use place::Place;
pub use time::{
    DepartureTime, format_clock, format_distance, format_distance_compact, format_duration,
    format_time_range, from_epoch_millis,
};
