//! Detail timeline and result-list presentation.
//!
//! Everything here is derived, read-only data recomputed from an
//! [`Itinerary`](crate::domain::Itinerary) whenever the selection or the
//! per-leg expansion changes.

mod builder;
mod node;
mod stats;
mod summary;
mod theme;

pub use builder::{ExpandedLegs, Timeline, TimelineBuilder, WALK_TITLE};
pub use node::{Connector, LegNode, StopNode, TimelineNode};
pub use stats::TimelineStats;
pub use summary::{ItineraryAlert, ItinerarySummary, LegBadge, detail_labels, itinerary_alerts};
pub use theme::{BadgeColors, TimelineTheme};
