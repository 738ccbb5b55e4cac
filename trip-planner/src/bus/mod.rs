//! Map synchronisation bus.
//!
//! The planner and the map widget never call each other. The planner
//! publishes the route and marker positions; the map publishes marker drags
//! and its ready signal; the navigation host publishes tab changes. Each
//! topic has exactly one payload type.

mod event;
mod map_bus;
mod view;

pub use event::{MapEvent, MarkerUpdate, PanelTab, RouteSegmentGeometry, Topic, ViewportUpdate};
pub use map_bus::{MapBus, Subscription};
pub use view::{
    FIT_MAX_ZOOM, FIT_MIN_ZOOM, FIT_PADDING, FLY_TO_ZOOM, FitOptions, MapController, MapSurface,
};
