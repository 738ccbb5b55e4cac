//! Multimodal trip planner core.
//!
//! Plans a point-to-point trip through an external planner, lists the
//! candidate itineraries, builds an expandable timeline for the selected
//! one and keeps a separately mounted map in sync with the selection and
//! with marker drags.

pub mod bus;
pub mod config;
pub mod domain;
pub mod geocode;
pub mod incident;
pub mod orchestrator;
pub mod otp;
pub mod polyline;
pub mod reconcile;
pub mod reverse;
pub mod search;
pub mod session;
pub mod timeline;
