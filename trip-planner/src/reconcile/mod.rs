//! Endpoint reconciliation.
//!
//! Each trip endpoint has a text buffer, an optional coordinate and a tag
//! recording which interaction produced it. Typing, suggestion selection,
//! marker drags, reverse geocoding and swapping all write to the same
//! state; the rules here decide which write wins and what the field shows.

mod display;
mod endpoint;
mod reconciler;

pub use display::display_text;
pub use endpoint::{CoordinateSource, Endpoint, Side};
pub use reconciler::CoordinateReconciler;
