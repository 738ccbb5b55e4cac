//! Free-text place search.
//!
//! Combines local recognition of coordinates typed as text with ranked
//! suggestions from the geocoding provider.

mod coordinates;
mod engine;

pub use coordinates::parse_coordinate_input;
pub use engine::{DEFAULT_MIN_QUERY_LEN, PlaceSearchEngine, SearchTicket};
