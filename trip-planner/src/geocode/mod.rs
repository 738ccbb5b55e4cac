//! Geocoding collaborator.
//!
//! Free-text place search and reverse geocoding are provided by an external
//! service. The planner only depends on the [`PlaceProvider`] and
//! [`ReverseProvider`] traits; [`PhotonClient`] implements both against a
//! Photon (OSM) instance.

mod client;
mod convert;
mod error;
mod types;

use std::future::Future;

use crate::domain::{Coordinate, Place};

pub use client::{PhotonClient, PhotonConfig};
pub use convert::{ConversionError, convert_feature, convert_features};
pub use error::GeocodeError;
pub use types::{Feature, FeatureCollection, FeatureProperties, PointGeometry};

/// Source of free-text place suggestions.
///
/// This abstraction allows the search engine to be tested with mock data.
pub trait PlaceProvider: Send + Sync + 'static {
    /// Search for places matching `query`, best match first.
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Place>, GeocodeError>> + Send;
}

/// Source of addresses for coordinates.
pub trait ReverseProvider: Send + Sync + 'static {
    /// Return the best-matching place at `coordinate`, if any.
    fn reverse(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<Option<Place>, GeocodeError>> + Send;
}
