//! Conversion from Photon DTOs to domain places.

use tracing::warn;

use crate::domain::{Coordinate, Place};

use super::types::{Feature, FeatureCollection};

/// Error converting a single feature.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("feature has no point geometry")]
    MissingGeometry,

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(Coordinate),
}

/// Convert every usable feature, skipping the rest.
pub fn convert_features(collection: FeatureCollection) -> Vec<Place> {
    let mut places = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        match convert_feature(feature) {
            Ok(place) => places.push(place),
            Err(e) => warn!(error = %e, "skipping geocoding feature"),
        }
    }

    places
}

/// Convert one feature to a [`Place`].
pub fn convert_feature(feature: Feature) -> Result<Place, ConversionError> {
    let coordinates = feature
        .geometry
        .map(|g| g.coordinates)
        .unwrap_or_default();

    let &[lng, lat] = coordinates.as_slice() else {
        return Err(ConversionError::MissingGeometry);
    };

    let coordinate = Coordinate::new(lng, lat);
    if !coordinate.is_valid() {
        return Err(ConversionError::InvalidCoordinate(coordinate));
    }

    let props = feature.properties;
    Ok(Place {
        name: props.name.unwrap_or_default(),
        label: None,
        street: props.street,
        house_number: props.housenumber,
        city: props.city,
        country: props.country,
        is_coordinate: false,
        coordinate,
    })
}
