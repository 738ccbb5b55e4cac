//! Photon API response DTOs.
//!
//! Photon answers both forward and reverse queries with a GeoJSON
//! `FeatureCollection`. Every property is optional: OSM objects carry
//! whichever tags their mappers filled in.

use serde::Deserialize;

/// Response from `/api/` or `/reverse`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One geocoded OSM object.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: FeatureProperties,
    pub geometry: Option<PointGeometry>,
}

/// Address and classification tags of a feature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    pub name: Option<String>,
    pub street: Option<String>,
    pub housenumber: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,

    /// OSM tag key, e.g. `"amenity"`.
    pub osm_key: Option<String>,

    /// OSM tag value, e.g. `"restaurant"`.
    pub osm_value: Option<String>,
}

/// GeoJSON point geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct PointGeometry {
    /// `[lng, lat]`.
    #[serde(default)]
    pub coordinates: Vec<f64>,
}
