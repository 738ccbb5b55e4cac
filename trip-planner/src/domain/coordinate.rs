//! Geographic coordinate type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum absolute latitude in degrees.
pub const MAX_LATITUDE: f64 = 90.0;

/// Maximum absolute longitude in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// A (longitude, latitude) pair in WGS84 degrees.
///
/// Coordinates are compared with exact floating-point equality. Two
/// coordinates produced by the same interaction compare equal; a marker
/// dragged by a fraction of a pixel does not.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::Coordinate;
///
/// let krakow = Coordinate::new(19.945, 50.0647);
/// assert_eq!(krakow.lat, 50.0647);
/// assert_eq!(krakow.display_label(), "50.064700, 19.945000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees, east positive.
    pub lng: f64,
    /// Latitude in degrees, north positive.
    pub lat: f64,
}

impl Coordinate {
    /// Create a coordinate from longitude and latitude (GeoJSON order).
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Create a coordinate from latitude and longitude (polyline order).
    pub fn from_lat_lng(lat: f64, lng: f64) -> Self {
        Self { lng, lat }
    }

    /// Returns true if both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= MAX_LATITUDE
            && self.lng.abs() <= MAX_LONGITUDE
    }

    /// Format as `"{lat}, {lng}"` with six decimal digits.
    ///
    /// This is the text shown for an endpoint whose coordinate came from a
    /// marker drag and has no resolved address yet.
    pub fn display_label(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }

    /// Returns the coordinate as a `[lng, lat]` array.
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_label())
    }
}

/// An axis-aligned bounding box over coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// South-west corner.
    pub min: Coordinate,
    /// North-east corner.
    pub max: Coordinate,
}

impl Bounds {
    /// The smallest box containing both coordinates.
    pub fn spanning(a: Coordinate, b: Coordinate) -> Self {
        Self {
            min: Coordinate::new(a.lng.min(b.lng), a.lat.min(b.lat)),
            max: Coordinate::new(a.lng.max(b.lng), a.lat.max(b.lat)),
        }
    }
}
