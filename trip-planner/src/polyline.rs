//! Encoded polyline decoding.
//!
//! Leg geometries arrive in the Google encoded polyline format: a sequence
//! of zig-zag encoded, variable-length signed deltas at 1e-5 degree
//! precision, latitude first.
//!
//! Decoding never fails. Empty or malformed input decodes to an empty
//! sequence, which callers treat as "no renderable geometry".

use crate::domain::Coordinate;

/// Scale of the encoded integer deltas.
const PRECISION: f64 = 1e5;

/// Bit offset of the last chunk accepted for one value.
const MAX_SHIFT: u32 = 30;

/// Decode a polyline into `(latitude, longitude)` pairs.
///
/// # Examples
///
/// ```
/// use trip_planner::polyline::decode;
///
/// let points = decode("_p~iF~ps|U_ulLnnqC");
/// assert_eq!(points, vec![(38.5, -120.2), (40.7, -120.95)]);
///
/// assert!(decode("").is_empty());
/// assert!(decode("_p~iF~ps|").is_empty());
/// ```
pub fn decode(encoded: &str) -> Vec<(f64, f64)> {
    decode_deltas(encoded.as_bytes()).unwrap_or_default()
}

/// Decode a polyline into [`Coordinate`]s.
pub fn decode_coordinates(encoded: &str) -> Vec<Coordinate> {
    decode(encoded)
        .into_iter()
        .map(|(lat, lng)| Coordinate::from_lat_lng(lat, lng))
        .collect()
}

fn decode_deltas(bytes: &[u8]) -> Option<Vec<(f64, f64)>> {
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat = lat.checked_add(next_value(bytes, &mut index)?)?;
        lng = lng.checked_add(next_value(bytes, &mut index)?)?;
        points.push((lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Some(points)
}

/// Read one zig-zag encoded value starting at `index`.
///
/// Returns `None` on a byte outside the alphabet, a truncated chunk
/// sequence, or a value wider than seven chunks.
fn next_value(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result: u64 = 0;
    let mut shift = 0u32;

    loop {
        let byte = *bytes.get(*index)?;
        *index += 1;

        let chunk = byte.checked_sub(63)?;
        if chunk > 0x3f || shift > MAX_SHIFT {
            return None;
        }

        result |= u64::from(chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    let value = (result >> 1) as i64;
    Some(if result & 1 == 1 { !value } else { value })
}
