//! Projection of an itinerary onto the map.

use crate::bus::RouteSegmentGeometry;
use crate::domain::{Itinerary, Mode};
use crate::polyline;
use crate::timeline::TimelineTheme;

/// One drawable segment per leg with usable geometry.
///
/// Legs whose polyline is missing or does not decode are left out.
pub fn project_route(itinerary: &Itinerary, theme: &TimelineTheme) -> Vec<RouteSegmentGeometry> {
    itinerary
        .legs()
        .iter()
        .filter_map(|leg| {
            let coordinates = polyline::decode_coordinates(leg.geometry.as_deref()?);
            let start = *coordinates.first()?;
            let end = *coordinates.last()?;

            Some(RouteSegmentGeometry {
                color: theme.map_color(leg),
                is_walk: leg.mode == Mode::Walk,
                mode: leg.mode.clone(),
                start,
                end,
                coordinates,
            })
        })
        .collect()
}
