//! Conversion from OTP DTOs to domain types.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::domain::{
    Alert, AlertSeverity, Coordinate, DomainError, HexColor, Itinerary, Leg, LegPlace, Mode,
    RouteInfo, StopTime, from_epoch_millis,
};

use super::types::{
    AlertNode, IntermediatePlace, ItineraryNode, LegNode, PlaceNode, PlanConnection, RouteNode,
};

/// Errors that can occur when converting planner data.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// A required field was absent
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A timestamp was outside the representable range
    #[error("invalid timestamp: {0}")]
    InvalidTime(i64),

    /// The legs violated an itinerary invariant
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Convert every itinerary of a response, skipping malformed ones.
pub fn convert_connection(connection: PlanConnection) -> Vec<Itinerary> {
    connection
        .edges
        .into_iter()
        .enumerate()
        .filter_map(|(index, edge)| match convert_itinerary(edge.node) {
            Ok(itinerary) => Some(itinerary),
            Err(e) => {
                warn!(index, error = %e, "skipping itinerary");
                None
            }
        })
        .collect()
}

pub fn convert_itinerary(node: ItineraryNode) -> Result<Itinerary, ConversionError> {
    let legs = node
        .legs
        .into_iter()
        .map(convert_leg)
        .collect::<Result<Vec<_>, _>>()?;

    let duration = node
        .duration
        .filter(|secs| secs.is_finite())
        .map(|secs| Duration::seconds(secs.round() as i64));

    Ok(Itinerary::new(legs, duration)?)
}

pub fn convert_leg(node: LegNode) -> Result<Leg, ConversionError> {
    let mode = node.mode.ok_or(ConversionError::MissingField("mode"))?;
    let start = timestamp(node.start_time, "startTime")?;
    let end = timestamp(node.end_time, "endTime")?;

    let mut leg = Leg::new(Mode::parse(&mode), start, end);
    leg.reported_duration = node.duration;
    leg.distance = node.distance;
    leg.realtime = node.real_time.unwrap_or(false);
    leg.geometry = node
        .leg_geometry
        .and_then(|g| g.points)
        .filter(|p| !p.is_empty());
    leg.route = node.route.map(convert_route);
    leg.headsign = node.trip.and_then(|t| t.trip_headsign);
    leg.from = node.from.map(convert_place).unwrap_or_default();
    leg.to = node.to.map(convert_place).unwrap_or_default();
    leg.intermediate_stops = node
        .intermediate_places
        .unwrap_or_default()
        .into_iter()
        .map(convert_stop)
        .collect();
    leg.alerts = node
        .alerts
        .unwrap_or_default()
        .into_iter()
        .map(convert_alert)
        .collect();

    Ok(leg)
}

fn timestamp(ms: Option<i64>, field: &'static str) -> Result<DateTime<Utc>, ConversionError> {
    let ms = ms.ok_or(ConversionError::MissingField(field))?;
    from_epoch_millis(ms).ok_or(ConversionError::InvalidTime(ms))
}

fn convert_route(route: RouteNode) -> RouteInfo {
    RouteInfo {
        short_name: route.short_name,
        long_name: route.long_name,
        color: HexColor::normalize(route.color.as_deref()),
        text_color: HexColor::normalize(route.text_color.as_deref()),
    }
}

fn convert_place(place: PlaceNode) -> LegPlace {
    let coordinate = match (place.lon, place.lat) {
        (Some(lng), Some(lat)) => Some(Coordinate::new(lng, lat)).filter(Coordinate::is_valid),
        _ => None,
    };

    LegPlace {
        name: place.name,
        stop_code: place.stop.and_then(|s| s.code),
        coordinate,
    }
}

fn convert_stop(place: IntermediatePlace) -> StopTime {
    let (stop_name, stop_code) = match place.stop {
        Some(stop) => (stop.name, stop.code),
        None => (None, None),
    };

    StopTime {
        name: place.name,
        stop_name,
        stop_code,
        arrival: place.arrival_time.and_then(from_epoch_millis),
        departure: place.departure_time.and_then(from_epoch_millis),
    }
}

fn convert_alert(alert: AlertNode) -> Alert {
    Alert {
        severity: alert
            .alert_severity_level
            .as_deref()
            .and_then(AlertSeverity::parse),
        header: alert.alert_header_text.and_then(|t| t.into_text()),
        description: alert.alert_description_text.and_then(|t| t.into_text()),
    }
}
