//! Itinerary legs.
//!
//! A `Leg` is one continuous single-mode segment of an itinerary: a walk,
//! a tram ride, a bike stretch. Absent planner fields stay `None` rather
//! than defaulting to zero.

use chrono::{DateTime, Duration, Utc};

use super::{Alert, Coordinate, HexColor, Mode};

/// Label for a stop the planner did not name.
pub const UNKNOWN_PLACE: &str = "Unknown place";

/// Label for an intermediate stop the planner did not name.
pub const UNNAMED_INTERMEDIATE_STOP: &str = "Intermediate stop";

/// Route identity for a transit leg.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteInfo {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    /// Route color, already normalized.
    pub color: Option<HexColor>,
    /// Route text color, already normalized.
    pub text_color: Option<HexColor>,
}

/// Origin or destination of a leg.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegPlace {
    pub name: Option<String>,
    pub stop_code: Option<String>,
    pub coordinate: Option<Coordinate>,
}

impl LegPlace {
    /// The place name, or a placeholder.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_PLACE)
    }
}

/// An intermediate stop passed during a transit leg.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopTime {
    pub name: Option<String>,
    pub stop_name: Option<String>,
    pub stop_code: Option<String>,
    pub arrival: Option<DateTime<Utc>>,
    pub departure: Option<DateTime<Utc>>,
}

impl StopTime {
    /// The place name, else the stop name, else a placeholder.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.stop_name.as_deref())
            .unwrap_or(UNNAMED_INTERMEDIATE_STOP)
    }
}

/// A leg of an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub mode: Mode,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Duration reported by the planner, in seconds.
    pub reported_duration: Option<f64>,
    /// Distance in metres.
    pub distance: Option<f64>,
    /// Encoded polyline of the leg's path.
    pub geometry: Option<String>,
    pub route: Option<RouteInfo>,
    pub headsign: Option<String>,
    pub realtime: bool,
    pub from: LegPlace,
    pub to: LegPlace,
    pub intermediate_stops: Vec<StopTime>,
    pub alerts: Vec<Alert>,
}

impl Leg {
    /// A leg with only the required fields set.
    pub fn new(mode: Mode, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            mode,
            start_time,
            end_time,
            reported_duration: None,
            distance: None,
            geometry: None,
            route: None,
            headsign: None,
            realtime: false,
            from: LegPlace::default(),
            to: LegPlace::default(),
            intermediate_stops: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Duration: the planner's value, else end minus start (never negative).
    pub fn duration(&self) -> Duration {
        match self.reported_duration {
            Some(secs) if secs.is_finite() => Duration::seconds(secs.round().max(0.0) as i64),
            _ => self
                .end_time
                .signed_duration_since(self.start_time)
                .max(Duration::zero()),
        }
    }

    pub fn is_transit(&self) -> bool {
        self.mode.is_transit()
    }

    pub fn is_green(&self) -> bool {
        self.mode.is_green()
    }

    /// Route short name, else long name, else trip headsign.
    pub fn route_label(&self) -> Option<&str> {
        let route = self.route.as_ref();
        route
            .and_then(|r| r.short_name.as_deref())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                route
                    .and_then(|r| r.long_name.as_deref())
                    .filter(|s| !s.is_empty())
            })
            .or_else(|| self.headsign.as_deref().filter(|s| !s.is_empty()))
    }

    /// Normalized route color, if any.
    pub fn route_color(&self) -> Option<&HexColor> {
        self.route.as_ref().and_then(|r| r.color.as_ref())
    }

    /// Normalized route text color, if any.
    pub fn route_text_color(&self) -> Option<&HexColor> {
        self.route.as_ref().and_then(|r| r.text_color.as_ref())
    }

    /// Label like `"Rondo Mogilskie → Dworzec Główny"`.
    pub fn span_label(&self) -> String {
        format!(
            "{} → {}",
            self.from.name.as_deref().unwrap_or("Start"),
            self.to.name.as_deref().unwrap_or("End")
        )
    }
}
