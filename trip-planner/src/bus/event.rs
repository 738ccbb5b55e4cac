//! Bus topics and payloads.

use serde::Serialize;

use crate::domain::{Coordinate, HexColor, Mode};
use crate::reconcile::Side;

/// One leg of the selected itinerary, as drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegmentGeometry {
    /// Decoded path in drawing order.
    pub coordinates: Vec<Coordinate>,
    pub color: HexColor,
    /// Walking legs are drawn dashed.
    pub is_walk: bool,
    #[serde(serialize_with = "serialize_mode")]
    pub mode: Mode,
    pub start: Coordinate,
    pub end: Coordinate,
}

fn serialize_mode<S: serde::Serializer>(mode: &Mode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(mode.as_str())
}

/// What to do with one endpoint marker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MarkerUpdate {
    /// Leave the marker as it is.
    #[default]
    Unchanged,
    /// Remove the marker.
    Remove,
    /// Place or move the marker.
    Set(Coordinate),
}

impl MarkerUpdate {
    /// `Set` for a coordinate, `Remove` for none.
    pub fn from_option(coordinate: Option<Coordinate>) -> Self {
        match coordinate {
            Some(c) => MarkerUpdate::Set(c),
            None => MarkerUpdate::Remove,
        }
    }
}

/// Marker and camera update for the map.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportUpdate {
    pub from: MarkerUpdate,
    pub to: MarkerUpdate,
    /// Fit both endpoints in view. Ignored unless both are known.
    pub fit_bounds: bool,
    /// Recentre on the single known endpoint. Ignored unless exactly one is
    /// known.
    pub fly_to: bool,
}

impl ViewportUpdate {
    /// Update both markers without moving the camera.
    pub fn markers(from: Option<Coordinate>, to: Option<Coordinate>) -> Self {
        Self {
            from: MarkerUpdate::from_option(from),
            to: MarkerUpdate::from_option(to),
            ..Self::default()
        }
    }

    /// Update one side's marker and leave the other alone.
    pub fn side(side: Side, update: MarkerUpdate) -> Self {
        let mut viewport = Self::default();
        *viewport.marker_mut(side) = update;
        viewport
    }

    pub fn marker(&self, side: Side) -> MarkerUpdate {
        match side {
            Side::From => self.from,
            Side::To => self.to,
        }
    }

    fn marker_mut(&mut self, side: Side) -> &mut MarkerUpdate {
        match side {
            Side::From => &mut self.from,
            Side::To => &mut self.to,
        }
    }

    pub fn with_fit_bounds(mut self) -> Self {
        self.fit_bounds = true;
        self
    }

    pub fn with_fly_to(mut self) -> Self {
        self.fly_to = true;
        self
    }
}

/// Side panel tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTab {
    Trip,
    Stops,
    Routes,
}

impl PanelTab {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "trip" => Some(PanelTab::Trip),
            "stops" => Some(PanelTab::Stops),
            "routes" => Some(PanelTab::Routes),
            _ => None,
        }
    }
}

/// Topic of a [`MapEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    RouteDraw,
    ViewportUpdate,
    MarkerMoved,
    PanelTabChanged,
    MapReady,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::RouteDraw,
        Topic::ViewportUpdate,
        Topic::MarkerMoved,
        Topic::PanelTabChanged,
        Topic::MapReady,
    ];
}

/// A message on the map bus.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Replace the route overlay. An empty list clears it.
    RouteDraw(Vec<RouteSegmentGeometry>),
    /// Move markers and optionally the camera.
    ViewportUpdate(ViewportUpdate),
    /// The user dragged an endpoint marker.
    MarkerMoved { side: Side, coordinate: Coordinate },
    /// The active side panel tab changed.
    PanelTabChanged(PanelTab),
    /// The map finished loading and can draw.
    MapReady,
}

impl MapEvent {
    pub fn topic(&self) -> Topic {
        match self {
            MapEvent::RouteDraw(_) => Topic::RouteDraw,
            MapEvent::ViewportUpdate(_) => Topic::ViewportUpdate,
            MapEvent::MarkerMoved { .. } => Topic::MarkerMoved,
            MapEvent::PanelTabChanged(_) => Topic::PanelTabChanged,
            MapEvent::MapReady => Topic::MapReady,
        }
    }
}
