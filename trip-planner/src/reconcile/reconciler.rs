//! Reconciliation of both trip endpoints.

use tracing::debug;

use crate::domain::{Coordinate, Place};
use crate::geocode::GeocodeError;
use crate::reverse::ReverseTicket;
use crate::search::{DEFAULT_MIN_QUERY_LEN, SearchTicket};

use super::{Endpoint, Side};

/// Owns the "from" and "to" endpoints and merges every trigger that can
/// change them: typing, suggestion selection, marker drags, reverse
/// geocoding results, clearing and swapping.
///
/// Operations that need I/O return tickets; results are applied with
/// [`complete_search`](Self::complete_search) and
/// [`complete_reverse`](Self::complete_reverse).
#[derive(Debug, Clone)]
pub struct CoordinateReconciler {
    from: Endpoint,
    to: Endpoint,
}

impl CoordinateReconciler {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            from: Endpoint::new(min_query_len),
            to: Endpoint::new(min_query_len),
        }
    }

    pub fn endpoint(&self, side: Side) -> &Endpoint {
        match side {
            Side::From => &self.from,
            Side::To => &self.to,
        }
    }

    fn endpoint_mut(&mut self, side: Side) -> &mut Endpoint {
        match side {
            Side::From => &mut self.from,
            Side::To => &mut self.to,
        }
    }

    pub fn coordinate(&self, side: Side) -> Option<Coordinate> {
        self.endpoint(side).coordinate()
    }

    /// Both coordinates, if both endpoints are resolved.
    pub fn coordinates(&self) -> Option<(Coordinate, Coordinate)> {
        Some((self.from.coordinate()?, self.to.coordinate()?))
    }

    pub fn display_text(&self, side: Side) -> String {
        self.endpoint(side).display_text()
    }

    pub fn focus(&mut self, side: Side) {
        self.endpoint_mut(side).focus();
    }

    /// Returns true if the field is left without a coordinate.
    pub fn blur(&mut self, side: Side) -> bool {
        self.endpoint_mut(side).blur()
    }

    /// Replace the text buffer, dropping the coordinate.
    pub fn type_text(&mut self, side: Side, text: &str) -> Option<SearchTicket> {
        self.endpoint_mut(side).type_text(text)
    }

    /// Commit a suggestion.
    ///
    /// Any pending address for the endpoint is discarded before the new
    /// coordinate is set. A raw coordinate suggestion starts a lookup of its
    /// address.
    pub fn select_suggestion(&mut self, side: Side, place: &Place) -> Option<ReverseTicket> {
        debug!(%side, name = %place.name, "suggestion selected");
        self.endpoint_mut(side).select(place)
    }

    /// Move the endpoint to a dragged marker position.
    ///
    /// The text is dropped so the coordinate (and later its address) shows
    /// through. A lookup is started only if `resolve` is set.
    pub fn drag_marker(
        &mut self,
        side: Side,
        coordinate: Coordinate,
        resolve: bool,
    ) -> Option<ReverseTicket> {
        debug!(%side, %coordinate, resolve, "marker dragged");
        self.endpoint_mut(side).drag(coordinate, resolve)
    }

    pub fn clear(&mut self, side: Side) {
        self.endpoint_mut(side).clear();
    }

    /// Exchange both endpoints including their sources.
    ///
    /// With `resolve` set, both coordinates are looked up again.
    pub fn swap(&mut self, resolve: bool) -> Vec<(Side, ReverseTicket)> {
        self.from.exchange(&mut self.to);

        if !resolve {
            return Vec::new();
        }

        [Side::From, Side::To]
            .into_iter()
            .filter_map(|side| self.endpoint_mut(side).resolve().map(|t| (side, t)))
            .collect()
    }

    /// Apply a place search outcome. Returns false if stale.
    pub fn complete_search(
        &mut self,
        side: Side,
        ticket: &SearchTicket,
        outcome: Result<Vec<Place>, GeocodeError>,
    ) -> bool {
        self.endpoint_mut(side).complete_search(ticket, outcome)
    }

    /// Apply a reverse geocoding outcome. Returns false if stale.
    pub fn complete_reverse(
        &mut self,
        side: Side,
        ticket: &ReverseTicket,
        outcome: Result<Option<Place>, GeocodeError>,
    ) -> bool {
        self.endpoint_mut(side).complete_reverse(ticket, outcome)
    }
}

impl Default for CoordinateReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_QUERY_LEN)
    }
}
