//! State of one trip endpoint.

use std::fmt;

use tracing::debug;

use crate::domain::{Coordinate, Place};
use crate::geocode::GeocodeError;
use crate::reverse::{ReverseGeocoder, ReverseTicket};
use crate::search::{PlaceSearchEngine, SearchTicket};

use super::display_text;

/// Which end of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    From,
    To,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::From => Side::To,
            Side::To => Side::From,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::From => "from",
            Side::To => "to",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The interaction that produced an endpoint's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSource {
    /// Nothing entered.
    #[default]
    None,
    /// Free text without a resolved coordinate.
    TypedText,
    /// A geocoded suggestion was selected.
    Suggestion,
    /// A coordinate typed as text was selected.
    RawCoordinate,
    /// The map marker was dragged.
    MarkerDragged,
    /// Text replaced by the address resolved for the coordinate.
    ReverseGeocoded,
}

impl CoordinateSource {
    /// Whether a resolved address should replace the field's text.
    fn adopts_address(self) -> bool {
        matches!(
            self,
            CoordinateSource::MarkerDragged | CoordinateSource::RawCoordinate
        )
    }
}

/// Text, coordinate and source of one endpoint, plus its search and
/// reverse geocoding state.
///
/// # Invariants
///
/// - A coordinate is only present with a source other than
///   [`CoordinateSource::None`]
/// - Clearing the text clears the coordinate and the source
#[derive(Debug, Clone)]
pub struct Endpoint {
    text: String,
    coordinate: Option<Coordinate>,
    source: CoordinateSource,
    focused: bool,
    search: PlaceSearchEngine,
    reverse: ReverseGeocoder,
}

impl Endpoint {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            text: String::new(),
            coordinate: None,
            source: CoordinateSource::None,
            focused: false,
            search: PlaceSearchEngine::new(min_query_len),
            reverse: ReverseGeocoder::new(),
        }
    }

    /// The raw text buffer.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    pub fn source(&self) -> CoordinateSource {
        self.source
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn search(&self) -> &PlaceSearchEngine {
        &self.search
    }

    pub fn reverse(&self) -> &ReverseGeocoder {
        &self.reverse
    }

    /// The address resolved for the current coordinate, if any.
    pub fn address(&self) -> Option<&str> {
        self.coordinate.and_then(|c| self.reverse.address_for(c))
    }

    /// The text to show in the field.
    pub fn display_text(&self) -> String {
        display_text(
            self.focused,
            &self.text,
            self.address(),
            self.coordinate,
            self.source,
        )
    }

    /// Whether the suggestion dropdown has anything to show.
    pub fn shows_suggestions(&self) -> bool {
        self.focused
            && (self.search.is_loading()
                || !self.search.results().is_empty()
                || self.search.error().is_some())
    }

    pub(super) fn focus(&mut self) {
        if self.text.is_empty() {
            self.text = self.display_text();
        }
        self.focused = true;
    }

    /// Returns true if the field is left without a coordinate.
    pub(super) fn blur(&mut self) -> bool {
        self.focused = false;

        match self.coordinate {
            Some(_) => {
                self.adopt_address();
                false
            }
            None => {
                self.source = if self.text.trim().is_empty() {
                    CoordinateSource::None
                } else {
                    CoordinateSource::TypedText
                };
                true
            }
        }
    }

    pub(super) fn type_text(&mut self, text: &str) -> Option<SearchTicket> {
        self.text = text.to_string();
        self.coordinate = None;
        self.source = if text.is_empty() {
            CoordinateSource::None
        } else {
            CoordinateSource::TypedText
        };
        self.reverse.discard_pending();
        self.search.begin(text)
    }

    pub(super) fn select(&mut self, place: &Place) -> Option<ReverseTicket> {
        self.reverse.discard_pending();
        self.search.clear();

        self.text = place.display_name();
        self.coordinate = Some(place.coordinate);

        if place.is_coordinate {
            self.source = CoordinateSource::RawCoordinate;
            Some(self.reverse.begin(place.coordinate))
        } else {
            self.source = CoordinateSource::Suggestion;
            None
        }
    }

    pub(super) fn drag(&mut self, coordinate: Coordinate, resolve: bool) -> Option<ReverseTicket> {
        self.search.clear();
        self.reverse.discard_pending();

        self.text.clear();
        self.coordinate = Some(coordinate);
        self.source = CoordinateSource::MarkerDragged;

        resolve.then(|| self.reverse.begin(coordinate))
    }

    pub(super) fn clear(&mut self) {
        self.text.clear();
        self.coordinate = None;
        self.source = CoordinateSource::None;
        self.search.clear();
        self.reverse.discard_pending();
    }

    /// Look up the address of the current coordinate again.
    pub(super) fn resolve(&mut self) -> Option<ReverseTicket> {
        self.coordinate.map(|c| self.reverse.begin(c))
    }

    /// Exchange text, coordinate, source and resolved address.
    ///
    /// Outstanding lookups on both sides are invalidated.
    pub(super) fn exchange(&mut self, other: &mut Endpoint) {
        std::mem::swap(&mut self.text, &mut other.text);
        std::mem::swap(&mut self.coordinate, &mut other.coordinate);
        std::mem::swap(&mut self.source, &mut other.source);
        self.reverse.exchange_address(&mut other.reverse);
        self.search.clear();
        other.search.clear();
    }

    pub(super) fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<Place>, GeocodeError>,
    ) -> bool {
        self.search.complete(ticket, outcome)
    }

    pub(super) fn complete_reverse(
        &mut self,
        ticket: &ReverseTicket,
        outcome: Result<Option<Place>, GeocodeError>,
    ) -> bool {
        if self.coordinate != Some(ticket.coordinate()) {
            debug!("discarding reverse geocode for a moved endpoint");
            return false;
        }
        if !self.reverse.complete(ticket, outcome) {
            return false;
        }

        if !self.focused {
            self.adopt_address();
        }
        true
    }

    /// Replace the text with the resolved address.
    ///
    /// Marker and raw coordinate entries become reverse geocoded. Other
    /// sources keep their tag.
    fn adopt_address(&mut self) {
        let Some(address) = self.address().map(str::to_string) else {
            return;
        };

        if self.source.adopts_address() {
            self.source = CoordinateSource::ReverseGeocoded;
        }
        self.text = address;
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(crate::search::DEFAULT_MIN_QUERY_LEN)
    }
}
