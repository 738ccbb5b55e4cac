//! Place search state for one input field.
//!
//! The engine does no I/O. [`PlaceSearchEngine::begin`] updates the state
//! for a new query and, when a provider request is warranted, returns a
//! [`SearchTicket`] for the caller to execute. The outcome is handed back
//! through [`PlaceSearchEngine::complete`], which ignores tickets that have
//! been superseded by a later `begin` or `clear`.

use tracing::debug;

use crate::domain::Place;
use crate::geocode::GeocodeError;

use super::parse_coordinate_input;

/// Default minimum trimmed query length that triggers a provider request.
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// A provider request issued by [`PlaceSearchEngine::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    /// The text to send to the provider.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Suggestions, loading flag and error for one search field.
#[derive(Debug, Clone)]
pub struct PlaceSearchEngine {
    min_query_len: usize,
    seq: u64,
    coordinate_suggestion: Option<Place>,
    results: Vec<Place>,
    loading: bool,
    error: Option<String>,
}

impl PlaceSearchEngine {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            min_query_len,
            seq: 0,
            coordinate_suggestion: None,
            results: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Start a search for `query`, superseding any outstanding one.
    ///
    /// A coordinate typed as text becomes a suggestion immediately,
    /// whatever the query length. Returns a ticket only if the trimmed
    /// query is long enough to be worth sending to the provider.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        self.seq += 1;
        self.error = None;
        self.coordinate_suggestion = parse_coordinate_input(query).map(Place::from_coordinate);
        self.results = self.coordinate_suggestion.iter().cloned().collect();

        let trimmed = query.trim();
        if trimmed.chars().count() < self.min_query_len {
            self.loading = false;
            return None;
        }

        self.loading = true;
        Some(SearchTicket {
            seq: self.seq,
            query: trimmed.to_string(),
        })
    }

    /// Apply a provider outcome. Returns false if the ticket is stale.
    ///
    /// Provider results follow the coordinate suggestion, if any. On error
    /// only the coordinate suggestion remains.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<Place>, GeocodeError>,
    ) -> bool {
        if ticket.seq != self.seq {
            debug!(
                ticket = ticket.seq,
                current = self.seq,
                "discarding stale search results"
            );
            return false;
        }

        self.loading = false;
        self.results = self.coordinate_suggestion.iter().cloned().collect();

        match outcome {
            Ok(places) => self.results.extend(places),
            Err(e) => self.error = Some(e.to_string()),
        }

        true
    }

    /// Empty results and error, and drop any outstanding request.
    pub fn clear(&mut self) {
        self.seq += 1;
        self.coordinate_suggestion = None;
        self.results.clear();
        self.loading = false;
        self.error = None;
    }

    /// All current suggestions.
    pub fn results(&self) -> &[Place] {
        &self.results
    }

    /// At most `limit` suggestions, for display.
    pub fn visible(&self, limit: usize) -> &[Place] {
        &self.results[..self.results.len().min(limit)]
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for PlaceSearchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_QUERY_LEN)
    }
}
