//! Reverse geocoding state for one endpoint.
//!
//! Like the search engine this is sans-IO: [`ReverseGeocoder::begin`]
//! returns a ticket, the caller performs the lookup, and
//! [`ReverseGeocoder::complete`] applies the outcome only if no newer
//! lookup has started since.

use tracing::debug;

use crate::domain::{Coordinate, Place};
use crate::geocode::GeocodeError;

/// An outstanding reverse lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseTicket {
    seq: u64,
    coordinate: Coordinate,
}

impl ReverseTicket {
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Address, loading flag and error for one endpoint.
#[derive(Debug, Clone, Default)]
pub struct ReverseGeocoder {
    seq: u64,
    /// Resolved address and the coordinate it was resolved for.
    resolved: Option<(Coordinate, String)>,
    loading: bool,
    error: Option<String>,
}

impl ReverseGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start resolving `coordinate`, superseding any outstanding lookup.
    ///
    /// The previous address and error are cleared immediately.
    pub fn begin(&mut self, coordinate: Coordinate) -> ReverseTicket {
        self.seq += 1;
        self.resolved = None;
        self.error = None;
        self.loading = true;
        ReverseTicket {
            seq: self.seq,
            coordinate,
        }
    }

    /// Apply a lookup outcome. Returns false if the ticket is stale.
    ///
    /// The address is built from the best match's fragments. No match, or a
    /// match with no usable fragments, leaves the address empty.
    pub fn complete(
        &mut self,
        ticket: &ReverseTicket,
        outcome: Result<Option<Place>, GeocodeError>,
    ) -> bool {
        if ticket.seq != self.seq {
            debug!(
                ticket = ticket.seq,
                current = self.seq,
                "discarding stale reverse geocode"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(place) => {
                self.resolved = place
                    .and_then(|p| p.address())
                    .map(|address| (ticket.coordinate, address));
            }
            Err(e) => {
                self.resolved = None;
                self.error = Some(e.to_string());
            }
        }

        true
    }

    /// Forget the address. Loading and error are untouched.
    pub fn clear(&mut self) {
        self.resolved = None;
    }

    /// Invalidate any outstanding lookup and forget the address.
    pub fn discard_pending(&mut self) {
        self.seq += 1;
        self.loading = false;
        self.resolved = None;
    }

    /// Swap resolved addresses with `other`, invalidating both sides'
    /// outstanding lookups.
    pub fn exchange_address(&mut self, other: &mut ReverseGeocoder) {
        std::mem::swap(&mut self.resolved, &mut other.resolved);
        for geocoder in [self, other] {
            geocoder.seq += 1;
            geocoder.loading = false;
        }
    }

    /// The most recently resolved address.
    pub fn address(&self) -> Option<&str> {
        self.resolved.as_ref().map(|(_, address)| address.as_str())
    }

    /// The address, but only if it was resolved for `coordinate`.
    pub fn address_for(&self, coordinate: Coordinate) -> Option<&str> {
        self.resolved
            .as_ref()
            .filter(|(resolved_at, _)| *resolved_at == coordinate)
            .map(|(_, address)| address.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
