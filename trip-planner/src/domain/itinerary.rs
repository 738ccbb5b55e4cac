//! Itinerary type.
//!
//! An `Itinerary` is one complete candidate trip returned by the planner:
//! an ordered, non-empty list of legs.

use chrono::{DateTime, Duration, Utc};

use super::{AlertFilter, DomainError, Leg};

/// A complete trip from origin to destination.
///
/// # Invariants
///
/// - At least one leg
/// - Legs are time-ordered (each starts no earlier than the previous one)
/// - No leg ends before it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    legs: Vec<Leg>,
    duration: Duration,
}

impl Itinerary {
    /// Construct an itinerary, validating the leg invariants.
    ///
    /// `duration` is the planner-reported total; when absent it is the span
    /// from the first departure to the last arrival.
    pub fn new(legs: Vec<Leg>, duration: Option<Duration>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for (i, leg) in legs.iter().enumerate() {
            if leg.end_time < leg.start_time {
                return Err(DomainError::NegativeLeg(i));
            }
        }

        for (i, window) in legs.windows(2).enumerate() {
            if window[1].start_time < window[0].start_time {
                return Err(DomainError::UnorderedLegs(i + 1));
            }
        }

        let duration = duration.unwrap_or_else(|| {
            let first = &legs[0];
            let last = &legs[legs.len() - 1];
            last.end_time.signed_duration_since(first.start_time)
        });

        Ok(Self { legs, duration })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the first leg (guaranteed present).
    pub fn first_leg(&self) -> &Leg {
        &self.legs[0]
    }

    /// Returns the last leg (guaranteed present).
    pub fn last_leg(&self) -> &Leg {
        &self.legs[self.legs.len() - 1]
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.first_leg().start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.last_leg().end_time
    }

    /// Number of legs that are not green.
    pub fn transit_leg_count(&self) -> usize {
        self.legs.iter().filter(|l| l.is_transit()).count()
    }

    /// Transfers between transit vehicles.
    pub fn transfer_count(&self) -> usize {
        self.transit_leg_count().saturating_sub(1)
    }

    /// Returns true if any leg carries an alert that passes the filter.
    pub fn has_visible_alerts(&self, filter: &AlertFilter) -> bool {
        self.legs
            .iter()
            .any(|leg| leg.alerts.iter().any(|a| filter.should_display(a)))
    }
}
