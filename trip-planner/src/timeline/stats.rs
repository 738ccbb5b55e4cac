//! Aggregate figures for one itinerary.

use chrono::Duration;

use crate::domain::{Leg, format_distance_compact, format_duration};

/// Walking totals and transit counts.
///
/// "Walking" covers every green-mode leg, so bike and scooter stretches are
/// included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineStats {
    /// Metres, summed over green legs. Unknown distances count as zero.
    pub walk_distance: f64,
    pub walk_duration: Duration,
    pub transit_legs: usize,
    pub transfers: usize,
}

impl Default for TimelineStats {
    fn default() -> Self {
        Self {
            walk_distance: 0.0,
            walk_duration: Duration::zero(),
            transit_legs: 0,
            transfers: 0,
        }
    }
}

impl TimelineStats {
    /// Fold one leg into the totals.
    pub fn add_leg(&mut self, leg: &Leg) {
        if leg.is_green() {
            self.walk_distance += leg.distance.unwrap_or(0.0);
            self.walk_duration += leg.duration();
        } else {
            self.transit_legs += 1;
        }
        self.transfers = self.transit_legs.saturating_sub(1);
    }

    pub fn from_legs<'a>(legs: impl IntoIterator<Item = &'a Leg>) -> Self {
        let mut stats = Self::default();
        for leg in legs {
            stats.add_leg(leg);
        }
        stats
    }

    /// `"1.2km"`, or `None` when nothing was walked.
    pub fn walk_distance_label(&self) -> Option<String> {
        (self.walk_distance > 0.0).then(|| format_distance_compact(self.walk_distance))
    }

    /// `"12min"`, or `None` when nothing was walked.
    pub fn walk_duration_label(&self) -> Option<String> {
        (self.walk_duration > Duration::zero()).then(|| format_duration(self.walk_duration))
    }
}
