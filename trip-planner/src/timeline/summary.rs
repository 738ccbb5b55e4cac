//! Result-list cards and the itinerary-wide alert list.

use chrono::FixedOffset;

use crate::domain::{
    Alert, AlertFilter, AlertLevel, Itinerary, Mode, ModeIcon, format_duration, format_time_range,
};

use super::{BadgeColors, TimelineTheme};

/// One leg on a result card.
#[derive(Debug, Clone, PartialEq)]
pub struct LegBadge {
    pub mode: Mode,
    pub icon: ModeIcon,
    pub route_label: Option<String>,
    pub colors: BadgeColors,
    pub realtime: bool,
}

/// A compact description of one itinerary for the result list.
#[derive(Debug, Clone, PartialEq)]
pub struct ItinerarySummary {
    /// `"HH:MM - HH:MM"` in the display offset.
    pub time_range: String,
    pub duration_label: String,
    pub has_alerts: bool,
    pub badges: Vec<LegBadge>,
}

impl ItinerarySummary {
    pub fn new(
        itinerary: &Itinerary,
        theme: &TimelineTheme,
        alerts: &AlertFilter,
        offset: &FixedOffset,
    ) -> Self {
        let badges = itinerary
            .legs()
            .iter()
            .map(|leg| LegBadge {
                mode: leg.mode.clone(),
                icon: leg.mode.icon(),
                route_label: leg.route_label().map(str::to_string),
                colors: theme.badge_colors(leg),
                realtime: leg.realtime,
            })
            .collect();

        Self {
            time_range: format_time_range(itinerary.start_time(), itinerary.end_time(), offset),
            duration_label: format_duration(itinerary.duration()),
            has_alerts: itinerary.has_visible_alerts(alerts),
            badges,
        }
    }
}

/// An alert in the detail view's combined list.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryAlert {
    pub leg_index: usize,
    /// `"{from} → {to}"` of the leg.
    pub leg_label: String,
    pub level: AlertLevel,
    /// The alert header, or the leg label when the alert has none.
    pub header: String,
    pub description: Option<String>,
}

/// Every displayable alert of an itinerary, in leg order.
pub fn itinerary_alerts(itinerary: &Itinerary, filter: &AlertFilter) -> Vec<ItineraryAlert> {
    itinerary
        .legs()
        .iter()
        .enumerate()
        .flat_map(|(index, leg)| {
            let leg_label = leg.span_label();
            leg.alerts.iter().filter_map(move |alert| {
                let header = alert.header.clone().unwrap_or_else(|| leg_label.clone());
                let shown = Alert {
                    header: Some(header.clone()),
                    ..alert.clone()
                };
                filter.should_display(&shown).then(|| ItineraryAlert {
                    leg_index: index,
                    leg_label: leg_label.clone(),
                    level: alert.level(),
                    header,
                    description: alert.description.clone(),
                })
            })
        })
        .collect()
}

/// Header labels of the detail view.
///
/// Endpoint text wins; an empty field falls back to the first leg's origin
/// or the last leg's destination name.
pub fn detail_labels(itinerary: &Itinerary, from_text: &str, to_text: &str) -> (String, String) {
    let pick = |text: &str, fallback: Option<&String>| {
        if text.is_empty() {
            fallback.cloned().unwrap_or_default()
        } else {
            text.to_string()
        }
    };

    (
        pick(from_text, itinerary.first_leg().from.name.as_ref()),
        pick(to_text, itinerary.last_leg().to.name.as_ref()),
    )
}
