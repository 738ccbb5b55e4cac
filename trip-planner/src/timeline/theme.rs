//! Colors used when rendering legs.

use crate::domain::{HexColor, Leg};

/// Background and text color of a route badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeColors {
    pub background: HexColor,
    pub text: HexColor,
}

/// Fallback and fixed colors for the timeline and the map overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineTheme {
    /// Badge background for routes without a usable color.
    pub route_fallback: HexColor,

    /// Badge text for routes without a usable text color.
    pub route_text_fallback: HexColor,

    /// Timeline segment color of non-transit legs.
    pub neutral: HexColor,

    /// Connector color where no segment is adjacent.
    pub connector_default: HexColor,

    /// Map color of green-mode legs.
    pub green_accent: HexColor,
}

impl TimelineTheme {
    pub fn with_route_fallback(mut self, color: HexColor) -> Self {
        self.route_fallback = color;
        self
    }

    pub fn with_route_text_fallback(mut self, color: HexColor) -> Self {
        self.route_text_fallback = color;
        self
    }

    pub fn with_neutral(mut self, color: HexColor) -> Self {
        self.neutral = color;
        self
    }

    pub fn with_green_accent(mut self, color: HexColor) -> Self {
        self.green_accent = color;
        self
    }

    /// Route badge colors for a leg.
    pub fn badge_colors(&self, leg: &Leg) -> BadgeColors {
        BadgeColors {
            background: leg
                .route_color()
                .cloned()
                .unwrap_or_else(|| self.route_fallback.clone()),
            text: leg
                .route_text_color()
                .cloned()
                .unwrap_or_else(|| self.route_text_fallback.clone()),
        }
    }

    /// Timeline color of a leg: the route color for transit, neutral otherwise.
    pub fn segment_color(&self, leg: &Leg) -> HexColor {
        if leg.is_transit() {
            self.badge_colors(leg).background
        } else {
            self.neutral.clone()
        }
    }

    /// Map overlay color of a leg: the green accent for green modes.
    pub fn map_color(&self, leg: &Leg) -> HexColor {
        if leg.is_green() {
            self.green_accent.clone()
        } else {
            self.segment_color(leg)
        }
    }
}

impl Default for TimelineTheme {
    fn default() -> Self {
        Self {
            route_fallback: HexColor::from_static("#1976d2"),
            route_text_fallback: HexColor::from_static("#ffffff"),
            neutral: HexColor::from_static("#bdbdbd"),
            connector_default: HexColor::from_static("#e0e0e0"),
            green_accent: HexColor::from_static("#08CB00"),
        }
    }
}
