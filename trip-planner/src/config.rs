//! Planner and service configuration.

use std::time::Duration;

use chrono::FixedOffset;

use crate::domain::AlertFilter;
use crate::geocode::PhotonConfig;
use crate::incident::IncidentConfig;
use crate::otp::{MAX_ITINERARIES, OtpConfig};
use crate::search::DEFAULT_MIN_QUERY_LEN;
use crate::timeline::TimelineTheme;

/// When a dragged marker's coordinate is turned back into an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverseGeocodePolicy {
    /// Only while the detail view is open.
    #[default]
    DetailOnly,
    /// After every drag.
    Always,
    /// Never; dragged endpoints show their coordinates.
    Never,
}

impl ReverseGeocodePolicy {
    pub fn should_resolve(self, detail_open: bool) -> bool {
        match self {
            ReverseGeocodePolicy::DetailOnly => detail_open,
            ReverseGeocodePolicy::Always => true,
            ReverseGeocodePolicy::Never => false,
        }
    }
}

/// Behaviour of the trip planner core.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Quiet period after the last keystroke before a place search is sent.
    pub search_debounce: Duration,

    /// Minimum trimmed query length that reaches the geocoder.
    /// Shorter input can still yield a raw coordinate suggestion.
    pub min_query_len: usize,

    /// Suggestions shown in a dropdown.
    pub visible_suggestions: usize,

    /// Itineraries requested and kept.
    pub max_itineraries: usize,

    /// Reverse geocoding after marker drags.
    pub reverse_geocode: ReverseGeocodePolicy,

    /// Offset used to format the earliest departure.
    /// `None` means the system's local time zone.
    pub utc_offset: Option<FixedOffset>,

    /// Timeline and map colors.
    pub theme: TimelineTheme,

    /// Alerts hidden from every view.
    pub alert_filter: AlertFilter,
}

impl PlannerConfig {
    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    pub fn with_min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = len;
        self
    }

    pub fn with_visible_suggestions(mut self, count: usize) -> Self {
        self.visible_suggestions = count;
        self
    }

    pub fn with_max_itineraries(mut self, count: usize) -> Self {
        self.max_itineraries = count;
        self
    }

    pub fn with_reverse_geocode(mut self, policy: ReverseGeocodePolicy) -> Self {
        self.reverse_geocode = policy;
        self
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = Some(offset);
        self
    }

    pub fn with_theme(mut self, theme: TimelineTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_alert_filter(mut self, filter: AlertFilter) -> Self {
        self.alert_filter = filter;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(300),
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            visible_suggestions: 6,
            max_itineraries: MAX_ITINERARIES,
            reverse_geocode: ReverseGeocodePolicy::default(),
            utc_offset: None,
            theme: TimelineTheme::default(),
            alert_filter: AlertFilter::default(),
        }
    }
}

/// Endpoints of the external collaborators.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub photon: PhotonConfig,
    pub otp: OtpConfig,
    pub incident: IncidentConfig,
}

impl ServiceConfig {
    /// Read `OTP_URL`, `PHOTON_URL`, `PLANNER_LANG` and `INCIDENT_URL`,
    /// keeping defaults for unset or empty variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = var("OTP_URL") {
            config.otp = config.otp.with_endpoint(url);
        }
        if let Some(url) = var("PHOTON_URL") {
            config.photon = config.photon.with_base_url(url);
        }
        if let Some(lang) = var("PLANNER_LANG") {
            config.photon = config.photon.with_lang(lang);
        }
        if let Some(url) = var("INCIDENT_URL") {
            config.incident = config.incident.with_endpoint(url);
        }

        config
    }
}
