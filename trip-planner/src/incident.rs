//! Incident reporting.
//!
//! A fire-and-forget submission of a vehicle number and an incident kind.
//! Only success or failure matters to the caller.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

/// Default reporting endpoint.
const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:2137/api/report";

/// What is being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentKind {
    Accident,
    Fire,
    AggressivePerson,
    TooCold,
    TooHot,
    BrokenTicketMachine,
}

impl IncidentKind {
    pub const ALL: [IncidentKind; 6] = [
        IncidentKind::Accident,
        IncidentKind::Fire,
        IncidentKind::AggressivePerson,
        IncidentKind::TooCold,
        IncidentKind::TooHot,
        IncidentKind::BrokenTicketMachine,
    ];

    /// Numeric code sent to the endpoint.
    pub fn code(self) -> u8 {
        match self {
            IncidentKind::Accident => 1,
            IncidentKind::Fire => 2,
            IncidentKind::AggressivePerson => 3,
            IncidentKind::TooCold => 4,
            IncidentKind::TooHot => 5,
            IncidentKind::BrokenTicketMachine => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IncidentKind::Accident => "accident",
            IncidentKind::Fire => "fire",
            IncidentKind::AggressivePerson => "aggressive-person",
            IncidentKind::TooCold => "too-cold",
            IncidentKind::TooHot => "too-hot",
            IncidentKind::BrokenTicketMachine => "broken-ticket-machine",
        }
    }

    /// Parse a numeric code or a name such as `"too-hot"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code);
        }
        let normalized = s.to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|k| k.as_str() == normalized)
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from submitting a report.
#[derive(Debug, thiserror::Error)]
pub enum IncidentError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with an error status
    #[error("server returned status {status}")]
    Status { status: u16 },

    /// The report was rejected before sending
    #[error("invalid report: {0}")]
    Invalid(&'static str),
}

/// Wire body of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentReport {
    #[serde(rename = "numer-pojazdu")]
    pub vehicle: String,
    #[serde(rename = "typ-alertu")]
    pub kind: u8,
}

impl IncidentReport {
    /// Validate and build a report. The vehicle number is trimmed and must
    /// not be blank.
    pub fn new(vehicle: &str, kind: IncidentKind) -> Result<Self, IncidentError> {
        let vehicle = vehicle.trim();
        if vehicle.is_empty() {
            return Err(IncidentError::Invalid("vehicle number is required"));
        }
        Ok(Self {
            vehicle: vehicle.to_string(),
            kind: kind.code(),
        })
    }
}

/// Configuration for the incident client.
#[derive(Debug, Clone)]
pub struct IncidentConfig {
    /// Reporting endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl IncidentConfig {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom endpoint.
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for IncidentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Destination for incident reports.
pub trait IncidentReporter: Send + Sync + 'static {
    fn report(
        &self,
        report: &IncidentReport,
    ) -> impl Future<Output = Result<(), IncidentError>> + Send;
}

/// HTTP incident client.
#[derive(Debug, Clone)]
pub struct IncidentClient {
    http: reqwest::Client,
    endpoint: String,
}

impl IncidentClient {
    pub fn new(config: IncidentConfig) -> Result<Self, IncidentError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("trip-planner/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    /// Validate and send a report.
    pub async fn submit(&self, vehicle: &str, kind: IncidentKind) -> Result<(), IncidentError> {
        let report = IncidentReport::new(vehicle, kind)?;
        self.report(&report).await
    }
}

impl IncidentReporter for IncidentClient {
    async fn report(&self, report: &IncidentReport) -> Result<(), IncidentError> {
        let response = self.http.post(&self.endpoint).json(report).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "incident report rejected");
            return Err(IncidentError::Status {
                status: status.as_u16(),
            });
        }

        info!(vehicle = %report.vehicle, kind = report.kind, "incident reported");
        Ok(())
    }
}
