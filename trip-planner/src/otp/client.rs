//! OTP GraphQL HTTP client.

use tracing::{debug, info};

use crate::domain::Itinerary;

use super::TripPlanner;
use super::convert::convert_connection;
use super::error::PlanError;
use super::query::PLAN_CONNECTION_QUERY;
use super::request::PlanRequest;
use super::types::{GraphQlRequest, GraphQlResponse, PlanData};

/// Default GTFS GraphQL endpoint of a local OTP instance.
const DEFAULT_ENDPOINT: &str = "http://localhost:8080/otp/gtfs/v1";

/// Configuration for the OTP client.
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OtpConfig {
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

impl Default for OtpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// OpenTripPlanner client.
#[derive(Debug, Clone)]
pub struct OtpClient {
    http: reqwest::Client,
    endpoint: String,
}

impl OtpClient {
    pub fn new(config: OtpConfig) -> Result<Self, PlanError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("trip-planner/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    /// Ask the planner for itineraries, best first.
    pub async fn plan_connection(
        &self,
        request: &PlanRequest,
    ) -> Result<Vec<Itinerary>, PlanError> {
        info!(
            from = %request.origin.coordinate,
            to = %request.destination.coordinate,
            departure = %request.earliest_departure,
            "planning trip"
        );

        let body = GraphQlRequest {
            query: PLAN_CONNECTION_QUERY,
            variables: request.to_variables(),
        };
        let response = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlanError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let itineraries = parse_plan_response(&body)?;
        debug!(count = itineraries.len(), "plan received");
        Ok(itineraries)
    }
}

/// Decode a GraphQL `planConnection` response body.
pub fn parse_plan_response(body: &str) -> Result<Vec<Itinerary>, PlanError> {
    let response: GraphQlResponse<PlanData> =
        serde_json::from_str(body).map_err(|e| PlanError::Json {
            message: e.to_string(),
        })?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(PlanError::GraphQl(messages.join("; ")));
    }

    let connection = response
        .data
        .ok_or(PlanError::MissingData)?
        .plan_connection
        .unwrap_or_default();

    Ok(convert_connection(connection))
}

impl TripPlanner for OtpClient {
    async fn plan(&self, request: &PlanRequest) -> Result<Vec<Itinerary>, PlanError> {
        self.plan_connection(request).await
    }
}
