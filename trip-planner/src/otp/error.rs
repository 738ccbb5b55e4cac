//! Trip-planning client error types.

/// Errors from the OTP GraphQL client.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The GraphQL response carried errors
    #[error("planner error: {0}")]
    GraphQl(String),

    /// The response had neither data nor errors
    #[error("planner returned no data")]
    MissingData,
}
