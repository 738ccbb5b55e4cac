//! Photon HTTP client.
//!
//! Provides async forward search and reverse lookup against a Photon
//! instance and converts the GeoJSON answers into [`Place`]s.

use tracing::debug;

use crate::domain::{Coordinate, Place};

use super::convert::convert_features;
use super::error::GeocodeError;
use super::types::FeatureCollection;
use super::{PlaceProvider, ReverseProvider};

/// Default base URL for the public Photon instance.
const DEFAULT_BASE_URL: &str = "https://photon.komoot.io";

/// Configuration for the Photon client.
#[derive(Debug, Clone)]
pub struct PhotonConfig {
    /// Base URL for the API (defaults to the public instance)
    pub base_url: String,
    /// Language hint for result names
    pub lang: String,
    /// Maximum results per forward search
    pub limit: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PhotonConfig {
    /// Create a config pointing at the public instance.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: "en".to_string(),
            limit: 5,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the language hint.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set the forward search result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for PhotonConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Photon geocoding client.
#[derive(Debug, Clone)]
pub struct PhotonClient {
    http: reqwest::Client,
    base_url: String,
    lang: String,
    limit: usize,
}

impl PhotonClient {
    /// Create a new client with the given configuration.
    pub fn new(config: PhotonConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("trip-planner/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            lang: config.lang,
            limit: config.limit,
        })
    }

    /// Search for places matching free text, best match first.
    pub async fn search_places(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let url = format!("{}/api/", self.base_url);
        let limit = self.limit.to_string();

        debug!(query, "photon search");
        let params = [
            ("q", query),
            ("limit", limit.as_str()),
            ("lang", self.lang.as_str()),
        ];
        let collection = self.fetch(&url, &params).await?;

        Ok(convert_features(collection))
    }

    /// Find the best-matching place at a coordinate.
    pub async fn reverse_place(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<Place>, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let lon = coordinate.lng.to_string();
        let lat = coordinate.lat.to_string();

        debug!(%coordinate, "photon reverse");
        let params = [
            ("lon", lon.as_str()),
            ("lat", lat.as_str()),
            ("lang", self.lang.as_str()),
        ];
        let collection = self.fetch(&url, &params).await?;

        Ok(convert_features(collection).into_iter().next())
    }

    async fn fetch(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<FeatureCollection, GeocodeError> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
            message: e.to_string(),
        })
    }
}

impl PlaceProvider for PhotonClient {
    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        self.search_places(query).await
    }
}

impl ReverseProvider for PhotonClient {
    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<Place>, GeocodeError> {
        self.reverse_place(coordinate).await
    }
}
