//! HTTP-based `GeoResolver` using Nominatim's search API.
//!
//! [`HttpGeoResolver`] issues one `GET {base}/search?format=json&q=...`
//! request per lookup and returns the first candidate of the ranked list.
//! Blank addresses are rejected before a request is built.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reparto_core::{Address, GeoPoint, GeoResolver, ResolveError};
use reqwest::Client;
use url::Url;

use crate::nominatim::SearchResponse;

/// Error type for [`HttpGeoResolver`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// The configured base URL does not parse.
    InvalidBaseUrl(url::ParseError),
    /// The configured base URL cannot carry a path (e.g. `mailto:`).
    UnsupportedBaseUrl(String),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::InvalidBaseUrl(err) => write!(f, "invalid geocoder base URL: {err}"),
            Self::UnsupportedBaseUrl(url) => {
                write!(f, "geocoder base URL cannot carry a path: {url}")
            }
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::InvalidBaseUrl(err) => Some(err),
            Self::UnsupportedBaseUrl(_) => None,
        }
    }
}

/// Public Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent for geocoding requests.
///
/// Nominatim's usage policy rejects requests without an identifying agent.
pub const DEFAULT_USER_AGENT: &str = "reparto-geocode/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Only the top candidate is used.
const DEFAULT_CANDIDATE_LIMIT: u8 = 1;

/// Configuration for [`HttpGeoResolver`].
#[derive(Debug, Clone)]
pub struct HttpGeoResolverConfig {
    /// Base URL of the search service (e.g. `"https://nominatim.openstreetmap.org"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Number of candidates requested per query.
    pub candidate_limit: u8,
}

impl Default for HttpGeoResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }
}

impl HttpGeoResolverConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set how many candidates the service should return. Zero is raised to one.
    #[must_use]
    pub fn with_candidate_limit(mut self, limit: u8) -> Self {
        self.candidate_limit = limit.max(1);
        self
    }
}

/// HTTP geocoder backed by a Nominatim-compatible search endpoint.
///
/// The client is built once and shared by every lookup; clones of the
/// resolver share its connection pool.
#[derive(Debug, Clone)]
pub struct HttpGeoResolver {
    client: Client,
    config: HttpGeoResolverConfig,
    base_url: Url,
}

impl HttpGeoResolver {
    /// Create a resolver for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpGeoResolverConfig::new(base_url))
    }

    /// Create a resolver with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpGeoResolverConfig) -> Result<Self, ProviderBuildError> {
        let base_url = Url::parse(&config.base_url).map_err(ProviderBuildError::InvalidBaseUrl)?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderBuildError::UnsupportedBaseUrl(config.base_url));
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpGeoResolverConfig {
        &self.config
    }

    /// Build the search URL for `query`.
    ///
    /// The path gains a trailing `search` segment and the query string
    /// carries `format=json`, `limit` and the URL-encoded text.
    fn build_search_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("search");
        }
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", &self.config.candidate_limit.to_string())
            .append_pair("q", query);
        url
    }

    async fn fetch_candidates(&self, url: &Url) -> Result<SearchResponse, ResolveError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        response
            .json()
            .await
            .map_err(|err| ResolveError::ParseError {
                message: err.to_string(),
            })
    }

    /// Convert a reqwest error to a `ResolveError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> ResolveError {
        if error.is_timeout() {
            return ResolveError::Timeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ResolveError::HttpError {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        ResolveError::NetworkError {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Pick the first candidate of `response` for `query`.
fn convert_response(query: &str, response: SearchResponse) -> Result<GeoPoint, ResolveError> {
    let candidate = response
        .into_iter()
        .next()
        .ok_or_else(|| ResolveError::NotFound {
            query: query.to_owned(),
        })?;
    GeoPoint::parse(&candidate.lat, &candidate.lon).map_err(|err| ResolveError::ParseError {
        message: err.to_string(),
    })
}

#[async_trait]
impl GeoResolver for HttpGeoResolver {
    async fn resolve(&self, address: &Address) -> Result<GeoPoint, ResolveError> {
        if address.is_blank() {
            return Err(ResolveError::MalformedInput);
        }

        let query = address.normalized();
        let url = self.build_search_url(query);
        let outcome = match self.fetch_candidates(&url).await {
            Ok(candidates) => convert_response(query, candidates),
            Err(err) => Err(err),
        };
        if let Err(err) = &outcome {
            debug!("geocoding {query:?} failed: {err}");
        }
        outcome
    }
}
