//! Nominatim search API response types.
//!
//! The search endpoint answers `format=json` queries with a JSON array of
//! candidates ordered by relevance. Coordinates arrive as decimal strings.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use serde::Deserialize;

/// One ranked candidate from a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchCandidate {
    /// Latitude as a decimal string.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Full human-readable label of the match.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Nominatim's internal place identifier.
    #[serde(default)]
    pub place_id: Option<u64>,
}

/// A search response: candidates, best first. Empty means no match.
pub type SearchResponse = Vec<SearchCandidate>;
