//! Address-to-coordinate lookup seam.
//!
//! A [`GeoResolver`] turns one [`Address`] into the best-ranked
//! [`GeoPoint`] an external service knows for it. Implementations must
//! reject blank addresses with [`ResolveError::MalformedInput`] without
//! touching the network.

use async_trait::async_trait;
use thiserror::Error;

use crate::{Address, GeoPoint};

/// Errors from [`GeoResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The address was empty or whitespace-only.
    #[error("address is empty")]
    MalformedInput,
    /// The service returned no candidates.
    #[error("no match for {query:?}")]
    NotFound { query: String },
    /// The request exceeded the configured timeout.
    #[error("geocoding request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },
    /// The service answered with a non-success HTTP status.
    #[error("geocoding request to {url} failed with status {status}: {message}")]
    HttpError {
        url: String,
        status: u16,
        message: String,
    },
    /// The request never produced a response.
    #[error("geocoding request to {url} failed: {message}")]
    NetworkError { url: String, message: String },
    /// The response body could not be interpreted.
    #[error("failed to parse geocoding response: {message}")]
    ParseError { message: String },
}

/// Coarse classification of [`ResolveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveErrorKind {
    /// Blank input; never reaches the network.
    MalformedInput,
    /// Zero candidates.
    NotFound,
    /// Network or service failure; a later edit may succeed.
    Transient,
}

impl ResolveError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ResolveErrorKind {
        match self {
            Self::MalformedInput => ResolveErrorKind::MalformedInput,
            Self::NotFound { .. } => ResolveErrorKind::NotFound,
            Self::Timeout { .. }
            | Self::HttpError { .. }
            | Self::NetworkError { .. }
            | Self::ParseError { .. } => ResolveErrorKind::Transient,
        }
    }

    /// Whether the failure came from the network or the service.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.kind(), ResolveErrorKind::Transient)
    }
}

/// Resolve free-text addresses to coordinates.
///
/// Implementations pick the first candidate of the service's ranked list.
/// Resolution has no side effects besides the outbound request, so calling
/// it twice with the same text yields the same point while the service data
/// is unchanged.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use reparto_core::{Address, GeoPoint, GeoResolver, ResolveError};
///
/// struct Everywhere;
///
/// #[async_trait]
/// impl GeoResolver for Everywhere {
///     async fn resolve(&self, address: &Address) -> Result<GeoPoint, ResolveError> {
///         if address.is_blank() {
///             return Err(ResolveError::MalformedInput);
///         }
///         Ok(GeoPoint::new(0.0, 0.0))
///     }
/// }
/// ```
#[async_trait]
pub trait GeoResolver: Send + Sync {
    /// Return the best-ranked coordinate for `address`.
    ///
    /// Implementations must return `Err(ResolveError::MalformedInput)` for
    /// blank addresses without issuing a request.
    async fn resolve(&self, address: &Address) -> Result<GeoPoint, ResolveError>;
}

#[async_trait]
impl<R> GeoResolver for std::sync::Arc<R>
where
    R: GeoResolver + ?Sized,
{
    async fn resolve(&self, address: &Address) -> Result<GeoPoint, ResolveError> {
        (**self).resolve(address).await
    }
}

/// An address paired with the coordinate it resolved to.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedAddress {
    /// The address as entered.
    pub address: Address,
    /// Where the geocoder placed it.
    pub location: GeoPoint,
}

impl ResolvedAddress {
    /// Pair an address with its coordinate.
    #[must_use]
    pub const fn new(address: Address, location: GeoPoint) -> Self {
        Self { address, location }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ResolveError::MalformedInput, ResolveErrorKind::MalformedInput)]
    #[case(ResolveError::NotFound { query: "x".into() }, ResolveErrorKind::NotFound)]
    #[case(
        ResolveError::Timeout { url: "http://geo".into(), timeout_secs: 10 },
        ResolveErrorKind::Transient
    )]
    #[case(
        ResolveError::HttpError { url: "http://geo".into(), status: 503, message: "busy".into() },
        ResolveErrorKind::Transient
    )]
    #[case(
        ResolveError::NetworkError { url: "http://geo".into(), message: "refused".into() },
        ResolveErrorKind::Transient
    )]
    #[case(ResolveError::ParseError { message: "eof".into() }, ResolveErrorKind::Transient)]
    fn errors_classify_into_taxonomy(#[case] error: ResolveError, #[case] kind: ResolveErrorKind) {
        assert_eq!(error.kind(), kind);
        assert_eq!(error.is_transient(), kind == ResolveErrorKind::Transient);
    }
}
