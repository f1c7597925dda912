//! Test-only utilities for `reparto-sequencer`.
//!
//! The helpers in this module are available to unit tests and behavioural
//! tests. They are gated behind the `test-support` feature (and `cfg(test)`).

use reparto_core::{Address, GeoPoint, ResolvedAddress, SequenceRequest};

/// Construct a resolved stop at `(lat, lon)`.
///
/// # Examples
/// ```rust
/// use reparto_sequencer::test_support::stop;
///
/// let depot = stop("Depot", -34.6, -58.4);
/// assert_eq!(depot.address.normalized(), "Depot");
/// ```
#[must_use]
pub fn stop(text: &str, lat: f64, lon: f64) -> ResolvedAddress {
    ResolvedAddress::new(Address::new(text), GeoPoint::new(lat, lon))
}

/// Build a request with stops listed in input order.
#[must_use]
pub fn request(
    start: ResolvedAddress,
    end: ResolvedAddress,
    intermediates: Vec<ResolvedAddress>,
) -> SequenceRequest {
    SequenceRequest {
        start,
        end,
        intermediates,
    }
}

/// Normalized addresses of a route in visiting order.
#[must_use]
pub fn visit_order(route: &reparto_core::Route) -> Vec<String> {
    route
        .points()
        .iter()
        .map(|point| point.address.normalized().to_owned())
        .collect()
}
