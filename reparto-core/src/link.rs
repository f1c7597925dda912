//! Turn-by-turn navigation links for a computed route.
//!
//! The link follows the Google Maps directions URL contract:
//! `<base>?api=1&travelmode=driving&origin=..&destination=..&waypoints=..&avoid=tolls`
//! with every address percent-encoded and waypoints joined by an encoded pipe.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::Route;

/// Directions endpoint used when no base URL is configured.
pub const DEFAULT_DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/";

/// Encoded `|` placed between waypoints.
pub const WAYPOINT_SEPARATOR: &str = "%7C";

/// Characters left untouched, matching `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A rendered navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NavigationLink(String);

impl NavigationLink {
    /// The URL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the link, returning the URL text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NavigationLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialises routes into navigation links.
///
/// # Examples
/// ```
/// use reparto_core::{Address, GeoPoint, LinkBuilder, ResolvedAddress, Route};
///
/// let stop = |text: &str| ResolvedAddress::new(Address::new(text), GeoPoint::new(0.0, 0.0));
/// let route = Route::assemble(stop("Av. Rivadavia 4000"), vec![stop("Peru 100")], stop("Calle Falsa 123"));
/// let link = LinkBuilder::default().build(&route);
///
/// assert_eq!(
///     link.as_str(),
///     "https://www.google.com/maps/dir/?api=1&travelmode=driving\
///      &origin=Av.%20Rivadavia%204000&destination=Calle%20Falsa%20123\
///      &waypoints=Peru%20100&avoid=tolls"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base_url: String,
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTIONS_BASE_URL)
    }
}

impl LinkBuilder {
    /// Use `base_url` as the directions endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// The configured directions endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Render `route` as a navigation request.
    ///
    /// Waypoints appear in route order, excluding start and end. The
    /// `waypoints` parameter is present, possibly empty, on every link.
    #[must_use]
    pub fn build(&self, route: &Route) -> NavigationLink {
        let origin = encode(route.start().address.normalized());
        let destination = encode(route.end().address.normalized());
        let waypoints = route
            .waypoints()
            .iter()
            .map(|point| encode(point.address.normalized()))
            .collect::<Vec<_>>()
            .join(WAYPOINT_SEPARATOR);
        NavigationLink(format!(
            "{}?api=1&travelmode=driving&origin={origin}&destination={destination}\
             &waypoints={waypoints}&avoid=tolls",
            self.base_url
        ))
    }
}

fn encode(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}
