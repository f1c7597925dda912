//! Geocoding back ends for reparto.
//!
//! [`HttpGeoResolver`] implements [`reparto_core::GeoResolver`] against a
//! Nominatim-compatible search endpoint and picks the first ranked
//! candidate. [`CachingResolver`] wraps any resolver and memoises settled
//! answers so repeated lookups of the same line stay local.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use reparto_core::{Address, GeoResolver};
//! use reparto_geocode::{CachingResolver, HttpGeoResolver, HttpGeoResolverConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpGeoResolverConfig::default()
//!     .with_timeout(Duration::from_secs(5))
//!     .with_user_agent("my-dispatch-tool/1.0");
//! let resolver = CachingResolver::new(HttpGeoResolver::with_config(config)?);
//!
//! let point = resolver.resolve(&Address::new("Av. Corrientes 1234, CABA")).await?;
//! println!("{point:?}");
//! # Ok(())
//! # }
//! ```

mod cache;
mod nominatim;
mod provider;

pub use cache::CachingResolver;
pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpGeoResolver, HttpGeoResolverConfig,
    ProviderBuildError,
};
