//! Shared plumbing for subcommands that geocode addresses.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::File;
use reparto_core::GeoResolver;
use reparto_geocode::{
    CachingResolver, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpGeoResolver, HttpGeoResolverConfig,
};
use tokio::runtime::Runtime;

use crate::CliError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resolved geocoder options shared by `plan` and `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocoderSettings {
    /// Base URL of the Nominatim-compatible service.
    pub(crate) base_url: String,
    /// `User-Agent` header sent with each lookup.
    pub(crate) user_agent: String,
    /// Per-request timeout.
    pub(crate) timeout: Duration,
}

impl GeocoderSettings {
    pub(crate) fn from_options(
        base_url: Option<String>,
        user_agent: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

/// Builds the resolver a subcommand runs against.
pub(crate) trait ResolverBuilder {
    fn build(&self, settings: &GeocoderSettings) -> Result<Arc<dyn GeoResolver>, CliError>;
}

/// Nominatim over HTTP, memoised for the lifetime of the command.
#[derive(Debug, Default)]
pub(crate) struct DefaultResolverBuilder;

impl ResolverBuilder for DefaultResolverBuilder {
    fn build(&self, settings: &GeocoderSettings) -> Result<Arc<dyn GeoResolver>, CliError> {
        let config = HttpGeoResolverConfig::new(settings.base_url.clone())
            .with_timeout(settings.timeout)
            .with_user_agent(settings.user_agent.clone());
        let resolver =
            HttpGeoResolver::with_config(config).map_err(|source| CliError::BuildGeocoder {
                base_url: settings.base_url.clone(),
                source,
            })?;
        Ok(Arc::new(CachingResolver::new(resolver)))
    }
}

/// Read the stop list, one address per line.
pub(crate) fn read_stops_file(path: &Utf8Path) -> Result<String, CliError> {
    let mut file =
        File::open_ambient(path, ambient_authority()).map_err(|source| CliError::OpenStopsFile {
            path: path.to_path_buf(),
            source,
        })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| CliError::ReadStopsFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(contents)
}

pub(crate) fn build_runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}
