//! Error types emitted by the Reparto CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use reparto_geocode::ProviderBuildError;
use reparto_session::{CoordinatorBuildError, PlanError};
use thiserror::Error;

/// Errors emitted by the Reparto CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// `check` was given no address field at all.
    #[error("nothing to check (set --start, --end or --stops-file)")]
    NothingToCheck,
    /// Opening the stops file failed.
    #[error("failed to open stops file at {path:?}: {source}")]
    OpenStopsFile {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading the stops file failed, including invalid UTF-8.
    #[error("failed to read stops file at {path:?}: {source}")]
    ReadStopsFile {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Constructing the geocoder failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Starting the async runtime failed.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The planner could not produce a route.
    #[error("failed to plan route: {0}")]
    Plan(#[from] PlanError),
    /// The validation coordinator could not start.
    #[error(transparent)]
    Coordinator(#[from] CoordinatorBuildError),
    /// Some addresses did not resolve during `check`.
    #[error("{count} address(es) did not resolve")]
    UnresolvedAddresses { count: usize },
    /// Serializing the JSON report failed.
    #[error("failed to serialize report: {0}")]
    SerializeReport(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
