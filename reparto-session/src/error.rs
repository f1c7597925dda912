//! Errors raised by the session layer.

use reparto_core::{Address, ResolveError, RouteRole};
use thiserror::Error;

/// A route endpoint that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFailure {
    /// `Start` or `End`.
    pub role: RouteRole,
    /// The text that was looked up.
    pub address: Address,
    /// Why the lookup failed.
    pub error: ResolveError,
}

impl std::fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?}: {}", self.role, self.address.normalized(), self.error)
    }
}

/// Errors from [`RoutePlanner::plan`](crate::RoutePlanner::plan).
///
/// Either way no route is produced; callers keep whatever they displayed
/// before.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The start or end text is blank; nothing was looked up.
    #[error("the {role} address is empty")]
    BlankEndpoint {
        /// Which endpoint is blank.
        role: RouteRole,
    },
    /// The start or end failed to resolve.
    #[error("route is incomplete: {}", describe(.failures))]
    IncompleteRoute {
        /// One entry per failed endpoint, start first.
        failures: Vec<EndpointFailure>,
    },
}

fn describe(failures: &[EndpointFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors from building a [`ValidationCoordinator`](crate::ValidationCoordinator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoordinatorBuildError {
    /// Built outside a Tokio runtime and no handle was supplied.
    #[error("no Tokio runtime is available to run lookups")]
    NoRuntime,
}
