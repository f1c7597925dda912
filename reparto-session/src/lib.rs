//! Editing-session orchestration for reparto.
//!
//! [`ValidationCoordinator`] validates address fields as they are typed:
//! edits are debounced, superseded lookups are cancelled, and a reply is
//! committed only while its generation is still current.
//! [`RoutePlanner`] handles the "compute route" action: it resolves every
//! field concurrently, drops failed intermediates, and hands the rest to a
//! [`reparto_core::Sequencer`] before building the navigation link.

#![forbid(unsafe_code)]

mod config;
mod coordinator;
mod error;
mod planner;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{
    DEFAULT_DEBOUNCE, DEFAULT_MAX_CONCURRENT_LOOKUPS, PlannerConfig, ValidationConfig,
};
pub use coordinator::{SlotUpdate, ValidationCoordinator};
pub use error::{CoordinatorBuildError, EndpointFailure, PlanError};
pub use planner::{PlanRequest, PlannedRoute, RoutePlanner, SkippedStop};
