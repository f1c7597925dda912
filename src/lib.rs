//! Facade crate for the reparto delivery planner.
//!
//! This crate re-exports the core domain types and the greedy sequencer, and
//! exposes the HTTP geocoder and the session orchestration behind feature
//! flags.

#![forbid(unsafe_code)]

pub use reparto_core::{
    Address, GeoPoint, GeoResolver, LinkBuilder, NavigationLink, ResolveError, ResolveErrorKind,
    ResolvedAddress, Route, RoutePoint, RouteRole, SequenceRequest, Sequencer, SlotId,
    ValidationState, ValidationStore, haversine_km, parse_address_lines,
};
pub use reparto_sequencer::NearestNeighbourSequencer;

#[cfg(feature = "geocode-http")]
pub use reparto_geocode::{CachingResolver, HttpGeoResolver, HttpGeoResolverConfig};

#[cfg(feature = "session")]
pub use reparto_session::{
    PlanError, PlanRequest, PlannedRoute, PlannerConfig, RoutePlanner, ValidationConfig,
    ValidationCoordinator,
};
