//! Core domain types for the reparto delivery planner.
//!
//! The crate holds everything that does not touch the network or a runtime:
//! addresses and coordinates, the route model and its role invariants, the
//! [`GeoResolver`] and [`Sequencer`] seams, the per-slot validation store and
//! the navigation link encoder. Async orchestration lives in
//! `reparto-session`; the HTTP geocoder lives in `reparto-geocode`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod address;
mod link;
mod point;
mod resolver;
mod route;
mod sequencer;
pub mod validation;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use address::{Address, parse_address_lines};
pub use link::{
    DEFAULT_DIRECTIONS_BASE_URL, LinkBuilder, NavigationLink, WAYPOINT_SEPARATOR,
};
pub use point::{EARTH_RADIUS_KM, GeoPoint, GeoPointError, haversine_km};
pub use resolver::{GeoResolver, ResolveError, ResolveErrorKind, ResolvedAddress};
pub use route::{Route, RouteError, RoutePoint, RouteRole};
pub use sequencer::{SequenceRequest, Sequencer};
pub use validation::{
    CommitOutcome, Edit, Generation, SlotId, SlotSnapshot, ValidationState, ValidationStore,
};
