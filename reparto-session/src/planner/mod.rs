//! Batch "compute route": resolve every field, then sequence and link.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use log::{debug, warn};
use reparto_core::{
    Address, GeoPoint, GeoResolver, LinkBuilder, NavigationLink, ResolveError, ResolvedAddress,
    Route, RouteRole, SequenceRequest, Sequencer, parse_address_lines,
};

use crate::{EndpointFailure, PlanError, PlannerConfig};

/// Addresses to plan a route through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    /// First stop.
    pub start: Address,
    /// Last stop.
    pub end: Address,
    /// Stops to visit in between, in input order.
    pub intermediates: Vec<Address>,
}

impl PlanRequest {
    /// Build a request from already-split addresses.
    #[must_use]
    pub const fn new(start: Address, end: Address, intermediates: Vec<Address>) -> Self {
        Self {
            start,
            end,
            intermediates,
        }
    }

    /// Build a request from field text; `stops` holds one address per line.
    ///
    /// # Examples
    /// ```
    /// use reparto_session::PlanRequest;
    ///
    /// let request = PlanRequest::from_text("Depot", "Home", "A\n\n  B  \n");
    /// assert_eq!(request.intermediates.len(), 2);
    /// ```
    #[must_use]
    pub fn from_text(start: &str, end: &str, stops: &str) -> Self {
        Self::new(
            Address::new(start),
            Address::new(end),
            parse_address_lines(stops),
        )
    }
}

/// An intermediate that was left out because its lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStop {
    /// The text that failed.
    pub address: Address,
    /// Why it failed.
    pub error: ResolveError,
}

/// Result of a successful plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    /// Ordered stops.
    pub route: Route,
    /// Navigation link for `route`.
    pub link: NavigationLink,
    /// Intermediates excluded from `route`, in input order.
    pub skipped: Vec<SkippedStop>,
}

/// Resolves a [`PlanRequest`] and orders it into a [`PlannedRoute`].
///
/// All lookups for one plan run concurrently and are joined before
/// sequencing. A failed intermediate is dropped and reported in
/// [`PlannedRoute::skipped`]; a failed start or end fails the plan.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use reparto_core::test_support::TableResolver;
/// use reparto_core::GeoPoint;
/// use reparto_sequencer::NearestNeighbourSequencer;
/// use reparto_session::{PlanRequest, RoutePlanner};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let resolver = TableResolver::new()
///     .with_point("A", GeoPoint::new(0.0, 0.0))
///     .with_point("B", GeoPoint::new(0.0, 0.01))
///     .with_point("C", GeoPoint::new(0.0, 0.05));
/// let planner = RoutePlanner::new(Arc::new(resolver), NearestNeighbourSequencer::new());
///
/// let planned = planner.plan(&PlanRequest::from_text("A", "C", "B\nMissing")).await.unwrap();
/// assert_eq!(planned.route.labelled(), ["1. A", "2. B", "3. C"]);
/// assert_eq!(planned.skipped.len(), 1);
/// # });
/// ```
pub struct RoutePlanner<R: ?Sized, S> {
    resolver: Arc<R>,
    sequencer: S,
    links: LinkBuilder,
    config: PlannerConfig,
}

impl<R: ?Sized, S: std::fmt::Debug> std::fmt::Debug for RoutePlanner<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutePlanner")
            .field("sequencer", &self.sequencer)
            .field("links", &self.links)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R, S> RoutePlanner<R, S>
where
    R: GeoResolver + ?Sized,
    S: Sequencer,
{
    /// Create a planner with default link target and concurrency.
    #[must_use]
    pub fn new(resolver: Arc<R>, sequencer: S) -> Self {
        Self {
            resolver,
            sequencer,
            links: LinkBuilder::default(),
            config: PlannerConfig::default(),
        }
    }

    /// Replace the planner configuration.
    #[must_use]
    pub const fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the navigation link builder.
    #[must_use]
    pub fn with_link_builder(mut self, links: LinkBuilder) -> Self {
        self.links = links;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> PlannerConfig {
        self.config
    }

    /// Resolve, sequence and link `request`.
    ///
    /// Blank intermediates are ignored.
    ///
    /// # Errors
    ///
    /// - [`PlanError::BlankEndpoint`] when the start or end is blank; no
    ///   lookup is issued.
    /// - [`PlanError::IncompleteRoute`] when the start or end fails to
    ///   resolve; no route is produced.
    pub async fn plan(&self, request: &PlanRequest) -> Result<PlannedRoute, PlanError> {
        for (role, address) in [
            (RouteRole::Start, &request.start),
            (RouteRole::End, &request.end),
        ] {
            if address.is_blank() {
                return Err(PlanError::BlankEndpoint { role });
            }
        }

        let stops: Vec<&Address> = request
            .intermediates
            .iter()
            .filter(|address| !address.is_blank())
            .collect();
        let (start_outcome, end_outcome, stop_outcomes) = futures_util::join!(
            self.resolver.resolve(&request.start),
            self.resolver.resolve(&request.end),
            stream::iter(stops.iter().map(|address| self.resolver.resolve(address)))
                .buffered(self.config.max_concurrent_lookups.max(1))
                .collect::<Vec<_>>(),
        );
        debug!(
            "resolved {} of {} intermediate stops",
            stop_outcomes.iter().filter(|outcome| outcome.is_ok()).count(),
            stops.len()
        );

        let (start, end) = endpoints(request, start_outcome, end_outcome)?;
        let (intermediates, skipped) = split_intermediates(&stops, stop_outcomes);
        let route = self.sequencer.sequence(SequenceRequest {
            start,
            end,
            intermediates,
        });
        let link = self.links.build(&route);
        Ok(PlannedRoute {
            route,
            link,
            skipped,
        })
    }
}

fn endpoints(
    request: &PlanRequest,
    start: Result<GeoPoint, ResolveError>,
    end: Result<GeoPoint, ResolveError>,
) -> Result<(ResolvedAddress, ResolvedAddress), PlanError> {
    match (start, end) {
        (Ok(start_point), Ok(end_point)) => Ok((
            ResolvedAddress::new(request.start.clone(), start_point),
            ResolvedAddress::new(request.end.clone(), end_point),
        )),
        (start_outcome, end_outcome) => {
            let failures: Vec<EndpointFailure> = [
                (RouteRole::Start, &request.start, start_outcome.err()),
                (RouteRole::End, &request.end, end_outcome.err()),
            ]
            .into_iter()
            .filter_map(|(role, address, error)| {
                error.map(|err| EndpointFailure {
                    role,
                    address: address.clone(),
                    error: err,
                })
            })
            .collect();
            let incomplete = PlanError::IncompleteRoute { failures };
            warn!("{incomplete}");
            Err(incomplete)
        }
    }
}

fn split_intermediates(
    stops: &[&Address],
    outcomes: Vec<Result<GeoPoint, ResolveError>>,
) -> (Vec<ResolvedAddress>, Vec<SkippedStop>) {
    let mut resolved = Vec::with_capacity(stops.len());
    let mut skipped = Vec::new();
    for (address, outcome) in stops.iter().zip(outcomes) {
        match outcome {
            Ok(location) => resolved.push(ResolvedAddress::new((*address).clone(), location)),
            Err(error) => {
                warn!("dropping stop {:?}: {error}", address.normalized());
                skipped.push(SkippedStop {
                    address: (*address).clone(),
                    error,
                });
            }
        }
    }
    (resolved, skipped)
}

#[cfg(test)]
mod tests;
