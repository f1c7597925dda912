//! `NearestNeighbourSequencer` implementation.
//!
//! Ties on exact distance go to the stop that appears first in the input,
//! so the output is fully determined by the request.

use log::debug;
use reparto_core::{GeoPoint, ResolvedAddress, Route, SequenceRequest, Sequencer, haversine_km};

/// Greedy nearest-neighbour sequencer.
///
/// # Examples
/// ```rust
/// use reparto_core::{Address, GeoPoint, ResolvedAddress, SequenceRequest, Sequencer};
/// use reparto_sequencer::NearestNeighbourSequencer;
///
/// let stop = |text: &str, lon: f64| ResolvedAddress::new(Address::new(text), GeoPoint::new(0.0, lon));
/// let route = NearestNeighbourSequencer::new().sequence(SequenceRequest {
///     start: stop("A", 0.0),
///     end: stop("C", 0.03),
///     intermediates: vec![stop("D", 0.02), stop("B", 0.01)],
/// });
///
/// assert_eq!(route.labelled(), ["1. A", "2. B", "3. D", "4. C"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbourSequencer;

impl NearestNeighbourSequencer {
    /// Construct the sequencer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Sequencer for NearestNeighbourSequencer {
    fn sequence(&self, request: SequenceRequest) -> Route {
        let SequenceRequest {
            start,
            end,
            intermediates,
        } = request;
        let locations: Vec<GeoPoint> = intermediates.iter().map(|stop| stop.location).collect();
        let order = nearest_neighbour_order(start.location, &locations);
        debug!(
            "sequenced {} intermediate stops from {}: {order:?}",
            order.len(),
            start.address
        );

        let mut pending: Vec<Option<ResolvedAddress>> =
            intermediates.into_iter().map(Some).collect();
        let ordered = order
            .into_iter()
            .filter_map(|index| pending.get_mut(index).and_then(Option::take))
            .collect();
        Route::assemble(start, ordered, end)
    }
}

/// Visiting order of `stops` starting from `start`, as input indices.
///
/// Each step picks the remaining stop with the smallest haversine distance
/// from the current position; equal distances resolve to the lowest index.
///
/// # Examples
/// ```rust
/// use reparto_core::GeoPoint;
/// use reparto_sequencer::nearest_neighbour_order;
///
/// let stops = [GeoPoint::new(0.0, 3.0), GeoPoint::new(0.0, 1.0), GeoPoint::new(0.0, 2.0)];
/// assert_eq!(nearest_neighbour_order(GeoPoint::new(0.0, 0.0), &stops), [1, 2, 0]);
/// ```
#[must_use]
pub fn nearest_neighbour_order(start: GeoPoint, stops: &[GeoPoint]) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..stops.len()).collect();
    let mut order = Vec::with_capacity(stops.len());
    let mut current = start;
    while let Some(position) = closest_remaining(current, &remaining, stops) {
        let index = remaining.remove(position);
        if let Some(next) = stops.get(index) {
            current = *next;
        }
        order.push(index);
    }
    order
}

/// Position within `remaining` of the stop closest to `from`.
///
/// `remaining` is kept in ascending input order and `min_by` returns the
/// first of several equal minima, which yields the input-order tie-break.
fn closest_remaining(from: GeoPoint, remaining: &[usize], stops: &[GeoPoint]) -> Option<usize> {
    remaining
        .iter()
        .enumerate()
        .filter_map(|(position, &index)| {
            stops
                .get(index)
                .map(|stop| (position, haversine_km(from, *stop)))
        })
        .min_by(|(_, lhs), (_, rhs)| lhs.total_cmp(rhs))
        .map(|(position, _)| position)
}

#[cfg(test)]
mod tests;
