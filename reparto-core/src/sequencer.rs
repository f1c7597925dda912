//! The seam between resolved stops and a visiting order.

use crate::{ResolvedAddress, Route};

/// Input to a [`Sequencer`].
///
/// `intermediates` keeps the caller's input order; sequencers use that order
/// to break ties deterministically.
///
/// # Examples
/// ```rust
/// use reparto_core::{Address, GeoPoint, ResolvedAddress, SequenceRequest};
///
/// let request = SequenceRequest {
///     start: ResolvedAddress::new(Address::new("Depot"), GeoPoint::new(0.0, 0.0)),
///     end: ResolvedAddress::new(Address::new("Home"), GeoPoint::new(0.0, 1.0)),
///     intermediates: Vec::new(),
/// };
/// assert!(request.intermediates.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRequest {
    /// Fixed first point.
    pub start: ResolvedAddress,
    /// Fixed last point.
    pub end: ResolvedAddress,
    /// Stops to order, in input order.
    pub intermediates: Vec<ResolvedAddress>,
}

/// Choose a visiting order for intermediate stops.
///
/// The returned route must contain exactly the request's points: the start
/// first, the end last, and every intermediate once in between.
/// Sequencers must be `Send + Sync` so planners can share them across tasks.
pub trait Sequencer: Send + Sync {
    /// Order the request's intermediates into a route.
    fn sequence(&self, request: SequenceRequest) -> Route;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, GeoPoint, RouteRole};
    use rstest::rstest;

    struct InputOrderSequencer;

    impl Sequencer for InputOrderSequencer {
        fn sequence(&self, request: SequenceRequest) -> Route {
            Route::assemble(request.start, request.intermediates, request.end)
        }
    }

    fn stop(text: &str) -> ResolvedAddress {
        ResolvedAddress::new(Address::new(text), GeoPoint::new(0.0, 0.0))
    }

    #[rstest]
    fn trait_objects_produce_routes() {
        let sequencer: Box<dyn Sequencer> = Box::new(InputOrderSequencer);
        let route = sequencer.sequence(SequenceRequest {
            start: stop("S"),
            end: stop("E"),
            intermediates: vec![stop("X"), stop("Y")],
        });
        assert_eq!(route.len(), 4);
        assert_eq!(route.end().role, RouteRole::End);
    }
}
