//! Tests for the `NearestNeighbourSequencer`.

use super::*;
use reparto_core::RouteRole;
use rstest::rstest;

use crate::test_support::{request, stop, visit_order};

#[rstest]
fn augments_from_current_position_not_from_start() {
    // B is nearest to A; D is nearer to B than C is, even though C would
    // be a fine second hop measured from A.
    let a = stop("A", 0.0, 0.0);
    let b = stop("B", 0.0, 0.010);
    let c = stop("C", 0.0, -0.012);
    let d = stop("D", 0.0, 0.018);
    let end = stop("End", 0.0, 0.05);

    let route = NearestNeighbourSequencer::new().sequence(request(a, end, vec![c, d, b]));

    assert_eq!(visit_order(&route), ["A", "B", "D", "C", "End"]);
}

#[rstest]
fn single_intermediate_is_placed_between_endpoints() {
    let route = NearestNeighbourSequencer::new().sequence(request(
        stop("A", 0.0, 0.0),
        stop("C", 1.0, 1.0),
        vec![stop("B", 0.5, 0.5)],
    ));
    let roles: Vec<_> = route.points().iter().map(|p| p.role).collect();
    assert_eq!(
        roles,
        [RouteRole::Start, RouteRole::Intermediate, RouteRole::End]
    );
}

#[rstest]
fn no_intermediates_yields_start_and_end() {
    let route = NearestNeighbourSequencer::new().sequence(request(
        stop("A", 0.0, 0.0),
        stop("C", 1.0, 1.0),
        Vec::new(),
    ));
    assert_eq!(visit_order(&route), ["A", "C"]);
}

#[rstest]
#[case(vec![("East", 0.01), ("West", -0.01)], ["East", "West"])]
#[case(vec![("West", -0.01), ("East", 0.01)], ["West", "East"])]
fn exact_ties_follow_input_order(#[case] stops: Vec<(&str, f64)>, #[case] expected: [&str; 2]) {
    let intermediates = stops
        .into_iter()
        .map(|(name, lon)| stop(name, 0.0, lon))
        .collect();
    let route = NearestNeighbourSequencer::new().sequence(request(
        stop("Depot", 0.0, 0.0),
        stop("Home", 1.0, 0.0),
        intermediates,
    ));
    let order = visit_order(&route);
    let [first, second] = expected;
    assert_eq!(order.get(1).map(String::as_str), Some(first));
    assert_eq!(order.get(2).map(String::as_str), Some(second));
}

#[rstest]
fn duplicate_addresses_are_all_kept() {
    let route = NearestNeighbourSequencer::new().sequence(request(
        stop("A", 0.0, 0.0),
        stop("Z", 0.0, 1.0),
        vec![stop("Same", 0.0, 0.3), stop("Same", 0.0, 0.3)],
    ));
    assert_eq!(visit_order(&route), ["A", "Same", "Same", "Z"]);
}

#[rstest]
fn stop_at_start_position_is_visited_first() {
    let order = nearest_neighbour_order(
        GeoPoint::new(10.0, 10.0),
        &[GeoPoint::new(11.0, 10.0), GeoPoint::new(10.0, 10.0)],
    );
    assert_eq!(order, [1, 0]);
}

#[rstest]
fn empty_stop_list_has_empty_order() {
    assert!(nearest_neighbour_order(GeoPoint::new(0.0, 0.0), &[]).is_empty());
}
