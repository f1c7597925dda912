//! Tests for `RoutePlanner`.

use std::time::Duration;

use super::*;
use crate::test_support::ScriptedResolver;
use reparto_core::test_support::TableResolver;
use reparto_sequencer::NearestNeighbourSequencer;
use rstest::{fixture, rstest};

fn timeout() -> ResolveError {
    ResolveError::Timeout {
        url: "http://geo.example.com/search".to_owned(),
        timeout_secs: 10,
    }
}

#[fixture]
fn resolver() -> TableResolver {
    TableResolver::new()
        .with_point("A", GeoPoint::new(0.0, 0.0))
        .with_point("B", GeoPoint::new(0.0, 0.010))
        .with_point("D", GeoPoint::new(0.0, 0.018))
        .with_point("C", GeoPoint::new(0.0, 0.050))
        .with_error("Flaky", timeout())
}

fn planner(resolver: TableResolver) -> RoutePlanner<TableResolver, NearestNeighbourSequencer> {
    RoutePlanner::new(Arc::new(resolver), NearestNeighbourSequencer::new())
}

#[rstest]
#[tokio::test]
async fn plans_nearest_neighbour_route(resolver: TableResolver) {
    let planned = planner(resolver)
        .plan(&PlanRequest::from_text("A", "C", "D\nB"))
        .await
        .expect("plan should succeed");

    assert_eq!(planned.route.labelled(), ["1. A", "2. B", "3. D", "4. C"]);
    assert!(planned.skipped.is_empty());
    assert_eq!(
        planned.link.as_str(),
        "https://www.google.com/maps/dir/?api=1&travelmode=driving&origin=A&destination=C&waypoints=B%7CD&avoid=tolls"
    );
}

#[rstest]
#[tokio::test]
async fn failed_intermediates_are_dropped_and_reported(resolver: TableResolver) {
    let planned = planner(resolver)
        .plan(&PlanRequest::from_text("A", "C", "Nowhere\nB\nFlaky"))
        .await
        .expect("plan should succeed");

    assert_eq!(planned.route.labelled(), ["1. A", "2. B", "3. C"]);
    let skipped: Vec<_> = planned
        .skipped
        .iter()
        .map(|stop| (stop.address.normalized(), stop.error.is_transient()))
        .collect();
    assert_eq!(skipped, [("Nowhere", false), ("Flaky", true)]);
}

#[rstest]
#[tokio::test]
async fn end_failure_produces_no_route(resolver: TableResolver) {
    let err = planner(resolver)
        .plan(&PlanRequest::from_text("A", "Atlantis", "B"))
        .await
        .expect_err("plan should fail");

    let PlanError::IncompleteRoute { failures } = &err else {
        panic!("expected IncompleteRoute, got {err:?}");
    };
    let roles: Vec<_> = failures.iter().map(|failure| failure.role).collect();
    assert_eq!(roles, [RouteRole::End]);
}

#[rstest]
#[tokio::test]
async fn both_endpoint_failures_are_reported(resolver: TableResolver) {
    let err = planner(resolver)
        .plan(&PlanRequest::from_text("Flaky", "Atlantis", ""))
        .await
        .expect_err("plan should fail");

    let PlanError::IncompleteRoute { failures } = &err else {
        panic!("expected IncompleteRoute, got {err:?}");
    };
    let roles: Vec<_> = failures.iter().map(|failure| failure.role).collect();
    assert_eq!(roles, [RouteRole::Start, RouteRole::End]);
    assert!(err.to_string().contains("start \"Flaky\""));
}

#[rstest]
#[case("  ", "C", RouteRole::Start)]
#[case("A", "", RouteRole::End)]
#[tokio::test]
async fn blank_endpoint_fails_before_any_lookup(
    resolver: TableResolver,
    #[case] start: &str,
    #[case] end: &str,
    #[case] role: RouteRole,
) {
    let shared = Arc::new(resolver);
    let blank_planner = RoutePlanner::new(Arc::clone(&shared), NearestNeighbourSequencer::new());

    let err = blank_planner
        .plan(&PlanRequest::from_text(start, end, "B"))
        .await
        .expect_err("plan should fail");

    assert_eq!(err, PlanError::BlankEndpoint { role });
    assert_eq!(shared.requests(), 0);
}

#[rstest]
#[tokio::test]
async fn blank_intermediates_are_ignored(resolver: TableResolver) {
    let request = PlanRequest::new(
        Address::new("A"),
        Address::new("C"),
        vec![Address::new(""), Address::new("B"), Address::new("\t")],
    );

    let planned = planner(resolver)
        .plan(&request)
        .await
        .expect("plan should succeed");

    assert_eq!(planned.route.len(), 3);
    assert!(planned.skipped.is_empty());
}

#[rstest]
#[tokio::test]
async fn planning_twice_is_idempotent(resolver: TableResolver) {
    let planner = planner(resolver);
    let request = PlanRequest::from_text("A", "C", "D\nB");

    let first = planner.plan(&request).await.expect("first plan");
    let second = planner.plan(&request).await.expect("second plan");

    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn lookups_run_concurrently() {
    let delay = Duration::from_millis(100);
    let resolver = ScriptedResolver::new()
        .with_point("A", GeoPoint::new(0.0, 0.0), delay)
        .with_point("C", GeoPoint::new(0.0, 1.0), delay)
        .with_point("B1", GeoPoint::new(0.0, 0.1), delay)
        .with_point("B2", GeoPoint::new(0.0, 0.2), delay)
        .with_point("B3", GeoPoint::new(0.0, 0.3), delay);
    let planner = RoutePlanner::new(Arc::new(resolver), NearestNeighbourSequencer::new());
    let began = tokio::time::Instant::now();

    let planned = planner
        .plan(&PlanRequest::from_text("A", "C", "B3\nB1\nB2"))
        .await
        .expect("plan should succeed");

    assert!(began.elapsed() < delay * 2, "lookups ran one after another");
    assert_eq!(planned.route.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn concurrency_limit_bounds_intermediate_lookups() {
    let delay = Duration::from_millis(100);
    let resolver = ScriptedResolver::new()
        .with_point("A", GeoPoint::new(0.0, 0.0), Duration::ZERO)
        .with_point("C", GeoPoint::new(0.0, 1.0), Duration::ZERO)
        .with_point("B1", GeoPoint::new(0.0, 0.1), delay)
        .with_point("B2", GeoPoint::new(0.0, 0.2), delay)
        .with_point("B3", GeoPoint::new(0.0, 0.3), delay);
    let planner = RoutePlanner::new(Arc::new(resolver), NearestNeighbourSequencer::new())
        .with_config(PlannerConfig::default().with_max_concurrent_lookups(1));
    let began = tokio::time::Instant::now();

    planner
        .plan(&PlanRequest::from_text("A", "C", "B1\nB2\nB3"))
        .await
        .expect("plan should succeed");

    assert!(began.elapsed() >= delay * 3, "more than one stop was in flight");
}
