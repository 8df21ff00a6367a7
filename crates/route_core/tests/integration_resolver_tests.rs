use std::num::NonZeroUsize;

use route_core::geo::GeoPoint;
use route_core::request::{RouteOptions, TravelMode};
use route_core::resolver::resolve_route;
use route_core::routing::RouteError;
use route_core::test_helpers::{test_request, ScriptedLeg, ScriptedLegRouter};

fn options(chunk_size: usize) -> RouteOptions {
    RouteOptions {
        chunk_size: NonZeroUsize::new(chunk_size).expect("chunk size"),
        ..RouteOptions::default()
    }
}

#[test]
fn small_request_resolves_as_a_single_leg() {
    let router = ScriptedLegRouter::default();
    let request = test_request(4.0, 2);

    let route = resolve_route(&router, &request, TravelMode::Driving, &options(10))
        .expect("resolve")
        .expect("route");

    assert_eq!(route.legs.len(), 1);
    let calls = router.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].origin, request.origin);
    assert_eq!(calls[0].destination, request.destination);
    assert_eq!(calls[0].waypoints, request.waypoints);
}

#[test]
fn five_waypoints_chunk_three_issues_two_chained_calls() {
    let router = ScriptedLegRouter::default();
    let request = test_request(6.0, 5);

    let route = resolve_route(&router, &request, TravelMode::Driving, &options(3))
        .expect("resolve")
        .expect("route");
    assert_eq!(route.legs.len(), 2);

    let calls = router.calls();
    assert_eq!(calls.len(), 2);

    // First leg: request origin through P1, P2 to P3.
    assert_eq!(calls[0].origin, request.origin);
    assert_eq!(calls[0].waypoints, &request.waypoints[..2]);
    assert_eq!(calls[0].destination, request.waypoints[2]);

    // Second leg: chained from P3 through P4, P5 to the destination.
    assert_eq!(calls[1].origin, calls[0].destination);
    assert_eq!(calls[1].waypoints, &request.waypoints[3..]);
    assert_eq!(calls[1].destination, request.destination);
}

#[test]
fn composite_totals_aggregate_all_legs() {
    let router = ScriptedLegRouter::new(vec![
        ScriptedLeg::Ok {
            distance_m: 1_500.0,
            duration_secs: 90.0,
        },
        ScriptedLeg::Ok {
            distance_m: 2_500.0,
            duration_secs: 110.0,
        },
    ]);
    let request = test_request(6.0, 5);

    let route = resolve_route(&router, &request, TravelMode::Driving, &options(3))
        .expect("resolve")
        .expect("route");
    assert_eq!(route.total_distance_m(), 4_000.0);
    assert_eq!(route.total_duration_secs(), 200.0);
}

#[test]
fn no_route_on_any_leg_drops_the_whole_request() {
    let router = ScriptedLegRouter::new(vec![
        ScriptedLeg::Ok {
            distance_m: 1_000.0,
            duration_secs: 60.0,
        },
        ScriptedLeg::NoRoute,
    ]);
    let request = test_request(6.0, 5);

    let resolved =
        resolve_route(&router, &request, TravelMode::Driving, &options(3)).expect("resolve");
    assert!(resolved.is_none(), "no partial composites");
    // The failing leg ends the request; no further sub-requests go out.
    assert_eq!(router.calls().len(), 2);
}

#[test]
fn generic_remote_failure_propagates() {
    let router = ScriptedLegRouter::new(vec![ScriptedLeg::Fail("OVER_QUERY_LIMIT".to_string())]);
    let request = test_request(4.0, 1);

    let err = resolve_route(&router, &request, TravelMode::Driving, &options(10))
        .expect_err("should fail");
    assert!(matches!(err, RouteError::Api(_)));
}

#[test]
fn proximity_pre_pass_reorders_waypoints() {
    let router = ScriptedLegRouter::default();
    // Waypoints listed farthest-first; the greedy pass must flip them.
    let near = GeoPoint::new(1.0, 1.0);
    let mid = GeoPoint::new(2.0, 2.0);
    let far = GeoPoint::new(3.0, 3.0);
    let request = route_core::request::RouteRequest {
        origin: GeoPoint::new(0.0, 0.0),
        destination: GeoPoint::new(4.0, 4.0),
        waypoints: vec![far, near, mid],
    };

    let opts = RouteOptions {
        optimize_sld: true,
        ..options(10)
    };
    resolve_route(&router, &request, TravelMode::Driving, &opts).expect("resolve");

    let calls = router.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].waypoints, vec![near, mid, far]);
}

#[test]
fn without_pre_pass_waypoint_order_is_preserved() {
    let router = ScriptedLegRouter::default();
    let far = GeoPoint::new(3.0, 3.0);
    let near = GeoPoint::new(1.0, 1.0);
    let request = route_core::request::RouteRequest {
        origin: GeoPoint::new(0.0, 0.0),
        destination: GeoPoint::new(4.0, 4.0),
        waypoints: vec![far, near],
    };

    resolve_route(&router, &request, TravelMode::Driving, &options(10)).expect("resolve");
    assert_eq!(router.calls()[0].waypoints, vec![far, near]);
}

#[test]
fn request_without_waypoints_still_routes() {
    let router = ScriptedLegRouter::default();
    let request = test_request(2.0, 0);

    let route = resolve_route(&router, &request, TravelMode::Driving, &options(3))
        .expect("resolve")
        .expect("route");
    assert_eq!(route.legs.len(), 1);
    assert!(router.calls()[0].waypoints.is_empty());
}
