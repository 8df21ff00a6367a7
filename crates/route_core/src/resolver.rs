//! Route resolution: turn one [`RouteRequest`] with arbitrarily many
//! waypoints into a composite route via chunked sequential sub-requests.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::chunking::plan_legs;
use crate::ordering::nearest_neighbor_order;
use crate::request::{RouteOptions, RouteRequest, TravelMode};
use crate::routing::{LegRouter, RouteError, RouteLeg};

/// The full origin-to-destination route assembled from an ordered
/// sequence of legs, with the wall-clock time the resolution took.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeRoute {
    pub legs: Vec<RouteLeg>,
    pub total_compute_time_ms: u64,
}

impl CompositeRoute {
    pub fn total_distance_m(&self) -> f64 {
        self.legs.iter().map(|l| l.distance_m).sum()
    }

    pub fn total_duration_secs(&self) -> f64 {
        self.legs.iter().map(|l| l.duration_secs).sum()
    }
}

/// Resolve one request into a composite route.
///
/// Waypoints are optionally reordered by the greedy proximity pre-pass
/// (`options.optimize_sld`), then chunked; each planned leg is routed
/// in order through `router`, strictly sequentially — a leg's origin
/// is the previous leg's destination, so there is nothing to
/// parallelize. A [`RouteError::NoRoute`] on any leg makes the whole
/// request unroutable and yields `Ok(None)`: a multi-leg path without
/// a usable terminal leg is not a usable route, so no partial
/// composite is ever returned. Any other error propagates.
pub fn resolve_route(
    router: &dyn LegRouter,
    request: &RouteRequest,
    mode: TravelMode,
    options: &RouteOptions,
) -> Result<Option<CompositeRoute>, RouteError> {
    let started = Instant::now();

    let waypoints = if options.optimize_sld {
        nearest_neighbor_order(request.origin, &request.waypoints)
    } else {
        request.waypoints.clone()
    };

    let plan = plan_legs(
        request.origin,
        request.destination,
        &waypoints,
        options.chunk_size,
    );
    log::debug!(
        "resolving request as {} leg(s) (chunk size {})",
        plan.len(),
        options.chunk_size
    );

    let mut legs = Vec::with_capacity(plan.len());
    for (n, leg_plan) in plan.iter().enumerate() {
        match router.route_leg(
            leg_plan.origin,
            leg_plan.destination,
            &leg_plan.waypoints,
            mode,
            options,
        ) {
            Ok(leg) => legs.push(leg),
            Err(RouteError::NoRoute) => {
                log::debug!("leg {} of {} has no route, dropping request", n, plan.len());
                return Ok(None);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(Some(CompositeRoute {
        legs,
        total_compute_time_ms: started.elapsed().as_millis() as u64,
    }))
}
