//! Leg planning: split an ordered waypoint list into request-legal
//! chunks whose endpoints chain into one continuous route.

use std::num::NonZeroUsize;

use crate::geo::GeoPoint;

/// One planned sub-request: at most `chunk_size` points per leg, the
/// last of which is the leg destination and the rest intermediate
/// waypoints. Adjacent legs share an endpoint: `legs[i].destination ==
/// legs[i + 1].origin`.
#[derive(Clone, Debug, PartialEq)]
pub struct LegPlan {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub waypoints: Vec<GeoPoint>,
}

/// Plan the chunked legs for a route.
///
/// The overall `destination` is appended to `ordered_waypoints`, the
/// combined sequence is partitioned into contiguous groups of at most
/// `chunk_size` points (final group possibly shorter), and each group
/// becomes one leg whose origin is the previous leg's destination (the
/// overall `origin` for the first). Produces exactly
/// `ceil((ordered_waypoints.len() + 1) / chunk_size)` legs covering
/// every point exactly once, in order. Pure function.
pub fn plan_legs(
    origin: GeoPoint,
    destination: GeoPoint,
    ordered_waypoints: &[GeoPoint],
    chunk_size: NonZeroUsize,
) -> Vec<LegPlan> {
    let mut combined = ordered_waypoints.to_vec();
    combined.push(destination);

    let mut legs = Vec::with_capacity(combined.len().div_ceil(chunk_size.get()));
    let mut leg_origin = origin;
    for group in combined.chunks(chunk_size.get()) {
        // Non-empty by construction: chunks() never yields an empty slice.
        let leg_destination = group[group.len() - 1];
        legs.push(LegPlan {
            origin: leg_origin,
            destination: leg_destination,
            waypoints: group[..group.len() - 1].to_vec(),
        });
        leg_origin = leg_destination;
    }
    legs
}
