//! Greedy nearest-neighbor waypoint ordering.
//!
//! Repeatedly visits the closest unvisited waypoint to the current
//! reference point, starting from the route origin. The ultimate
//! destination is never considered while ordering, so the produced
//! sequence can end far from it; that myopia is part of the contract,
//! not something to correct here.

use crate::geo::{haversine_distance_m, GeoPoint};

/// Index of the waypoint nearest to `point`. First occurrence wins on
/// exact distance ties (strict `<` during the scan).
fn nearest_neighbor_idx(point: GeoPoint, pool: &[GeoPoint]) -> usize {
    let mut min_distance = f64::INFINITY;
    let mut idx = 0;
    for (n, candidate) in pool.iter().enumerate() {
        let distance = haversine_distance_m(*candidate, point);
        if distance < min_distance {
            min_distance = distance;
            idx = n;
        }
    }
    idx
}

/// Reorder `waypoints` by greedy proximity from `origin`.
///
/// Returns a permutation of the input: the pool of unvisited waypoints
/// shrinks by one per step while the output grows by one, and each
/// selected waypoint becomes the reference for the next scan. O(n²),
/// fine at the tens-of-waypoints scale this is used at. Empty input
/// yields an empty output.
pub fn nearest_neighbor_order(origin: GeoPoint, waypoints: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut pool = waypoints.to_vec();
    let mut ordered = Vec::with_capacity(pool.len());
    let mut point = origin;
    while !pool.is_empty() {
        let idx = nearest_neighbor_idx(point, &pool);
        point = pool.remove(idx);
        ordered.push(point);
    }
    ordered
}
