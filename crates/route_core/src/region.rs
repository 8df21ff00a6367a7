//! Metropolitan regions and the batch producer: seeded random
//! sampling of origin/destination/waypoint requests inside a region
//! polygon.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::request::RouteRequest;

/// A metropolitan region bounded by a simple polygon.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetroRegion {
    /// Stable selector key, e.g. `"san-francisco"`.
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Boundary vertices; the closing edge back to the first vertex is
    /// implicit.
    pub polygon: Vec<GeoPoint>,
}

impl MetroRegion {
    /// Axis-aligned bounding box as (lat_min, lat_max, lng_min, lng_max).
    fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let mut lat_min = f64::INFINITY;
        let mut lat_max = f64::NEG_INFINITY;
        let mut lng_min = f64::INFINITY;
        let mut lng_max = f64::NEG_INFINITY;
        for p in &self.polygon {
            lat_min = lat_min.min(p.lat);
            lat_max = lat_max.max(p.lat);
            lng_min = lng_min.min(p.lng);
            lng_max = lng_max.max(p.lng);
        }
        (lat_min, lat_max, lng_min, lng_max)
    }

    /// Ray-casting point-in-polygon test. Assumes at least three
    /// vertices. Boundary behavior is unspecified; sampled points land
    /// on the boundary with probability zero.
    pub fn contains(&self, point: GeoPoint) -> bool {
        let mut inside = false;
        let n = self.polygon.len();
        let mut j = n - 1;
        for i in 0..n {
            let a = self.polygon[i];
            let b = self.polygon[j];
            if (a.lng > point.lng) != (b.lng > point.lng) {
                let intersect_lat = (b.lat - a.lat) * (point.lng - a.lng) / (b.lng - a.lng) + a.lat;
                if point.lat < intersect_lat {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Sample a uniform random point inside the polygon by rejection
    /// from the bounding box.
    pub fn sample_point(&self, rng: &mut StdRng) -> GeoPoint {
        let (lat_min, lat_max, lng_min, lng_max) = self.bounding_box();
        loop {
            let candidate = GeoPoint::new(
                rng.gen_range(lat_min..lat_max),
                rng.gen_range(lng_min..lng_max),
            );
            if self.contains(candidate) {
                return candidate;
            }
        }
    }

    /// Produce a batch of random route requests inside this region,
    /// each with `waypoints_per_request` intermediate waypoints.
    pub fn sample_requests(
        &self,
        rng: &mut StdRng,
        count: usize,
        waypoints_per_request: usize,
    ) -> Vec<RouteRequest> {
        (0..count)
            .map(|_| {
                let origin = self.sample_point(rng);
                let destination = self.sample_point(rng);
                let waypoints = (0..waypoints_per_request)
                    .map(|_| self.sample_point(rng))
                    .collect();
                RouteRequest {
                    origin,
                    destination,
                    waypoints,
                }
            })
            .collect()
    }
}

/// Seeded RNG for deterministic batch production.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// The built-in metro regions.
///
/// Polygon coordinates were traced manually around each metro area.
pub fn builtin_metros() -> Vec<MetroRegion> {
    vec![
        MetroRegion {
            key: "san-francisco".to_string(),
            label: "San Francisco".to_string(),
            polygon: vec![
                GeoPoint::new(37.80006, -122.50034),
                GeoPoint::new(37.80594, -122.3546),
                GeoPoint::new(37.70345, -122.35667),
                GeoPoint::new(37.70352, -122.50083),
            ],
        },
        MetroRegion {
            key: "amsterdam".to_string(),
            label: "Amsterdam, Netherlands".to_string(),
            polygon: vec![
                GeoPoint::new(52.4297033030251, 4.793686580937697),
                GeoPoint::new(52.409207537381405, 5.032990128331033),
                GeoPoint::new(52.380761917412165, 4.977875670971678),
                GeoPoint::new(52.30445762928882, 5.061308354581498),
                GeoPoint::new(52.286832922323846, 4.7461268864958575),
            ],
        },
    ]
}

/// Look up a built-in metro by selector key.
pub fn find_metro(key: &str) -> Option<MetroRegion> {
    builtin_metros().into_iter().find(|m| m.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sf_box_contains_downtown_and_not_oakland() {
        let sf = find_metro("san-francisco").expect("built-in metro");
        assert!(sf.contains(GeoPoint::new(37.7749, -122.4194)));
        assert!(!sf.contains(GeoPoint::new(37.8044, -122.2712)));
    }

    #[test]
    fn sampled_points_stay_inside_the_polygon() {
        let mut rng = seeded_rng(42);
        for metro in builtin_metros() {
            for _ in 0..200 {
                let p = metro.sample_point(&mut rng);
                assert!(p.lat.is_finite() && p.lng.is_finite());
                assert!(metro.contains(p), "{:?} escaped {}", p, metro.key);
            }
        }
    }

    #[test]
    fn sampling_is_deterministic_under_a_fixed_seed() {
        let metro = find_metro("amsterdam").expect("built-in metro");
        let batch_a = metro.sample_requests(&mut seeded_rng(7), 5, 3);
        let batch_b = metro.sample_requests(&mut seeded_rng(7), 5, 3);
        assert_eq!(batch_a, batch_b);
    }

    #[test]
    fn sample_requests_shapes_the_batch() {
        let metro = find_metro("san-francisco").expect("built-in metro");
        let batch = metro.sample_requests(&mut seeded_rng(1), 4, 6);
        assert_eq!(batch.len(), 4);
        for request in &batch {
            assert_eq!(request.waypoints.len(), 6);
        }
    }

    #[test]
    fn unknown_metro_key_is_none() {
        assert!(find_metro("gotham").is_none());
    }
}
