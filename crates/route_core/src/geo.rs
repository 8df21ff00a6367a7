//! Geographic primitives: lat/lng points and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees. Immutable value type;
/// equality is exact coordinate equality.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Bit-exact key for hashing; `f64` itself is not `Hash`.
    pub(crate) fn bits(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lng.to_bits())
    }
}

/// Haversine distance between two points in metres.
pub fn haversine_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}
