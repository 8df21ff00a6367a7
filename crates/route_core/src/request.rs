//! Route requests and the options/strategy descriptors that drive
//! how a batch is resolved.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Hard upper bound on intermediate waypoints per Directions request,
/// imposed by the remote service.
pub const MAX_WAYPOINTS_PER_LEG: usize = 25;

/// Travel mode forwarded to the remote routing service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// Wire name used by the Directions API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

/// One origin/destination pair with intermediate waypoints, produced
/// by the batch producer and consumed exactly once by the resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub waypoints: Vec<GeoPoint>,
}

/// Resolution options for one batch.
///
/// `chunk_size` bounds the intermediate waypoints (leg origin and
/// destination excluded) per remote sub-request and must stay at or
/// below [`MAX_WAYPOINTS_PER_LEG`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Ask the remote service to avoid toll roads.
    pub avoid_tolls: bool,
    /// Ask the remote service to avoid highways.
    pub avoid_highways: bool,
    /// Ask the remote service to optimize waypoint order within each leg.
    pub optimize_waypoints: bool,
    /// Run the greedy straight-line-distance pre-pass over the full
    /// waypoint set before chunking.
    pub optimize_sld: bool,
    /// Maximum intermediate waypoints per leg.
    pub chunk_size: NonZeroUsize,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            avoid_tolls: false,
            avoid_highways: false,
            optimize_waypoints: false,
            optimize_sld: false,
            chunk_size: NonZeroUsize::new(10).expect("non-zero"),
        }
    }
}

/// Named resolution strategies the operator can pick from, standing in
/// for the algorithm selector of the original tool. Each maps to a
/// [`RouteOptions`] preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Chunked resolution in the waypoints' given order.
    #[default]
    Chunked,
    /// Chunked resolution after the greedy nearest-neighbor pre-pass.
    ChunkedProximity,
    /// Chunked resolution with remote in-leg waypoint optimization.
    ChunkedInLeg,
}

impl Strategy {
    /// All strategies, in selector order.
    pub fn all() -> &'static [Strategy] {
        &[
            Strategy::Chunked,
            Strategy::ChunkedProximity,
            Strategy::ChunkedInLeg,
        ]
    }

    /// Stable key for CLI/selector use.
    pub fn key(&self) -> &'static str {
        match self {
            Strategy::Chunked => "chunked",
            Strategy::ChunkedProximity => "chunked-proximity",
            Strategy::ChunkedInLeg => "chunked-in-leg",
        }
    }

    /// Look up a strategy by its selector key.
    pub fn from_key(key: &str) -> Option<Strategy> {
        Strategy::all().iter().copied().find(|s| s.key() == key)
    }

    /// The options preset for this strategy at the given chunk size.
    pub fn options(&self, chunk_size: NonZeroUsize) -> RouteOptions {
        let base = RouteOptions {
            chunk_size,
            ..RouteOptions::default()
        };
        match self {
            Strategy::Chunked => base,
            Strategy::ChunkedProximity => RouteOptions {
                optimize_sld: true,
                ..base
            },
            Strategy::ChunkedInLeg => RouteOptions {
                optimize_waypoints: true,
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_keys_round_trip() {
        for s in Strategy::all() {
            assert_eq!(Strategy::from_key(s.key()), Some(*s));
        }
        assert_eq!(Strategy::from_key("nope"), None);
    }

    #[test]
    fn proximity_strategy_enables_sld_only() {
        let opts = Strategy::ChunkedProximity.options(NonZeroUsize::new(5).unwrap());
        assert!(opts.optimize_sld);
        assert!(!opts.optimize_waypoints);
        assert_eq!(opts.chunk_size.get(), 5);
    }

    #[test]
    fn in_leg_strategy_enables_remote_optimization_only() {
        let opts = Strategy::ChunkedInLeg.options(NonZeroUsize::new(8).unwrap());
        assert!(opts.optimize_waypoints);
        assert!(!opts.optimize_sld);
    }

    #[test]
    fn default_chunk_size_is_api_legal() {
        assert!(RouteOptions::default().chunk_size.get() <= MAX_WAYPOINTS_PER_LEG);
    }
}
