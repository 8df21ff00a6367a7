//! Leg routing: the remote-capability trait, its error taxonomy, and
//! an LRU caching wrapper.
//!
//! The remote service is injected as a `Box<dyn LegRouter>` so the
//! resolver and batch runner can be driven by deterministic fakes in
//! tests. One implementation binds the Google Directions HTTP API
//! (feature `google`); the trait is otherwise deliberately narrow —
//! provider plurality is a non-goal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::request::{RouteOptions, TravelMode};

#[cfg(feature = "google")]
pub mod google;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// The remote service's result for one chunked sub-request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Road distance in metres, summed over the remote result's legs.
    pub distance_m: f64,
    /// Travel time in seconds, summed over the remote result's legs.
    pub duration_secs: f64,
    /// Encoded overview polyline; opaque to this crate.
    pub polyline: String,
    /// Number of stops the remote result covered (waypoints + destination).
    pub stop_count: usize,
}

/// Errors from the remote routing capability.
///
/// `NoRoute` is the classified "no route exists between these points"
/// condition and is the only variant the resolver recovers from; the
/// rest abort the batch.
#[derive(Debug)]
pub enum RouteError {
    #[cfg(feature = "google")]
    Http(reqwest::Error),
    #[cfg(feature = "google")]
    Json(reqwest::Error),
    Api(String),
    NoRoute,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "google")]
            RouteError::Http(err) => write!(f, "http error: {}", err),
            #[cfg(feature = "google")]
            RouteError::Json(err) => write!(f, "malformed response: {}", err),
            RouteError::Api(status) => write!(f, "service rejected request: {}", status),
            RouteError::NoRoute => write!(f, "no route found"),
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "google")]
            RouteError::Http(err) => Some(err),
            #[cfg(feature = "google")]
            RouteError::Json(err) => Some(err),
            _ => None,
        }
    }
}

/// The injected remote routing capability: resolve one leg.
///
/// Implementations must be `Send + Sync` so a router can be shared
/// behind a `Box` or `Arc` by callers that want it.
pub trait LegRouter: Send + Sync {
    /// Route a single leg from `origin` to `destination` through the
    /// given intermediate waypoints. Only the remote-facing flags of
    /// `options` apply here; chunking and the proximity pre-pass have
    /// already happened by the time a leg reaches a router.
    fn route_leg(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        waypoints: &[GeoPoint],
        mode: TravelMode,
        options: &RouteOptions,
    ) -> Result<RouteLeg, RouteError>;
}

// ---------------------------------------------------------------------------
// Caching wrapper
// ---------------------------------------------------------------------------

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Default leg cache capacity.
const DEFAULT_LEG_CACHE_CAPACITY: usize = 2_000;

/// Bit-exact cache key for one leg query. Includes every input that
/// can change the remote answer.
#[derive(Clone, PartialEq, Eq, Hash)]
struct LegKey {
    points: Vec<(u64, u64)>,
    mode: TravelMode,
    flags: u8,
}

impl LegKey {
    fn new(
        origin: GeoPoint,
        destination: GeoPoint,
        waypoints: &[GeoPoint],
        mode: TravelMode,
        options: &RouteOptions,
    ) -> Self {
        let mut points = Vec::with_capacity(waypoints.len() + 2);
        points.push(origin.bits());
        points.extend(waypoints.iter().map(|p| p.bits()));
        points.push(destination.bits());
        let flags = (options.avoid_tolls as u8)
            | (options.avoid_highways as u8) << 1
            | (options.optimize_waypoints as u8) << 2;
        Self {
            points,
            mode,
            flags,
        }
    }
}

/// LRU-cached wrapper around any [`LegRouter`].
///
/// Successful legs are cached; `NoRoute` and transport errors are not,
/// so a transient failure is retried on the next identical query.
pub struct CachedLegRouter {
    inner: Box<dyn LegRouter>,
    cache: Mutex<LruCache<LegKey, RouteLeg>>,
}

impl CachedLegRouter {
    pub fn new(inner: Box<dyn LegRouter>) -> Self {
        Self::with_capacity(inner, DEFAULT_LEG_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: Box<dyn LegRouter>, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).expect("cache capacity must be > 0"),
            )),
        }
    }
}

impl LegRouter for CachedLegRouter {
    fn route_leg(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        waypoints: &[GeoPoint],
        mode: TravelMode,
        options: &RouteOptions,
    ) -> Result<RouteLeg, RouteError> {
        let key = LegKey::new(origin, destination, waypoints, mode, options);

        // Fast path: cache hit
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&key) {
                log::trace!("leg cache hit");
                return Ok(cached.clone());
            }
        }

        let leg = self
            .inner
            .route_leg(origin, destination, waypoints, mode, options)?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, leg.clone());
        }
        Ok(leg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingRouter {
        calls: Arc<AtomicUsize>,
    }

    impl LegRouter for CountingRouter {
        fn route_leg(
            &self,
            _origin: GeoPoint,
            destination: GeoPoint,
            waypoints: &[GeoPoint],
            _mode: TravelMode,
            _options: &RouteOptions,
        ) -> Result<RouteLeg, RouteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if destination.lat < 0.0 {
                return Err(RouteError::NoRoute);
            }
            Ok(RouteLeg {
                distance_m: 1_000.0,
                duration_secs: 60.0,
                polyline: String::new(),
                stop_count: waypoints.len() + 1,
            })
        }
    }

    fn counting_router() -> (CachedLegRouter, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = CachedLegRouter::new(Box::new(CountingRouter {
            calls: Arc::clone(&calls),
        }));
        (router, calls)
    }

    #[test]
    fn identical_queries_hit_the_cache() {
        let (router, calls) = counting_router();
        let a = GeoPoint::new(1.0, 1.0);
        let b = GeoPoint::new(2.0, 2.0);
        let opts = RouteOptions::default();

        let first = router
            .route_leg(a, b, &[], TravelMode::Driving, &opts)
            .expect("route");
        let second = router
            .route_leg(a, b, &[], TravelMode::Driving, &opts)
            .expect("route");
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let c = GeoPoint::new(3.0, 3.0);
        router
            .route_leg(a, c, &[], TravelMode::Driving, &opts)
            .expect("route");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn no_route_is_not_cached() {
        let (router, calls) = counting_router();
        let a = GeoPoint::new(1.0, 1.0);
        let sink = GeoPoint::new(-1.0, 1.0);
        let opts = RouteOptions::default();

        for _ in 0..2 {
            let err = router
                .route_leg(a, sink, &[], TravelMode::Driving, &opts)
                .expect_err("should fail");
            assert!(matches!(err, RouteError::NoRoute));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn flag_changes_produce_distinct_keys() {
        let a = GeoPoint::new(1.0, 1.0);
        let b = GeoPoint::new(2.0, 2.0);
        let base = RouteOptions::default();
        let tolls = RouteOptions {
            avoid_tolls: true,
            ..base
        };
        let k1 = LegKey::new(a, b, &[], TravelMode::Driving, &base);
        let k2 = LegKey::new(a, b, &[], TravelMode::Driving, &tolls);
        assert!(k1 != k2);
    }
}
