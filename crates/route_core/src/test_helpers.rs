//! Test helpers for common test setup and utilities.
//!
//! Provides a scripted [`LegRouter`] so resolver and batch tests can
//! run deterministically without any live network dependency.

use std::sync::Mutex;

use crate::geo::GeoPoint;
use crate::request::{RouteOptions, RouteRequest, TravelMode};
use crate::routing::{LegRouter, RouteError, RouteLeg};

/// One scripted answer for the next leg query.
#[derive(Debug)]
pub enum ScriptedLeg {
    /// Return a leg with the given distance and duration.
    Ok { distance_m: f64, duration_secs: f64 },
    /// Signal "no route exists" for this leg.
    NoRoute,
    /// Fail with a generic remote error.
    Fail(String),
}

/// Record of one leg query the router received.
#[derive(Clone, Debug, PartialEq)]
pub struct LegCall {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub waypoints: Vec<GeoPoint>,
}

/// A [`LegRouter`] that replays a script of outcomes in order and
/// records every query it receives.
///
/// Once the script runs out, further queries return a fixed 1 km /
/// 60 s leg, so tests only need to script the interesting calls.
#[derive(Debug, Default)]
pub struct ScriptedLegRouter {
    script: Mutex<Vec<ScriptedLeg>>,
    calls: Mutex<Vec<LegCall>>,
}

impl ScriptedLegRouter {
    pub fn new(script: Vec<ScriptedLeg>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every leg query received so far, in order.
    pub fn calls(&self) -> Vec<LegCall> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl LegRouter for ScriptedLegRouter {
    fn route_leg(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        waypoints: &[GeoPoint],
        _mode: TravelMode,
        _options: &RouteOptions,
    ) -> Result<RouteLeg, RouteError> {
        self.calls.lock().expect("calls lock").push(LegCall {
            origin,
            destination,
            waypoints: waypoints.to_vec(),
        });

        let mut script = self.script.lock().expect("script lock");
        let next = if script.is_empty() {
            ScriptedLeg::Ok {
                distance_m: 1_000.0,
                duration_secs: 60.0,
            }
        } else {
            script.remove(0)
        };

        match next {
            ScriptedLeg::Ok {
                distance_m,
                duration_secs,
            } => Ok(RouteLeg {
                distance_m,
                duration_secs,
                polyline: String::new(),
                stop_count: waypoints.len() + 1,
            }),
            ScriptedLeg::NoRoute => Err(RouteError::NoRoute),
            ScriptedLeg::Fail(reason) => Err(RouteError::Api(reason)),
        }
    }
}

/// A simple request for tests: origin at (0, 0), destination at
/// (`n`, `n`), with `waypoints` evenly spread in between.
pub fn test_request(n: f64, waypoints: usize) -> RouteRequest {
    let step = n / (waypoints as f64 + 1.0);
    RouteRequest {
        origin: GeoPoint::new(0.0, 0.0),
        destination: GeoPoint::new(n, n),
        waypoints: (1..=waypoints)
            .map(|i| GeoPoint::new(step * i as f64, step * i as f64))
            .collect(),
    }
}
