//! Batch runner: drain a queue of route requests through the resolver,
//! throttling between requests and preserving partial results when the
//! remote service fails hard.

use std::collections::VecDeque;
use std::time::Duration;

use crate::request::{RouteOptions, RouteRequest, TravelMode};
use crate::resolver::{resolve_route, CompositeRoute};
use crate::routing::{LegRouter, RouteError};

/// Default pause between requests. An unconditional rate limit against
/// the remote service, not a backoff keyed to failures.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(400);

/// Batch runner configuration.
#[derive(Clone, Copy, Debug)]
pub struct BatchConfig {
    /// Pause applied after every processed request, resolved or
    /// skipped. Tests pass `Duration::ZERO`.
    pub throttle: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            throttle: DEFAULT_THROTTLE,
        }
    }
}

/// Outcome of one request inside a batch, handed to the progress hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    Resolved,
    /// The remote service found no route; the request is skipped.
    Skipped,
}

/// What a batch run produced: the routes resolved so far and, if the
/// run aborted, the error that stopped it.
#[derive(Debug)]
pub struct BatchReport {
    pub routes: Vec<CompositeRoute>,
    pub failure: Option<RouteError>,
}

impl BatchReport {
    /// True when the whole queue was drained without a fatal error.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Drain `queue` front to back, resolving each request in turn.
///
/// Requests resolve strictly one at a time, in queue order. A request
/// the service cannot route is skipped silently; any other remote
/// failure aborts the run immediately — the remaining queue entries
/// are dropped and the routes accumulated so far are returned together
/// with the error, for the caller to surface to the operator. `hook`
/// runs after each processed request (progress display), before the
/// throttle pause.
pub fn run_batch<F>(
    router: &dyn LegRouter,
    queue: &mut VecDeque<RouteRequest>,
    mode: TravelMode,
    options: &RouteOptions,
    config: &BatchConfig,
    mut hook: F,
) -> BatchReport
where
    F: FnMut(RequestOutcome),
{
    let mut routes = Vec::new();

    while let Some(request) = queue.pop_front() {
        match resolve_route(router, &request, mode, options) {
            Ok(Some(route)) => {
                routes.push(route);
                hook(RequestOutcome::Resolved);
            }
            Ok(None) => {
                // Sometimes there just isn't a route between two
                // sampled points; keep going.
                hook(RequestOutcome::Skipped);
            }
            Err(err) => {
                log::warn!(
                    "batch aborted with {} request(s) left: {}",
                    queue.len(),
                    err
                );
                return BatchReport {
                    routes,
                    failure: Some(err),
                };
            }
        }

        if !config.throttle.is_zero() {
            std::thread::sleep(config.throttle);
        }
    }

    BatchReport {
        routes,
        failure: None,
    }
}
