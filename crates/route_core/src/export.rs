//! Result export: per-route metrics for charting plus CSV and JSON
//! writers.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::request::RouteRequest;
use crate::resolver::CompositeRoute;

/// Chartable summary of one resolved route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Wall-clock resolution time in milliseconds.
    pub latency_ms: u64,
    /// Total travel time in seconds.
    pub duration_secs: f64,
    /// Total road distance in metres.
    pub distance_m: f64,
    /// Number of legs the route was stitched from.
    pub leg_count: usize,
}

/// Derive metrics for every resolved route, in batch order.
pub fn summarize(routes: &[CompositeRoute]) -> Vec<RouteMetrics> {
    routes
        .iter()
        .map(|route| RouteMetrics {
            latency_ms: route.total_compute_time_ms,
            duration_secs: route.total_duration_secs(),
            distance_m: route.total_distance_m(),
            leg_count: route.legs.len(),
        })
        .collect()
}

/// Write route metrics to a CSV file, one row per route.
pub fn export_metrics_csv(path: &Path, metrics: &[RouteMetrics]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for row in metrics {
        wtr.serialize(row).map_err(io::Error::other)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the generated request batch as JSON, mirroring the original
/// tool's route download.
pub fn export_requests_json(path: &Path, requests: &[RouteRequest]) -> io::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, requests).map_err(io::Error::other)
}
