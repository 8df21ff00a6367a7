//! Operator CLI: pick a metro and a strategy, generate a random batch
//! of route requests, resolve them against the Directions service, and
//! export the results.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use route_core::batch::{run_batch, BatchConfig, RequestOutcome};
use route_core::export::{export_metrics_csv, export_requests_json, summarize};
use route_core::region::{builtin_metros, find_metro, seeded_rng};
use route_core::request::{Strategy, TravelMode, MAX_WAYPOINTS_PER_LEG};
use route_core::routing::google::GoogleDirectionsClient;
use route_core::routing::{CachedLegRouter, LegRouter};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "route-batch",
    about = "Batch route resolution over randomly sampled metro trips"
)]
struct Cli {
    /// Metro region to sample trips in
    #[arg(long, default_value = "san-francisco")]
    metro: String,

    /// Resolution strategy (chunked, chunked-proximity, chunked-in-leg)
    #[arg(long, default_value = "chunked")]
    strategy: String,

    /// Number of route requests to generate
    #[arg(long, default_value_t = 10)]
    routes: usize,

    /// Intermediate waypoints per request
    #[arg(long, default_value_t = 8)]
    waypoints: usize,

    /// Maximum waypoints per remote sub-request
    #[arg(long, default_value_t = 10)]
    chunk_size: usize,

    /// RNG seed for reproducible batches
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Pause between requests in milliseconds
    #[arg(long, default_value_t = 400)]
    throttle_ms: u64,

    /// Directions API key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY")]
    api_key: String,

    /// Override the Directions endpoint (local stub, proxy)
    #[arg(long)]
    endpoint: Option<String>,

    /// Write per-route metrics to this CSV file
    #[arg(long)]
    out_csv: Option<PathBuf>,

    /// Write the generated request batch to this JSON file
    #[arg(long)]
    out_requests: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let metro = find_metro(&cli.metro).ok_or_else(|| {
        let known = builtin_metros()
            .iter()
            .map(|m| m.key.clone())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("unknown metro '{}' (known: {})", cli.metro, known)
    })?;

    let strategy = Strategy::from_key(&cli.strategy).ok_or_else(|| {
        let known = Strategy::all()
            .iter()
            .map(|s| s.key())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("unknown strategy '{}' (known: {})", cli.strategy, known)
    })?;

    if cli.chunk_size > MAX_WAYPOINTS_PER_LEG {
        bail!(
            "chunk size {} exceeds the service limit of {} waypoints per request",
            cli.chunk_size,
            MAX_WAYPOINTS_PER_LEG
        );
    }
    let chunk_size = NonZeroUsize::new(cli.chunk_size)
        .ok_or_else(|| anyhow!("chunk size must be greater than zero"))?;
    let options = strategy.options(chunk_size);

    let mut rng = seeded_rng(cli.seed);
    let requests = metro.sample_requests(&mut rng, cli.routes, cli.waypoints);
    log::info!(
        "generated {} request(s) with {} waypoint(s) each in {}",
        requests.len(),
        cli.waypoints,
        metro.label
    );

    if let Some(path) = &cli.out_requests {
        export_requests_json(path, &requests)
            .with_context(|| format!("writing requests to {}", path.display()))?;
        println!("wrote {} request(s) to {}", requests.len(), path.display());
    }

    let client = match &cli.endpoint {
        Some(endpoint) => GoogleDirectionsClient::with_endpoint(&cli.api_key, endpoint),
        None => GoogleDirectionsClient::new(&cli.api_key),
    };
    let router = CachedLegRouter::new(Box::new(client));

    let report = run_throttled(&router, requests, &cli, options);

    let metrics = summarize(&report.routes);
    if let Some(path) = &cli.out_csv {
        export_metrics_csv(path, &metrics)
            .with_context(|| format!("writing metrics to {}", path.display()))?;
        println!("wrote {} route(s) to {}", metrics.len(), path.display());
    }

    print_summary(&report.routes);

    if let Some(err) = report.failure {
        bail!("batch aborted after {} route(s): {}", metrics.len(), err);
    }
    Ok(())
}

fn run_throttled(
    router: &dyn LegRouter,
    requests: Vec<route_core::request::RouteRequest>,
    cli: &Cli,
    options: route_core::request::RouteOptions,
) -> route_core::batch::BatchReport {
    let mut queue: VecDeque<_> = requests.into();
    let config = BatchConfig {
        throttle: Duration::from_millis(cli.throttle_ms),
    };

    let bar = ProgressBar::new(queue.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    let mut skipped = 0usize;
    let report = run_batch(
        router,
        &mut queue,
        TravelMode::Driving,
        &options,
        &config,
        |outcome| {
            if outcome == RequestOutcome::Skipped {
                skipped += 1;
                bar.set_message(format!("{} skipped", skipped));
            }
            bar.inc(1);
        },
    );
    bar.finish_and_clear();

    if skipped > 0 {
        println!("{} request(s) had no route and were skipped", skipped);
    }
    report
}

fn print_summary(routes: &[route_core::resolver::CompositeRoute]) {
    if routes.is_empty() {
        println!("no routes resolved");
        return;
    }
    let total_km: f64 = routes.iter().map(|r| r.total_distance_m()).sum::<f64>() / 1000.0;
    let total_hours: f64 = routes
        .iter()
        .map(|r| r.total_duration_secs())
        .sum::<f64>()
        / 3600.0;
    let mean_latency_ms =
        routes.iter().map(|r| r.total_compute_time_ms).sum::<u64>() / routes.len() as u64;
    println!(
        "resolved {} route(s): {:.1} km, {:.1} h driving, {} ms mean resolution latency",
        routes.len(),
        total_km,
        total_hours,
        mean_latency_ms
    );
}
