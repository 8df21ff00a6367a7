//! Blocking HTTP binding to the Google Directions JSON API.
//!
//! Wraps a reqwest blocking client and exposes only what the resolver
//! needs: one leg query in, one [`RouteLeg`] out, with the service's
//! `ZERO_RESULTS` status mapped to [`RouteError::NoRoute`] so the
//! caller can tell "no route exists" apart from real failures.

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

use crate::geo::GeoPoint;
use crate::request::{RouteOptions, TravelMode};
use crate::routing::{LegRouter, RouteError, RouteLeg};

const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/directions/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the Directions web service.
#[derive(Debug, Clone)]
pub struct GoogleDirectionsClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleDirectionsClient {
    /// Create a client against the production endpoint.
    pub fn new(api_key: &str) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint (local stub, proxy).
    pub fn with_endpoint(api_key: &str, endpoint: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build directions client");
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn build_url(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        waypoints: &[GeoPoint],
        mode: TravelMode,
        options: &RouteOptions,
    ) -> Result<Url, RouteError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|err| RouteError::Api(format!("failed to build directions URL: {}", err)))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("origin", &format_point(origin))
                .append_pair("destination", &format_point(destination))
                .append_pair("mode", mode.as_str());

            if !waypoints.is_empty() {
                query.append_pair(
                    "waypoints",
                    &encode_waypoints(waypoints, options.optimize_waypoints),
                );
            }

            match (options.avoid_tolls, options.avoid_highways) {
                (true, true) => {
                    query.append_pair("avoid", "tolls|highways");
                }
                (true, false) => {
                    query.append_pair("avoid", "tolls");
                }
                (false, true) => {
                    query.append_pair("avoid", "highways");
                }
                (false, false) => {}
            }

            query.append_pair("key", &self.api_key);
        }
        Ok(url)
    }
}

impl LegRouter for GoogleDirectionsClient {
    fn route_leg(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        waypoints: &[GeoPoint],
        mode: TravelMode,
        options: &RouteOptions,
    ) -> Result<RouteLeg, RouteError> {
        let url = self.build_url(origin, destination, waypoints, mode, options)?;
        log::debug!(
            "directions request: {} waypoints, mode {}",
            waypoints.len(),
            mode.as_str()
        );

        let response = self.client.get(url).send().map_err(RouteError::Http)?;
        let parsed: DirectionsResponse = response.json().map_err(RouteError::Json)?;
        parse_directions_response(parsed)
    }
}

fn format_point(point: GeoPoint) -> String {
    format!("{},{}", point.lat, point.lng)
}

/// `lat,lng|lat,lng|…`, with the `optimize:true|` prefix when in-leg
/// waypoint optimization is requested. All waypoints are stopovers.
fn encode_waypoints(waypoints: &[GeoPoint], optimize: bool) -> String {
    let joined = waypoints
        .iter()
        .map(|p| format_point(*p))
        .collect::<Vec<_>>()
        .join("|");
    if optimize {
        format!("optimize:true|{}", joined)
    } else {
        joined
    }
}

// Minimal Directions JSON response structures.

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    routes: Option<Vec<DirectionsRoute>>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
    overview_polyline: Option<Polyline>,
}

#[derive(Deserialize)]
struct DirectionsLeg {
    distance: ValueField,
    duration: ValueField,
}

#[derive(Deserialize)]
struct ValueField {
    value: f64,
}

#[derive(Deserialize)]
struct Polyline {
    points: String,
}

fn parse_directions_response(resp: DirectionsResponse) -> Result<RouteLeg, RouteError> {
    match resp.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Err(RouteError::NoRoute),
        status => {
            let detail = match resp.error_message {
                Some(msg) => format!("{}: {}", status, msg),
                None => status.to_string(),
            };
            return Err(RouteError::Api(detail));
        }
    }

    let route = resp
        .routes
        .and_then(|routes| routes.into_iter().next())
        .ok_or(RouteError::NoRoute)?;

    let distance_m = route.legs.iter().map(|l| l.distance.value).sum();
    let duration_secs = route.legs.iter().map(|l| l.duration.value).sum();

    Ok(RouteLeg {
        distance_m,
        duration_secs,
        polyline: route
            .overview_polyline
            .map(|p| p.points)
            .unwrap_or_default(),
        stop_count: route.legs.len(),
    })
}
