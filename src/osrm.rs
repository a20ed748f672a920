//! External walking-directions provider.
//!
//! Talks to an OSRM-compatible `/route/v1` endpoint: one GET per route,
//! full GeoJSON geometry and per-step maneuvers. Any failure is returned as
//! an error so the caller can fall back to a lower-quality source; there
//! are no retries.

use std::time::Duration;

use log::debug;
use reqwest::{blocking::Client, Url};
use serde::Deserialize;

use crate::config::EngineConfig;
use crate::error::{RoutingError, RoutingResult};
use crate::geo::Coordinate;
use crate::instructions::{maneuver_instruction, Maneuver};
use crate::route::{NormalizedRoute, RouteSource, RouteStep};

/// A source of routes between two coordinates.
///
/// Implementations must be `Send + Sync` so one provider can serve
/// requests from several threads.
pub trait RouteProvider: Send + Sync {
    fn route(&self, start: Coordinate, end: Coordinate) -> RoutingResult<NormalizedRoute>;
}

/// Thin blocking HTTP client for an OSRM-style directions service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: Client,
    endpoint: String,
    config: EngineConfig,
}

impl OsrmClient {
    /// Create a client for `endpoint` (e.g. `http://localhost:5000`).
    pub fn new(endpoint: &str, config: &EngineConfig) -> RoutingResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            config: config.clone(),
        })
    }

    fn route_url(&self, start: Coordinate, end: Coordinate) -> RoutingResult<Url> {
        let base = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}",
            self.endpoint,
            self.config.profile.as_path(),
            start.lon,
            start.lat,
            end.lon,
            end.lat,
        );
        let mut url = Url::parse(&base)
            .map_err(|err| RoutingError::InvalidResponse(format!("failed to build URL: {err}")))?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson")
            .append_pair("steps", "true");
        Ok(url)
    }
}

impl RouteProvider for OsrmClient {
    fn route(&self, start: Coordinate, end: Coordinate) -> RoutingResult<NormalizedRoute> {
        let url = self.route_url(start, end)?;
        debug!("requesting route: {url}");

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::ProviderStatus(status.to_string()));
        }

        let parsed: OsrmRouteResponse = response.json()?;
        parse_route_response(parsed, &self.config)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: Option<f64>,
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<Vec<f64>>, // [lon, lat]
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    distance: f64,
    duration: Option<f64>,
    name: Option<String>,
    maneuver: OsrmManeuver,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,
    modifier: Option<String>,
    bearing_after: Option<f64>,
    exit: Option<u32>,
}

fn parse_route_response(resp: OsrmRouteResponse, config: &EngineConfig) -> RoutingResult<NormalizedRoute> {
    if resp.code != "Ok" {
        return Err(RoutingError::ProviderStatus(resp.code));
    }

    let route = resp.routes.into_iter().next().ok_or(RoutingError::EmptyRoute)?;

    // OSRM returns [lon, lat]
    let geometry: Vec<Coordinate> = route
        .geometry
        .coordinates
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| Coordinate::new(c[1], c[0]))
        .collect();
    if geometry.len() < 2 {
        return Err(RoutingError::InvalidResponse(format!(
            "route geometry has {} points",
            geometry.len()
        )));
    }

    let steps = route
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .filter(|step| step.distance >= config.min_step_distance_m)
        .map(|step| {
            let maneuver = Maneuver {
                kind: &step.maneuver.kind,
                modifier: step.maneuver.modifier.as_deref(),
                bearing_after: step.maneuver.bearing_after,
                exit: step.maneuver.exit,
                street: step.name.as_deref(),
            };
            RouteStep {
                instruction: maneuver_instruction(&maneuver, config.language),
                distance_m: step.distance,
                duration_s: step
                    .duration
                    .unwrap_or_else(|| config.walking_duration_s(step.distance)),
            }
        })
        .collect();

    Ok(NormalizedRoute {
        geometry,
        distance_m: route.distance.max(0.0),
        duration_s: route
            .duration
            .unwrap_or_else(|| config.walking_duration_s(route.distance)),
        steps,
        source: RouteSource::External,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REPLY: &str = r#"{
      "code": "Ok",
      "routes": [{
        "distance": 412.6,
        "duration": 297.1,
        "geometry": {"type": "LineString", "coordinates": [[44.8000, 41.7000], [44.8010, 41.7005], [44.8040, 41.7010]]},
        "legs": [{
          "steps": [
            {"distance": 120.0, "duration": 86.0, "name": "Rose Alley",
             "maneuver": {"type": "depart", "bearing_after": 88, "location": [44.8, 41.7]}},
            {"distance": 3.2, "duration": 2.0, "name": "",
             "maneuver": {"type": "turn", "modifier": "left"}},
            {"distance": 289.4, "duration": 209.1, "name": "Lake Path",
             "maneuver": {"type": "turn", "modifier": "slight right"}},
            {"distance": 0.0, "duration": 0.0, "name": "Lake Path",
             "maneuver": {"type": "arrive"}}
          ]
        }]
      }]
    }"#;

    fn client() -> OsrmClient {
        OsrmClient::new("http://localhost:5000/", &EngineConfig::default()).unwrap()
    }

    fn parse(json: &str) -> RoutingResult<NormalizedRoute> {
        let resp: OsrmRouteResponse = serde_json::from_str(json).unwrap();
        parse_route_response(resp, &EngineConfig::default())
    }

    #[test]
    fn url_has_lon_lat_order_and_flags() {
        let url = client()
            .route_url(Coordinate::new(41.7, 44.8), Coordinate::new(41.71, 44.81))
            .unwrap();
        let s = url.as_str();
        assert!(s.starts_with("http://localhost:5000/route/v1/foot/44.800000,41.700000;44.810000,41.710000?"),
            "unexpected url {s}");
        assert!(s.contains("overview=full"));
        assert!(s.contains("geometries=geojson"));
        assert!(s.contains("steps=true"));
    }

    #[test]
    fn parses_geometry_and_totals() {
        let route = parse(SAMPLE_REPLY).unwrap();
        assert_eq!(route.source, RouteSource::External);
        assert_eq!(route.geometry.len(), 3);
        assert_eq!(route.geometry[0], Coordinate::new(41.7, 44.8));
        assert_eq!(route.distance_m, 412.6);
        assert_eq!(route.duration_s, 297.1);
    }

    #[test]
    fn short_steps_are_dropped() {
        let route = parse(SAMPLE_REPLY).unwrap();
        let text: Vec<_> = route.steps.iter().map(|s| s.instruction.as_str()).collect();
        assert_eq!(text, vec!["Head east on Rose Alley", "Keep slightly right onto Lake Path"]);
    }

    #[test]
    fn missing_duration_is_estimated() {
        let json = r#"{"code": "Ok", "routes": [{"distance": 800.0,
            "geometry": {"coordinates": [[0.0, 0.0], [0.01, 0.0]]}}]}"#;
        let route = parse(json).unwrap();
        assert!((route.duration_s - 600.0).abs() < 1e-9);
        assert!(route.steps.is_empty());
    }

    #[test]
    fn non_ok_code_is_an_error() {
        let result = parse(r#"{"code": "NoRoute", "routes": []}"#);
        assert!(matches!(result, Err(RoutingError::ProviderStatus(code)) if code == "NoRoute"));
    }

    #[test]
    fn empty_route_list_is_an_error() {
        assert!(matches!(parse(r#"{"code": "Ok"}"#), Err(RoutingError::EmptyRoute)));
    }

    #[test]
    fn degenerate_geometry_is_an_error() {
        let json = r#"{"code": "Ok", "routes": [{"distance": 0.0,
            "geometry": {"coordinates": [[0.0, 0.0]]}}]}"#;
        assert!(matches!(parse(json), Err(RoutingError::InvalidResponse(_))));
    }

    #[test]
    fn unreachable_service_is_an_error() {
        let config = EngineConfig {
            timeout_ms: 500,
            ..EngineConfig::default()
        };
        // Port 9 (discard) is closed on test hosts
        let client = OsrmClient::new("http://127.0.0.1:9", &config).unwrap();
        let result = client.route(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01));
        assert!(matches!(result, Err(RoutingError::Http(_))));
    }
}
