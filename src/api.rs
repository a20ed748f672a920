//! JSON request/response layer.
//!
//! The Android app talks to the engine in JSON strings; this module keeps
//! that contract testable without a JVM. Every function returns a JSON
//! document, with failures reported as `{"error": "..."}`.

use log::error;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{RoutingError, RoutingResult};
use crate::geo::Coordinate;
use crate::graph::{RoadEdge, RoadNode};
use crate::progress::{track_progress, ProgressSnapshot};
use crate::resolve::RouteEngine;
use crate::route::NormalizedRoute;
use crate::tour::import_tour;

const DEFAULT_OFF_ROUTE_M: f64 = 30.0;

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    #[serde(default)]
    pub nodes: Vec<RoadNode>,
    #[serde(default)]
    pub edges: Vec<RoadEdge>,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub position: Coordinate,
    pub route: NormalizedRoute,
    #[serde(default = "default_off_route_m")]
    pub off_route_threshold_m: f64,
}

fn default_off_route_m() -> f64 {
    DEFAULT_OFF_ROUTE_M
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub progress: ProgressSnapshot,
    pub off_route: bool,
}

/// Resolve a route from a [`ResolveRequest`] document.
pub fn resolve_route_json(request: &str) -> String {
    respond(resolve(request))
}

fn resolve(request: &str) -> RoutingResult<NormalizedRoute> {
    let req: ResolveRequest = serde_json::from_str(request)?;
    let engine = RouteEngine::new(req.config)?;
    Ok(engine.resolve_route(req.start, req.end, &req.nodes, &req.edges))
}

/// Track progress from a [`ProgressRequest`] document.
pub fn track_progress_json(request: &str) -> String {
    respond(progress(request))
}

fn progress(request: &str) -> RoutingResult<ProgressResponse> {
    let req: ProgressRequest = serde_json::from_str(request)?;
    let progress = track_progress(req.position, &req.route);
    Ok(ProgressResponse {
        off_route: progress.is_off_route(req.off_route_threshold_m),
        progress,
    })
}

/// Import a GPX tour. `config` is an [`EngineConfig`] JSON object.
pub fn import_tour_json(gpx: &str, config: &str) -> String {
    respond(EngineConfig::from_json(config).and_then(|config| import_tour(gpx.as_bytes(), &config)))
}

fn respond<T: Serialize>(result: RoutingResult<T>) -> String {
    match result.and_then(|value| Ok(serde_json::to_string(&value)?)) {
        Ok(json) => json,
        Err(err) => error_json(&err),
    }
}

fn error_json(err: &RoutingError) -> String {
    error!("request failed: {err}");
    serde_json::json!({ "error": err.to_string() }).to_string()
}
