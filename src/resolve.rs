//! Route resolution with degraded fallbacks.
//!
//! Sources are tried in order: external provider, internal path network,
//! straight line. The last one cannot fail, so resolution always yields a
//! route; the `source` tag tells the UI how much to trust it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::RoutingResult;
use crate::geo::{distance, Coordinate};
use crate::graph::{RoadEdge, RoadNode};
use crate::instructions::{straight_line_steps, waypoint_steps};
use crate::internal::resolve_internal_route;
use crate::osrm::{OsrmClient, RouteProvider};
use crate::progress::{track_progress, ProgressSnapshot};
use crate::route::{NormalizedRoute, RouteSource};

/// Resolve a route from `start` to `end`, degrading rather than failing.
pub fn resolve_route(
    start: Coordinate,
    end: Coordinate,
    nodes: &[RoadNode],
    edges: &[RoadEdge],
    provider: Option<&dyn RouteProvider>,
    config: &EngineConfig,
) -> NormalizedRoute {
    if let Some(provider) = provider {
        match provider.route(start, end) {
            Ok(route) => {
                debug!("external route: {:.0} m, {} steps", route.distance_m, route.steps.len());
                return route;
            }
            Err(err) => warn!("external route unavailable, falling back: {err}"),
        }
    }

    if !nodes.is_empty() && !edges.is_empty() {
        match graph_route(start, end, nodes, edges, config) {
            Ok(route) => {
                info!("using internal graph route: {:.0} m", route.distance_m);
                return route;
            }
            Err(err) => warn!("internal route unavailable, falling back: {err}"),
        }
    }

    info!("using straight-line route");
    straight_line_route(start, end, config)
}

fn graph_route(
    start: Coordinate,
    end: Coordinate,
    nodes: &[RoadNode],
    edges: &[RoadEdge],
    config: &EngineConfig,
) -> RoutingResult<NormalizedRoute> {
    let route = resolve_internal_route(start, end, nodes, edges)?;
    let names: Vec<Option<&str>> = route.nodes.iter().map(|n| n.name.as_deref()).collect();

    Ok(NormalizedRoute {
        steps: waypoint_steps(&names, &route.legs_m, config),
        duration_s: config.walking_duration_s(route.distance_m),
        distance_m: route.distance_m,
        geometry: route.geometry,
        source: RouteSource::InternalGraph,
    })
}

/// Two-point route straight from `start` to `end`.
pub fn straight_line_route(start: Coordinate, end: Coordinate, config: &EngineConfig) -> NormalizedRoute {
    let distance_m = distance(start, end);
    NormalizedRoute {
        geometry: vec![start, end],
        distance_m,
        duration_s: config.walking_duration_s(distance_m),
        steps: straight_line_steps(start, end, distance_m, config),
        source: RouteSource::StraightLine,
    }
}

/// Configured routing engine: owns the provider client, if any.
#[derive(Debug)]
pub struct RouteEngine {
    config: EngineConfig,
    provider: Option<OsrmClient>,
}

impl RouteEngine {
    /// Build an engine. Fails only if the HTTP client cannot be created.
    pub fn new(config: EngineConfig) -> RoutingResult<Self> {
        let provider = match config.provider_endpoint.as_deref() {
            Some(endpoint) => Some(OsrmClient::new(endpoint, &config)?),
            None => None,
        };
        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolve_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        nodes: &[RoadNode],
        edges: &[RoadEdge],
    ) -> NormalizedRoute {
        let provider = self.provider.as_ref().map(|p| p as &dyn RouteProvider);
        resolve_route(start, end, nodes, edges, provider, &self.config)
    }

    pub fn track_progress(&self, position: Coordinate, route: &NormalizedRoute) -> ProgressSnapshot {
        track_progress(position, route)
    }
}

/// Generation counter for superseding in-flight route requests.
///
/// Each [`begin`](Self::begin) invalidates every ticket handed out before
/// it, so a slow provider reply for an old destination is discarded.
#[derive(Debug, Clone, Default)]
pub struct RouteRequests {
    generation: Arc<AtomicU64>,
}

impl RouteRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            generation,
            counter: Arc::clone(&self.generation),
        }
    }
}

#[derive(Debug)]
pub struct RequestTicket {
    generation: u64,
    counter: Arc<AtomicU64>,
}

impl RequestTicket {
    /// `true` while no newer request has been started.
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.generation
    }

    /// Pass `value` through only if this ticket is still current.
    pub fn accept<T>(&self, value: T) -> Option<T> {
        if self.is_current() {
            Some(value)
        } else {
            debug!("discarding result of superseded request {}", self.generation);
            None
        }
    }
}
