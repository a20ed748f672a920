//! Normalized route returned to the app, whatever produced it.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Where a route came from. Only used for labeling in the UI
/// ("approximate route" and similar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteSource {
    External,
    InternalGraph,
    StraightLine,
    Imported,
}

/// One instruction with the distance and time it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance_m: f64,
    pub duration_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRoute {
    /// Path to draw and walk, in travel order.
    pub geometry: Vec<Coordinate>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub steps: Vec<RouteStep>,
    pub source: RouteSource,
}
