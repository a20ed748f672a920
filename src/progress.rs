//! Live progress along an active route.
//!
//! Every position sample is evaluated from scratch against the route
//! geometry. There is no cursor state, so GPS jumps and detours need no
//! re-synchronisation.

use serde::Serialize;

use crate::geo::{distance, polyline_length, Coordinate};
use crate::route::NormalizedRoute;

/// Where a live position sits on the route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    /// Index of the geometry vertex closest to the position.
    pub closest_index: usize,
    /// Distance from the position to that vertex, in meters.
    pub deviation_m: f64,
    /// Geometry length from the closest vertex to the end, in meters.
    pub remaining_m: f64,
    /// 0 to 100.
    pub percent_complete: f64,
    /// Index into the route's steps.
    pub current_step: usize,
}

impl ProgressSnapshot {
    /// Neutral snapshot for a route with no usable geometry.
    fn empty() -> Self {
        Self {
            closest_index: 0,
            deviation_m: 0.0,
            remaining_m: 0.0,
            percent_complete: 0.0,
            current_step: 0,
        }
    }

    pub fn is_off_route(&self, threshold_m: f64) -> bool {
        self.deviation_m > threshold_m
    }
}

/// Compute progress of `position` along `route`.
///
/// O(n) in the number of geometry vertices. Sparse samples make the
/// deviation and step index coarser but never invalid.
pub fn track_progress(position: Coordinate, route: &NormalizedRoute) -> ProgressSnapshot {
    let geometry = &route.geometry;
    if geometry.is_empty() {
        return ProgressSnapshot::empty();
    }

    let mut closest_index = 0;
    let mut deviation_m = f64::INFINITY;
    for (i, vertex) in geometry.iter().enumerate() {
        let d = distance(position, *vertex);
        if d < deviation_m {
            deviation_m = d;
            closest_index = i;
        }
    }

    let remaining_m = polyline_length(&geometry[closest_index..]);
    let total_m = polyline_length(geometry);

    let percent_complete = if total_m > 0.0 {
        ((total_m - remaining_m) / total_m * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    ProgressSnapshot {
        closest_index,
        deviation_m,
        remaining_m,
        percent_complete,
        current_step: current_step(route, percent_complete),
    }
}

/// First step whose cumulative distance reaches the completed share of
/// the route, or the last step if none does.
fn current_step(route: &NormalizedRoute, percent_complete: f64) -> usize {
    let target = route.distance_m * percent_complete / 100.0;
    let mut covered = 0.0;

    for (i, step) in route.steps.iter().enumerate() {
        covered += step.distance_m;
        if covered >= target {
            return i;
        }
    }

    route.steps.len().saturating_sub(1)
}
