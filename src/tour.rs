//! Pre-authored walking tours from GPX 1.1 files.
//!
//! Wraps the `gpx` crate. A tour becomes a `NormalizedRoute` so it can be
//! followed with the same progress tracking as a computed route. The first
//! `<rte>` is used when present, otherwise the first `<trk>` with all its
//! segments flattened.

use std::io::Read;

use log::debug;

use crate::config::EngineConfig;
use crate::error::{RoutingError, RoutingResult};
use crate::geo::{distance, polyline_length, Coordinate};
use crate::instructions::waypoint_steps;
use crate::route::{NormalizedRoute, RouteSource};

/// Parse a GPX document from any reader into a tour route.
pub fn import_tour<R: Read>(reader: R, config: &EngineConfig) -> RoutingResult<NormalizedRoute> {
    let gpx = gpx::read(reader).map_err(|e| RoutingError::Tour(format!("GPX parse error: {e}")))?;

    // Route points carry names worth announcing; track points usually don't
    let (points, names): (Vec<Coordinate>, Vec<Option<String>>) = if let Some(route) = gpx.routes.first() {
        debug!("importing GPX route {:?} with {} points", route.name, route.points.len());
        route
            .points
            .iter()
            .map(|wp| (Coordinate::new(wp.point().y(), wp.point().x()), wp.name.clone()))
            .unzip()
    } else if let Some(track) = gpx.tracks.first() {
        debug!("importing GPX track {:?}", track.name);
        track
            .segments
            .iter()
            .flat_map(|seg| seg.points.iter())
            .map(|wp| (Coordinate::new(wp.point().y(), wp.point().x()), None))
            .unzip()
    } else {
        return Err(RoutingError::Tour("GPX file has no routes or tracks".to_string()));
    };

    if points.len() < 2 {
        return Err(RoutingError::Tour(format!("tour has {} points", points.len())));
    }

    let distance_m = polyline_length(&points);
    let mut legs_m = Vec::with_capacity(points.len());
    legs_m.push(0.0);
    legs_m.extend(points.windows(2).map(|w| distance(w[0], w[1])));

    let steps = if names.iter().any(Option::is_some) {
        let name_refs: Vec<Option<&str>> = names.iter().map(|n| n.as_deref()).collect();
        waypoint_steps(&name_refs, &legs_m, config)
    } else {
        // Unnamed track points would make one step per GPS fix
        waypoint_steps(&[None, None], &[0.0, distance_m], config)
    };

    Ok(NormalizedRoute {
        geometry: points,
        distance_m,
        duration_s: config.walking_duration_s(distance_m),
        steps,
        source: RouteSource::Imported,
    })
}
