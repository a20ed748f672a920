//! Routes over the facility's own path network.
//!
//! Both endpoints are snapped to their nearest node, the nodes are joined
//! by the shortest path, and the literal endpoints are stitched back on so
//! the drawn route starts and ends exactly where the visitor asked.

use crate::error::{RoutingError, RoutingResult};
use crate::geo::{distance, Coordinate};
use crate::graph::{build_graph, nearest_node, shortest_path, RoadEdge, RoadNode};

/// A path through the network between two arbitrary coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalRoute {
    /// Start coordinate, every traversed node, then the end coordinate.
    pub geometry: Vec<Coordinate>,
    /// Traversed nodes in travel order.
    pub nodes: Vec<RoadNode>,
    /// `legs_m[i]` is the distance walked to reach `nodes[i]`; the last
    /// leg also includes the walk from the last node to the end point.
    pub legs_m: Vec<f64>,
    pub distance_m: f64,
}

/// Route from `start` to `end` through the network.
pub fn resolve_internal_route(
    start: Coordinate,
    end: Coordinate,
    nodes: &[RoadNode],
    edges: &[RoadEdge],
) -> RoutingResult<InternalRoute> {
    let graph = build_graph(nodes, edges);

    let (start_node, start_snap) = nearest_node(start, nodes).ok_or(RoutingError::NoNodes)?;
    let (end_node, end_snap) = nearest_node(end, nodes).ok_or(RoutingError::NoNodes)?;

    let path = shortest_path(&graph, &start_node.id, &end_node.id)?;

    let path_nodes: Vec<RoadNode> = path
        .nodes
        .iter()
        .filter_map(|id| nodes.iter().find(|n| &n.id == id).cloned())
        .collect();

    let mut geometry = Vec::with_capacity(path_nodes.len() + 2);
    geometry.push(start);
    geometry.extend(path_nodes.iter().map(|n| n.coordinate));
    geometry.push(end);

    let mut legs_m: Vec<f64> = path
        .cumulative_m
        .iter()
        .scan(0.0, |prev, &cum| {
            let leg = cum - *prev;
            *prev = cum;
            Some(leg)
        })
        .collect();
    if let Some(first) = legs_m.first_mut() {
        *first += start_snap;
    }
    if let Some(last) = legs_m.last_mut() {
        *last += end_snap;
    }

    Ok(InternalRoute {
        geometry,
        nodes: path_nodes,
        legs_m,
        distance_m: path.length_m + start_snap + end_snap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    fn node(id: &str, lat: f64, lon: f64) -> RoadNode {
        RoadNode {
            id: id.to_string(),
            coordinate: Coordinate::new(lat, lon),
            name: None,
            kind: NodeKind::Gate,
        }
    }

    fn edge(from: &str, to: &str, distance: f64) -> RoadEdge {
        RoadEdge {
            id: format!("{from}-{to}"),
            from: from.to_string(),
            to: to.to_string(),
            distance: Some(distance),
            bidirectional: true,
            kind: None,
        }
    }

    #[test]
    fn snapping_segments_are_added() {
        let nodes = vec![node("A", 10.0, 20.0), node("B", 10.0, 21.0)];
        let edges = vec![edge("A", "B", 1000.0)];
        let start = Coordinate::new(10.0, 20.0001);
        let end = Coordinate::new(10.0, 20.9999);

        let route = resolve_internal_route(start, end, &nodes, &edges).unwrap();
        assert!((route.distance_m - 1000.0).abs() < 25.0,
            "Expected ~1000 m, got {:.1} m", route.distance_m);
        assert!(route.distance_m > 1000.0);
        assert_eq!(route.geometry.first(), Some(&start));
        assert_eq!(route.geometry.last(), Some(&end));
        assert_eq!(route.geometry.len(), 4);
    }

    #[test]
    fn legs_sum_to_total() {
        let nodes = vec![node("A", 0.0, 0.0), node("B", 0.0, 0.001), node("C", 0.0, 0.002)];
        let edges = vec![edge("A", "B", 110.0), edge("B", "C", 115.0)];
        let route = resolve_internal_route(
            Coordinate::new(0.0001, 0.0),
            Coordinate::new(0.0001, 0.002),
            &nodes,
            &edges,
        )
        .unwrap();

        let ids: Vec<_> = route.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(route.legs_m.len(), 3);
        let sum: f64 = route.legs_m.iter().sum();
        assert!((sum - route.distance_m).abs() < 1e-6);
        assert!((route.legs_m[1] - 110.0).abs() < 1e-9);
    }

    #[test]
    fn empty_network_fails() {
        let result = resolve_internal_route(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0), &[], &[]);
        assert!(matches!(result, Err(RoutingError::NoNodes)));
    }

    #[test]
    fn unreachable_fails() {
        let nodes = vec![node("A", 0.0, 0.0), node("B", 0.0, 0.01)];
        let result = resolve_internal_route(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01), &nodes, &[]);
        assert!(matches!(result, Err(RoutingError::NoPath { .. })));
    }
}
