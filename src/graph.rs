//! Walkable path network: graph construction, node snapping and
//! shortest paths.
//!
//! Nodes and edges come from the facility's editing tool and are only read
//! here. The adjacency structure is rebuilt for every request; it is cheap
//! for park-sized networks (hundreds of nodes) and avoids any sync state.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{RoutingError, RoutingResult};
use crate::geo::{distance, Coordinate};

/// Category of a network node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Gate,
    #[default]
    Intersection,
    Landmark,
    Endpoint,
}

/// Category of a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Main,
    Secondary,
}

/// A point in the walkable network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadNode {
    pub id: String,
    pub coordinate: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: NodeKind,
}

/// A walkable segment between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Precomputed length in meters. Authoritative when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EdgeKind>,
}

fn default_bidirectional() -> bool {
    true
}

impl RoadEdge {
    /// Edge length used as the graph weight.
    ///
    /// Missing, negative or non-finite lengths become 0. The editing tool
    /// always stores a length, so this only triggers on broken data.
    pub fn length_m(&self) -> f64 {
        match self.distance {
            Some(d) if d.is_finite() && d >= 0.0 => d,
            _ => 0.0,
        }
    }
}

/// Adjacency list keyed by node id, stored densely by node index.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Neighbors of `id` with edge lengths, in edge insertion order.
    /// Returns None for unknown ids.
    pub fn neighbors(&self, id: &str) -> Option<impl Iterator<Item = (&str, f64)> + '_> {
        let idx = *self.index.get(id)?;
        Some(
            self.adjacency[idx]
                .iter()
                .map(|&(n, len)| (self.ids[n].as_str(), len)),
        )
    }
}

/// Build the adjacency structure from node and edge lists.
///
/// Every node starts with an empty neighbor list. Each edge adds a forward
/// entry, and bidirectional edges also add the reverse entry. Edges that
/// reference unknown nodes are skipped. Duplicate node ids keep the first
/// occurrence.
pub fn build_graph(nodes: &[RoadNode], edges: &[RoadEdge]) -> Graph {
    let mut graph = Graph {
        ids: Vec::with_capacity(nodes.len()),
        index: HashMap::with_capacity(nodes.len()),
        adjacency: Vec::with_capacity(nodes.len()),
    };

    for node in nodes {
        if graph.index.contains_key(&node.id) {
            continue;
        }
        graph.index.insert(node.id.clone(), graph.ids.len());
        graph.ids.push(node.id.clone());
        graph.adjacency.push(Vec::new());
    }

    for edge in edges {
        let (Some(&from), Some(&to)) = (graph.index.get(&edge.from), graph.index.get(&edge.to))
        else {
            warn!("skipping edge {}: unknown endpoint {} -> {}", edge.id, edge.from, edge.to);
            continue;
        };
        if edge.distance.is_none() {
            warn!("edge {} has no length, using 0", edge.id);
        }

        let length = edge.length_m();
        graph.adjacency[from].push((to, length));
        if edge.bidirectional {
            graph.adjacency[to].push((from, length));
        }
    }

    graph
}

/// Find the node closest to `position` by exhaustive scan.
///
/// Returns the node and its distance in meters, or None for an empty list.
/// On exact ties the earlier node in the list wins.
pub fn nearest_node(position: Coordinate, nodes: &[RoadNode]) -> Option<(&RoadNode, f64)> {
    let mut best: Option<(&RoadNode, f64)> = None;

    for node in nodes {
        let d = distance(position, node.coordinate);
        let is_better = match best {
            Some((_, prev)) => d < prev,
            None => true,
        };
        if is_better {
            best = Some((node, d));
        }
    }

    best
}

/// Result of a shortest-path search.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    /// Node ids from start to end, inclusive.
    pub nodes: Vec<String>,
    /// Distance from the start to each node in `nodes`.
    pub cumulative_m: Vec<f64>,
    pub length_m: f64,
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; node index breaks ties deterministically
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm between two node ids.
///
/// Edge weights must be non-negative, which [`build_graph`] guarantees.
pub fn shortest_path(graph: &Graph, start: &str, end: &str) -> RoutingResult<GraphPath> {
    let from = *graph
        .index
        .get(start)
        .ok_or_else(|| RoutingError::UnknownNode(start.to_string()))?;
    let to = *graph
        .index
        .get(end)
        .ok_or_else(|| RoutingError::UnknownNode(end.to_string()))?;

    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    dist[from] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node: from });

    while let Some(State { cost, node }) = heap.pop() {
        if node == to {
            break;
        }
        // Stale entry
        if cost > dist[node] {
            continue;
        }

        for &(next, len) in &graph.adjacency[node] {
            let next_cost = cost + len;
            if next_cost < dist[next] {
                dist[next] = next_cost;
                prev[next] = Some(node);
                heap.push(State { cost: next_cost, node: next });
            }
        }
    }

    let mut path = vec![to];
    let mut cur = to;
    while let Some(p) = prev[cur] {
        path.push(p);
        cur = p;
    }
    path.reverse();

    if path[0] != from || !dist[to].is_finite() {
        return Err(RoutingError::NoPath {
            from: start.to_string(),
            to: end.to_string(),
        });
    }

    Ok(GraphPath {
        cumulative_m: path.iter().map(|&i| dist[i]).collect(),
        nodes: path.iter().map(|&i| graph.ids[i].clone()).collect(),
        length_m: dist[to],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, lat: f64, lon: f64) -> RoadNode {
        RoadNode {
            id: id.to_string(),
            coordinate: Coordinate::new(lat, lon),
            name: None,
            kind: NodeKind::Intersection,
        }
    }

    fn edge(from: &str, to: &str, distance: f64, bidirectional: bool) -> RoadEdge {
        RoadEdge {
            id: format!("{from}-{to}"),
            from: from.to_string(),
            to: to.to_string(),
            distance: Some(distance),
            bidirectional,
            kind: None,
        }
    }

    fn abc() -> Vec<RoadNode> {
        vec![node("A", 0.0, 0.0), node("B", 0.0, 0.001), node("C", 0.0, 0.002)]
    }

    #[test]
    fn build_graph_adds_reverse_entry_for_bidirectional() {
        let graph = build_graph(&abc(), &[edge("A", "B", 10.0, true)]);
        let from_b: Vec<_> = graph.neighbors("B").unwrap().collect();
        assert_eq!(from_b, vec![("A", 10.0)]);
    }

    #[test]
    fn build_graph_one_way_edge() {
        let graph = build_graph(&abc(), &[edge("A", "B", 10.0, false)]);
        assert_eq!(graph.neighbors("A").unwrap().count(), 1);
        assert_eq!(graph.neighbors("B").unwrap().count(), 0);
    }

    #[test]
    fn build_graph_skips_unknown_nodes() {
        let graph = build_graph(&abc(), &[edge("A", "Z", 10.0, true)]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.neighbors("A").unwrap().count(), 0);
        assert!(!graph.contains("Z"));
    }

    #[test]
    fn missing_length_defaults_to_zero() {
        let mut e = edge("A", "B", 0.0, true);
        e.distance = None;
        assert_eq!(e.length_m(), 0.0);
        e.distance = Some(-5.0);
        assert_eq!(e.length_m(), 0.0);
        e.distance = Some(f64::NAN);
        assert_eq!(e.length_m(), 0.0);
    }

    #[test]
    fn edge_json_defaults_to_bidirectional() {
        let e: RoadEdge =
            serde_json::from_str(r#"{"id": "e1", "from": "A", "to": "B", "distance": 12.5}"#)
                .unwrap();
        assert!(e.bidirectional);
        assert_eq!(e.kind, None);
    }

    #[test]
    fn nearest_node_picks_closest() {
        let nodes = abc();
        let (found, d) = nearest_node(Coordinate::new(0.0, 0.0019), &nodes).unwrap();
        assert_eq!(found.id, "C");
        assert!(d < 20.0);
    }

    #[test]
    fn nearest_node_first_wins_ties() {
        let nodes = vec![node("X", 1.0, 1.0), node("Y", 1.0, 1.0)];
        let (found, _) = nearest_node(Coordinate::new(1.0, 1.0), &nodes).unwrap();
        assert_eq!(found.id, "X");
    }

    #[test]
    fn nearest_node_empty_list() {
        assert!(nearest_node(Coordinate::new(0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn shortest_path_two_hops() {
        let graph = build_graph(&abc(), &[edge("A", "B", 10.0, true), edge("B", "C", 15.0, true)]);
        let path = shortest_path(&graph, "A", "C").unwrap();
        assert_eq!(path.nodes, vec!["A", "B", "C"]);
        assert_eq!(path.length_m, 25.0);
        assert_eq!(path.cumulative_m, vec![0.0, 10.0, 25.0]);
    }

    #[test]
    fn shortest_path_prefers_cheaper_detour() {
        let nodes = abc();
        let edges = vec![
            edge("A", "C", 100.0, true),
            edge("A", "B", 10.0, true),
            edge("B", "C", 15.0, true),
        ];
        let graph = build_graph(&nodes, &edges);
        let path = shortest_path(&graph, "C", "A").unwrap();
        assert_eq!(path.nodes, vec!["C", "B", "A"]);
        assert_eq!(path.length_m, 25.0);
    }

    #[test]
    fn shortest_path_respects_direction() {
        let graph = build_graph(&abc(), &[edge("A", "B", 10.0, false)]);
        assert!(shortest_path(&graph, "A", "B").is_ok());
        assert!(matches!(
            shortest_path(&graph, "B", "A"),
            Err(RoutingError::NoPath { .. })
        ));
    }

    #[test]
    fn shortest_path_disconnected() {
        let graph = build_graph(&abc(), &[edge("A", "B", 10.0, true)]);
        assert!(matches!(
            shortest_path(&graph, "A", "C"),
            Err(RoutingError::NoPath { .. })
        ));
    }

    #[test]
    fn shortest_path_to_self() {
        let graph = build_graph(&abc(), &[]);
        let path = shortest_path(&graph, "B", "B").unwrap();
        assert_eq!(path.nodes, vec!["B"]);
        assert_eq!(path.length_m, 0.0);
    }

    #[test]
    fn shortest_path_unknown_node() {
        let graph = build_graph(&abc(), &[]);
        assert!(matches!(
            shortest_path(&graph, "A", "Q"),
            Err(RoutingError::UnknownNode(id)) if id == "Q"
        ));
    }
}
