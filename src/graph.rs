use egui::{Pos2, Rect, pos2};
use itertools::Itertools;
use web_time::Duration;

use crate::geo::{self, Line2};

mod element;
pub use element::*;

pub mod drag;
pub use drag::{DragState, PointerEvent, PointerPhase};

pub mod generator;
pub use generator::GeneratorKind;

/// radius nodes are drawn with. dragging keeps the whole node on the canvas.
pub const NODE_RADIUS: f32 = 18.0;

/// the surface a graph lives on, in canvas units. (0, 0) is the top left corner.
#[derive(Clone, Copy, PartialEq, Debug, serde::Deserialize, serde::Serialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(500.0, 500.0)
    }
}

impl Canvas {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_max(Pos2::ZERO, pos2(self.width, self.height))
    }

    pub fn min_side(&self) -> f32 {
        f32::min(self.width, self.height)
    }

    /// region a node center may be dragged to
    pub fn node_area(&self) -> Rect {
        geo::inset(self.rect(), NODE_RADIUS)
    }
}

/// the puzzle state of one round: nodes with their current positions and the edges between them.
/// edges store indices into the node storage, nodes are never removed.
pub struct Graph {
    canvas: Canvas,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    drag: DragState,
}

impl Graph {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            nodes: Vec::new(),
            edges: Vec::new(),
            drag: DragState::Idle,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn nr_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn nr_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, v: NodeId) -> &Node {
        &self.nodes[v.index()]
    }

    fn node_mut(&mut self, v: NodeId) -> &mut Node {
        &mut self.nodes[v.index()]
    }

    pub fn add_node(&mut self, pos: Pos2) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(id, pos));
        id
    }

    /// both ends must already be part of this graph
    pub fn add_edge(&mut self, v1: NodeId, v2: NodeId) {
        assert!(
            v1.index() < self.nr_nodes() && v2.index() < self.nr_nodes(),
            "edge {v1} - {v2} leaves graph of {} nodes",
            self.nr_nodes()
        );
        debug_assert_ne!(v1, v2);
        debug_assert!(!self.has_edge(v1, v2), "edge {v1} - {v2} added twice");
        self.edges.push(Edge::new(v1, v2));
    }

    pub fn has_edge(&self, v1: NodeId, v2: NodeId) -> bool {
        let edge = Edge::new(v1, v2);
        self.edges.iter().any(|e| e.connects_same(&edge))
    }

    pub fn line_of(&self, edge: &Edge) -> Line2 {
        let [v1, v2] = edge.ends();
        geo::line_from_to(self.node(v1).pos(), self.node(v2).pos())
    }

    /// neighbors (edges sharing a node) never cross
    pub fn edges_cross(&self, e1: &Edge, e2: &Edge) -> bool {
        !e1.is_neighbor_of(e2) && geo::segments_cross(self.line_of(e1), self.line_of(e2))
    }

    /// all pairs of edge indices `(i, j)` with `i < j` that cross
    fn crossing_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.edges.len())
            .tuple_combinations()
            .filter(|&(i, j)| self.edges_cross(&self.edges[i], &self.edges[j]))
    }

    /// one entry per edge, true if that edge crosses any other edge
    pub fn crossed_edges(&self) -> Vec<bool> {
        let mut crossed = vec![false; self.edges.len()];
        for (i, j) in self.crossing_pairs() {
            crossed[i] = true;
            crossed[j] = true;
        }
        crossed
    }

    /// sets every crossed edge to [`EdgeStatus::Alert`] and all others to [`EdgeStatus::Normal`].
    /// returns if any edge is crossed.
    pub fn update_edge_status(&mut self) -> bool {
        let crossed = self.crossed_edges();
        for (edge, &c) in self.edges.iter_mut().zip(&crossed) {
            edge.status = if c { EdgeStatus::Alert } else { EdgeStatus::Normal };
        }
        crossed.contains(&true)
    }

    /// true as long as the puzzle is unsolved, e.g. at least one pair of non-neighbor edges crosses
    pub fn check_crossed_graph(&self) -> bool {
        self.crossing_pairs().next().is_some()
    }

    pub fn crossing_count(&self) -> usize {
        self.crossing_pairs().count()
    }

    /// where the crossings are, one point per crossing pair
    pub fn crossing_points(&self) -> Vec<Pos2> {
        (0..self.edges.len())
            .tuple_combinations()
            .filter(|&(i, j)| !self.edges[i].is_neighbor_of(&self.edges[j]))
            .filter_map(|(i, j)| {
                geo::crossing_point(self.line_of(&self.edges[i]), self.line_of(&self.edges[j]))
            })
            .collect_vec()
    }

    pub fn mark_solved(&mut self) {
        for edge in &mut self.edges {
            edge.status = EdgeStatus::Solved;
        }
    }

    /// remembers `at` as the time `v` was last let go
    pub fn mark_released(&mut self, v: NodeId, at: Duration) {
        self.node_mut(v).last_released = Some(at);
    }

    /// node with center nearest to `pos`, no matter how far away.
    /// on ties the node created first wins.
    pub fn closest_node(&self, pos: Pos2) -> Option<NodeId> {
        let mut res = None;
        let mut best = f32::INFINITY;
        for node in &self.nodes {
            let dist = node.dist_sq(pos);
            if dist < best {
                best = dist;
                res = Some(node.id());
            }
        }
        res
    }

    /// marks the node below `pos` as hovered, if any is within `radius`.
    /// a dragged node keeps its status.
    pub fn set_hover(&mut self, pos: Option<Pos2>, radius: f32) {
        let hovered = pos
            .and_then(|p| self.closest_node(p).map(|v| (v, p)))
            .filter(|&(v, p)| self.node(v).dist_sq(p) <= radius * radius)
            .map(|(v, _)| v);
        for node in &mut self.nodes {
            if node.status == NodeStatus::Drag {
                continue;
            }
            node.status = if Some(node.id()) == hovered {
                NodeStatus::Hover
            } else {
                NodeStatus::Normal
            };
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use proptest::prelude::*;

    pub fn graph_from(positions: &[(f32, f32)], edges: &[(usize, usize)]) -> Graph {
        let mut graph = Graph::new(Canvas::default());
        for &(x, y) in positions {
            graph.add_node(pos2(x, y));
        }
        for &(v1, v2) in edges {
            graph.add_edge(NodeId::new(v1), NodeId::new(v2));
        }
        graph
    }

    const SQUARE: [(f32, f32); 4] =
        [(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)];

    #[test]
    fn square_with_both_diagonals_is_crossed() {
        let sides: [(usize, usize); 4] = [(0, 1), (1, 2), (2, 3), (3, 0)];
        let mut edges = sides.to_vec();
        edges.extend([(0, 2), (1, 3)]);
        let mut graph = graph_from(&SQUARE, &edges);
        assert!(graph.check_crossed_graph());
        assert_eq!(graph.crossing_count(), 1);
        assert!(graph.update_edge_status());
        let statuses = graph.edges().iter().map(|e| e.status).collect_vec();
        assert_eq!(&statuses[..4], &[EdgeStatus::Normal; 4]);
        assert_eq!(&statuses[4..], &[EdgeStatus::Alert; 2]);

        let points = graph.crossing_points();
        assert_eq!(points.len(), 1);
        assert!((points[0] - pos2(200.0, 200.0)).length() < 1e-3);

        //without the second diagonal
        edges.pop();
        let mut graph = graph_from(&SQUARE, &edges);
        assert!(!graph.check_crossed_graph());
        assert!(!graph.update_edge_status());
        assert!(graph.edges().iter().all(|e| e.status == EdgeStatus::Normal));
        assert!(graph.crossing_points().is_empty());
    }

    #[test]
    fn solved_state_is_stable() {
        let graph = graph_from(&SQUARE, &[(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)]);
        for _ in 0..5 {
            assert!(!graph.check_crossed_graph());
        }
    }

    #[test]
    fn alert_status_resets_once_crossing_is_gone() {
        let mut graph = graph_from(&SQUARE, &[(0, 2), (1, 3)]);
        assert!(graph.update_edge_status());
        //pull node 1 over to the left, diagonals no longer cross
        graph.node_mut(NodeId::new(1)).set_pos(pos2(50.0, 320.0));
        assert!(!graph.update_edge_status());
        assert!(graph.edges().iter().all(|e| e.status == EdgeStatus::Normal));
    }

    #[test]
    fn closest_node_has_no_cutoff() {
        let graph = graph_from(&SQUARE, &[]);
        assert_eq!(graph.closest_node(pos2(-5000.0, -5000.0)), Some(NodeId::new(0)));
        assert_eq!(graph.closest_node(pos2(290.0, 310.0)), Some(NodeId::new(2)));
        //equidistant to all four corners
        assert_eq!(graph.closest_node(pos2(200.0, 200.0)), Some(NodeId::new(0)));
        assert_eq!(Graph::new(Canvas::default()).closest_node(Pos2::ZERO), None);
    }

    #[test]
    fn hover_only_within_radius() {
        let mut graph = graph_from(&SQUARE, &[]);
        graph.set_hover(Some(pos2(105.0, 95.0)), NODE_RADIUS);
        assert_eq!(graph.node(NodeId::new(0)).status, NodeStatus::Hover);
        graph.set_hover(Some(pos2(200.0, 200.0)), NODE_RADIUS);
        assert!(graph.nodes().iter().all(|n| n.status == NodeStatus::Normal));
    }

    #[test]
    #[should_panic]
    fn edge_to_foreign_node_is_rejected() {
        graph_from(&SQUARE, &[(0, 4)]);
    }

    fn position() -> impl Strategy<Value = (f32, f32)> {
        (0.0f32..500.0, 0.0f32..500.0)
    }

    proptest! {
        /// two edges out of node 0 that lie on top of each other are still not crossed
        #[test]
        fn neighbors_never_cross(positions in prop::collection::vec(position(), 4)) {
            let mut graph = graph_from(&positions, &[(0, 1), (0, 2), (3, 0)]);
            prop_assert!(!graph.check_crossed_graph());
            prop_assert!(!graph.update_edge_status());
            prop_assert!(graph.edges().iter().all(|e| e.status == EdgeStatus::Normal));
        }

        #[test]
        fn edge_crossing_is_symmetric(positions in prop::collection::vec(position(), 4)) {
            let graph = graph_from(&positions, &[(0, 1), (2, 3)]);
            let [e1, e2] = [graph.edges()[0], graph.edges()[1]];
            prop_assert_eq!(graph.edges_cross(&e1, &e2), graph.edges_cross(&e2, &e1));
        }
    }

    #[test]
    fn overlapping_neighbors_stay_normal() {
        //second edge runs back along the first one
        let positions = [(100.0, 100.0), (400.0, 400.0), (250.0, 250.0)];
        let mut graph = graph_from(&positions, &[(0, 1), (1, 2)]);
        assert!(!graph.update_edge_status());
        assert!(graph.edges().iter().all(|e| e.status == EdgeStatus::Normal));
    }
}
