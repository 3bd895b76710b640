use egui::Pos2;
use web_time::Duration;

/// identifies a node within its [`super::Graph`]. ids are handed out in creation order,
/// starting at zero, and double as index into the graph's node storage.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum NodeStatus {
    #[default]
    Normal,
    Hover,
    Drag,
}

#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    pos: Pos2,
    pub status: NodeStatus,
    /// round time at which the node was last let go after dragging
    pub last_released: Option<Duration>,
}

impl Node {
    pub(super) fn new(id: NodeId, pos: Pos2) -> Self {
        Self { id, pos, status: NodeStatus::Normal, last_released: None }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn pos(&self) -> Pos2 {
        self.pos
    }

    pub(super) fn set_pos(&mut self, pos: Pos2) {
        self.pos = pos;
    }

    pub fn dist_sq(&self, p: Pos2) -> f32 {
        (self.pos - p).length_sq()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EdgeStatus {
    #[default]
    Normal,
    /// crosses at least one edge it does not share an endpoint with
    Alert,
    /// the round this edge belongs to was won
    Solved,
}

/// unordered pair of nodes. the edge never stores coordinates,
/// moving a node moves every edge touching it.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    ends: [NodeId; 2],
    pub status: EdgeStatus,
}

impl Edge {
    pub(super) fn new(v1: NodeId, v2: NodeId) -> Self {
        Self { ends: [v1, v2], status: EdgeStatus::Normal }
    }

    pub fn ends(&self) -> [NodeId; 2] {
        self.ends
    }

    pub fn has_end(&self, v: NodeId) -> bool {
        self.ends.contains(&v)
    }

    /// edges meeting in a common node may touch there,
    /// so such pairs are never checked for crossings
    pub fn is_neighbor_of(&self, other: &Edge) -> bool {
        self.ends.iter().any(|&v| other.has_end(v))
    }

    /// same pair of nodes, regardless of order
    pub fn connects_same(&self, other: &Edge) -> bool {
        let [a, b] = self.ends;
        other.ends == [a, b] || other.ends == [b, a]
    }
}
