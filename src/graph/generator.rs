use rand::Rng;

use super::{Canvas, Graph};

/// 2-page book embedding: random non-crossing chords over the node order
pub mod left_right;

/// edges of a Delaunay triangulation over random points
pub mod delaunay;

/// how the edges of a new round are chosen.
/// either way the result can be drawn without crossings, the node positions of the new graph
/// are random though.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Debug,
    Default,
    serde::Deserialize,
    serde::Serialize,
    strum_macros::EnumIter,
)]
pub enum GeneratorKind {
    #[default]
    LeftRight,
    Delaunay,
}

impl GeneratorKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::LeftRight => "Left-Right",
            Self::Delaunay => "Delaunay",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::LeftRight => "chords above and below the node order, sparse for many nodes",
            Self::Delaunay => "triangulation of random points, every face a triangle",
        }
    }

    /// new graph with `nr_nodes` nodes, drawn from the thread local random source
    pub fn create(self, canvas: Canvas, nr_nodes: usize) -> Graph {
        self.create_with(canvas, nr_nodes, &mut rand::thread_rng())
    }

    pub fn create_with<R: Rng>(self, canvas: Canvas, nr_nodes: usize, rng: &mut R) -> Graph {
        match self {
            Self::LeftRight => left_right::create(canvas, nr_nodes, rng),
            Self::Delaunay => delaunay::create(canvas, nr_nodes, rng),
        }
    }
}
