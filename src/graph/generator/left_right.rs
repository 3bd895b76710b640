use egui::{Rect, pos2, vec2};
use rand::Rng;

use crate::graph::{Canvas, Graph, NodeId};

/// generation stops after this many proposed chords in a row did not fit
pub const MAX_FAILURES: usize = 1000;

/// distance of the square nodes are placed in to the canvas border
const INSET: f32 = 20.0;

/// edge between nodes `start` and `end`, read as interval of node indices.
/// chords always skip at least one node, consecutive nodes are linked by the spine.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Chord {
    pub start: usize,
    pub end: usize,
}

impl Chord {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start + 2 <= end);
        Self { start, end }
    }

    /// two chords drawn as arcs on the same side of the node line cross iff their intervals
    /// partially overlap. nested, disjoint and end-sharing intervals are fine.
    pub fn conflicts_with(self, other: Chord) -> bool {
        let Chord { start: a, end: b } = self;
        let Chord { start: c, end: d } = other;
        (a < c && c < b && b < d) || (c < a && a < d && d < b)
    }
}

/// the two pages of a book embedding along the node order.
/// chords on one page never conflict with each other.
#[derive(Clone, Debug, Default)]
pub struct Pages {
    pub left: Vec<Chord>,
    pub right: Vec<Chord>,
}

impl Pages {
    fn fits(page: &[Chord], chord: Chord) -> bool {
        page.iter().all(|&c| !c.conflicts_with(chord))
    }

    pub fn contains(&self, chord: Chord) -> bool {
        self.left.contains(&chord) || self.right.contains(&chord)
    }

    /// tries the left page first if `prefer_left`, then the right page.
    /// returns if the chord was placed.
    pub fn try_insert(&mut self, chord: Chord, prefer_left: bool) -> bool {
        if self.contains(chord) {
            return false;
        }
        if prefer_left && Self::fits(&self.left, chord) {
            self.left.push(chord);
            return true;
        }
        if Self::fits(&self.right, chord) {
            self.right.push(chord);
            return true;
        }
        false
    }

    pub fn chords(&self) -> impl Iterator<Item = Chord> + '_ {
        self.left.iter().chain(&self.right).copied()
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }
}

/// proposes random chords until [`MAX_FAILURES`] proposals in a row were rejected.
/// fewer than three nodes leave no room for chords.
pub fn random_chords<R: Rng>(nr_nodes: usize, rng: &mut R) -> Pages {
    let mut pages = Pages::default();
    if nr_nodes < 3 {
        return pages;
    }
    let mut nr_failures = 0;
    while nr_failures < MAX_FAILURES {
        let prefer_left = rng.gen_bool(0.5);
        let start = rng.gen_range(0..nr_nodes - 2);
        let end = rng.gen_range(start + 2..nr_nodes);
        if pages.try_insert(Chord::new(start, end), prefer_left) {
            nr_failures = 0;
        } else {
            nr_failures += 1;
        }
    }
    pages
}

/// square in the top left of the canvas, [`INSET`] away from the border
fn node_area(canvas: Canvas) -> Rect {
    let side = canvas.min_side() - 2.0 * INSET;
    assert!(side > 0.0, "canvas {canvas:?} too small to place nodes on");
    Rect::from_min_size(pos2(INSET, INSET), vec2(side, side))
}

pub fn create<R: Rng>(canvas: Canvas, nr_nodes: usize, rng: &mut R) -> Graph {
    let area = node_area(canvas);
    let mut graph = Graph::new(canvas);

    //nodes at random positions, each linked to its predecessor with probability 1/2
    let mut prev: Option<NodeId> = None;
    for _ in 0..nr_nodes {
        let pos = pos2(
            rng.gen_range(area.min.x..area.max.x),
            rng.gen_range(area.min.y..area.max.y),
        );
        let v = graph.add_node(pos);
        let link = rng.gen_bool(0.5);
        if let (true, Some(p)) = (link, prev) {
            graph.add_edge(p, v);
        }
        prev = Some(v);
    }

    let pages = random_chords(nr_nodes, rng);
    for Chord { start, end } in pages.chords() {
        graph.add_edge(NodeId::new(start), NodeId::new(end));
    }
    log::debug!(
        "left-right graph: {nr_nodes} nodes, {} edges ({} left, {} right chords)",
        graph.nr_edges(),
        pages.left.len(),
        pages.right.len()
    );
    graph
}
