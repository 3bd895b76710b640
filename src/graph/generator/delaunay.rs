//! planar graphs as edge skeleton of a Delaunay triangulation.
//!
//! the triangulation is built incrementally (Bowyer–Watson): start with one huge triangle
//! containing every possible input point, insert the points one after another,
//! each time replacing all triangles whose circumcircle contains the new point by a fan
//! around it. at the end all triangles touching the initial huge triangle are dropped.
//!
//! all math in here is done in `f64`, the corners of the initial triangle are far out.

use std::collections::{BTreeMap, BTreeSet};

use egui::{Pos2, Rect, pos2};
use itertools::Itertools;
use rand::Rng;

use crate::geo;
use crate::graph::{Canvas, Graph, NodeId};

const SUPER_EXTENT: f64 = 1e6;
/// number of auxiliary corners placed in front of the real points
const NR_SUPER: usize = 3;
/// points closer than this (in squared distance) to a circumcircle count as outside
const IN_CIRCLE_EPS: f64 = 1e-7;
/// substitute for a vanishing circumcenter denominator (collinear corners)
const MIN_DENOMINATOR: f64 = 1e-12;

#[derive(Clone, Copy, PartialEq, Debug)]
struct Point {
    x: f64,
    y: f64,
}

impl From<Pos2> for Point {
    fn from(p: Pos2) -> Self {
        Self { x: p.x as f64, y: p.y as f64 }
    }
}

impl Point {
    fn len_sq(self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

/// twice the signed area, positive if `a`, `b`, `c` are ordered counterclockwise
fn signed_area(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

#[derive(Clone, Copy, Debug)]
struct Triangle {
    /// indices into the working point list (auxiliary corners first), counterclockwise
    corners: [usize; 3],
    center: Point,
    radius_sq: f64,
}

impl Triangle {
    fn new(corners: [usize; 3], points: &[Point]) -> Self {
        let [a, mut b, mut c] = corners;
        if signed_area(points[a], points[b], points[c]) <= 0.0 {
            std::mem::swap(&mut b, &mut c);
        }
        let (pa, pb, pc) = (points[a], points[b], points[c]);

        let denominator = {
            let d = 2.0 * (pa.x * (pb.y - pc.y) + pb.x * (pc.y - pa.y) + pc.x * (pa.y - pb.y));
            if d == 0.0 { MIN_DENOMINATOR } else { d }
        };
        let (la, lb, lc) = (pa.len_sq(), pb.len_sq(), pc.len_sq());
        let center = Point {
            x: (la * (pb.y - pc.y) + lb * (pc.y - pa.y) + lc * (pa.y - pb.y)) / denominator,
            y: (la * (pc.x - pb.x) + lb * (pa.x - pc.x) + lc * (pb.x - pa.x)) / denominator,
        };
        let radius_sq = Point { x: center.x - pa.x, y: center.y - pa.y }.len_sq();

        Self { corners: [a, b, c], center, radius_sq }
    }

    fn circumcircle_contains(&self, p: Point) -> bool {
        let to_center = Point { x: p.x - self.center.x, y: p.y - self.center.y };
        to_center.len_sq() <= self.radius_sq - IN_CIRCLE_EPS
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.corners;
        [(a, b), (b, c), (c, a)]
    }

    fn is_real(&self) -> bool {
        self.corners.iter().all(|&v| v >= NR_SUPER)
    }
}

/// Delaunay triangulation of `points`. each triangle lists indices into `points`,
/// counterclockwise in a y-up frame. collinear or repeated points don't fail, they just
/// produce fewer triangles.
pub fn triangulate(points: &[Pos2]) -> Vec<[usize; 3]> {
    let work = [
        Point { x: -SUPER_EXTENT, y: -SUPER_EXTENT },
        Point { x: SUPER_EXTENT, y: -SUPER_EXTENT },
        Point { x: 0.0, y: SUPER_EXTENT },
    ]
    .into_iter()
    .chain(points.iter().map(|&p| Point::from(p)))
    .collect_vec();

    let mut triangles = vec![Triangle::new([0, 1, 2], &work)];
    //key is the undirected edge, value the edge as first seen and how often it was seen
    let mut cavity_edges = BTreeMap::<(usize, usize), ((usize, usize), usize)>::new();
    for (i, &p) in work.iter().enumerate().skip(NR_SUPER) {
        let (bad, good): (Vec<_>, Vec<_>) = std::mem::take(&mut triangles)
            .into_iter()
            .partition(|t| t.circumcircle_contains(p));
        triangles = good;

        cavity_edges.clear();
        for (u, v) in bad.iter().flat_map(Triangle::edges) {
            let key = (usize::min(u, v), usize::max(u, v));
            cavity_edges.entry(key).or_insert(((u, v), 0)).1 += 1;
        }
        //edges shared by two removed triangles lie inside the cavity
        for &((u, v), count) in cavity_edges.values() {
            if count == 1 {
                triangles.push(Triangle::new([u, v, i], &work));
            }
        }
    }

    triangles
        .into_iter()
        .filter(Triangle::is_real)
        .map(|t| t.corners.map(|v| v - NR_SUPER))
        .collect_vec()
}

/// unique undirected edges of the triangles, smaller index first
pub fn edge_skeleton(triangles: &[[usize; 3]]) -> Vec<(usize, usize)> {
    let mut edges = BTreeSet::new();
    for &[a, b, c] in triangles {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            if u != v {
                edges.insert((usize::min(u, v), usize::max(u, v)));
            }
        }
    }
    edges.into_iter().collect_vec()
}

pub fn margin(canvas: Canvas) -> f32 {
    f32::max(16.0, canvas.min_side() * 0.04)
}

fn point_area(canvas: Canvas) -> Rect {
    geo::inset(canvas.rect(), margin(canvas))
}

pub fn random_points<R: Rng>(canvas: Canvas, nr_points: usize, rng: &mut R) -> Vec<Pos2> {
    let area = point_area(canvas);
    (0..nr_points)
        .map(|_| {
            pos2(
                rng.gen_range(area.min.x..area.max.x),
                rng.gen_range(area.min.y..area.max.y),
            )
        })
        .collect_vec()
}

/// triangulates random points, then places the nodes somewhere else:
/// the points the triangulation was built on are a solution and must not be the start.
pub fn create<R: Rng>(canvas: Canvas, nr_nodes: usize, rng: &mut R) -> Graph {
    let points = random_points(canvas, nr_nodes, rng);
    let triangles = triangulate(&points);
    let edges = edge_skeleton(&triangles);

    let mut graph = Graph::new(canvas);
    for pos in random_points(canvas, nr_nodes, rng) {
        graph.add_node(pos);
    }
    for &(u, v) in &edges {
        graph.add_edge(NodeId::new(u), NodeId::new(v));
    }
    log::debug!(
        "delaunay graph: {nr_nodes} nodes, {} triangles, {} edges",
        triangles.len(),
        edges.len()
    );
    graph
}
