use std::{
    cell::{Cell, Ref, RefCell},
    rc::Rc,
};

use egui::Pos2;
use web_time::{Duration, Instant};

use crate::graph::{Canvas, GeneratorKind, Graph, NodeId, PointerEvent, PointerPhase};

pub mod records;
pub mod scope;
pub mod ticker;

pub use records::BestTimes;
use scope::{Listeners, RoundScope};
use ticker::{ANIMATION_FPS, Stopwatch, Ticker};

/// rounds per game
pub const MAX_ROUND: usize = 5;

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Default,
    serde::Deserialize,
    serde::Serialize,
    strum_macros::EnumIter,
)]
pub enum Level {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Level {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
        }
    }

    pub const fn nr_nodes_per_round(self) -> [usize; MAX_ROUND] {
        match self {
            Self::Easy => [6, 6, 7, 7, 8],
            Self::Normal => [7, 7, 8, 8, 9],
            Self::Hard => [8, 8, 9, 9, 10],
        }
    }

    /// `round` counts from zero
    pub fn nr_nodes(self, round: usize) -> usize {
        self.nr_nodes_per_round()[round]
    }
}

/// the pointer hub rounds attach their drag listener to
pub type PointerHub = Listeners<PointerEvent>;

/// one graph to untangle. owns everything it registers at the host,
/// [`Self::finish`] has to be called before the round is dropped.
pub struct Round {
    graph: Rc<RefCell<Graph>>,
    scope: RoundScope<PointerEvent>,
    /// set by the drag listener when a release left no crossing
    solved: Rc<Cell<bool>>,
    /// node let go since the last tick
    released: Rc<Cell<Option<NodeId>>>,
    crossing_points: Vec<Pos2>,
}

impl Round {
    pub fn new(graph: Graph, hub: &mut PointerHub, now: Instant) -> Self {
        let graph = Rc::new(RefCell::new(graph));
        let solved = Rc::new(Cell::new(false));
        let released = Rc::new(Cell::new(None));

        let mut ticker = Ticker::new(ANIMATION_FPS, now);
        ticker.start(now);
        let mut scope = RoundScope::new(ticker);
        {
            let graph = Rc::clone(&graph);
            let solved = Rc::clone(&solved);
            let released = Rc::clone(&released);
            scope.listen(hub, move |event| {
                //a won graph is frozen, even before the round is torn down
                if solved.get() {
                    return;
                }
                let affected = graph.borrow_mut().handle_pointer(event);
                if event.phase != PointerPhase::Up {
                    return;
                }
                if let Some(v) = affected {
                    released.set(Some(v));
                    if !graph.borrow().check_crossed_graph() {
                        solved.set(true);
                    }
                }
            });
        }

        let crossing_points = graph.borrow().crossing_points();
        Self {
            graph,
            scope,
            solved,
            released,
            crossing_points,
        }
    }

    pub fn graph(&self) -> Ref<'_, Graph> {
        self.graph.borrow()
    }

    pub fn is_solved(&self) -> bool {
        self.solved.get()
    }

    pub fn is_finished(&self) -> bool {
        self.scope.is_torn_down()
    }

    /// time since the round started, in the same clock as [`crate::graph::Node::last_released`]
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.scope.ticker().elapsed(now)
    }

    /// crossings as of the last tick
    pub fn crossing_points(&self) -> &[Pos2] {
        &self.crossing_points
    }

    pub fn set_hover(&mut self, pos: Option<Pos2>, radius: f32) {
        self.graph.borrow_mut().set_hover(pos, radius);
    }

    /// reevaluates crossings if the ticker lets us.
    /// returns the round time of the tick, if one happened.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        let t = self.scope.ticker_mut().poll(now)?;
        let mut graph = self.graph.borrow_mut();
        if let Some(v) = self.released.take() {
            graph.mark_released(v, t);
        }
        graph.update_edge_status();
        self.crossing_points = graph.crossing_points();
        Some(t)
    }

    /// detaches the round from the host. a solved round shows all edges as solved.
    pub fn finish(&mut self, hub: &mut PointerHub) {
        let nr_detached = self.scope.teardown(hub);
        if nr_detached > 0 {
            log::debug!("round finished, detached {nr_detached} listeners");
        }
        let mut graph = self.graph.borrow_mut();
        graph.release_drag();
        if self.is_solved() {
            graph.mark_solved();
            self.crossing_points.clear();
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GameEvent {
    Idle,
    Ticked,
    /// round with this index (from zero) was solved, the next one started
    RoundSolved(usize),
    /// last round solved, total time of the game
    Won(Duration),
}

/// [`MAX_ROUND`] rounds of growing graphs, timed as a whole
pub struct Game {
    level: Level,
    kind: GeneratorKind,
    canvas: Canvas,
    round_nr: usize,
    round: Round,
    stopwatch: Stopwatch,
}

impl Game {
    pub fn new(
        level: Level,
        kind: GeneratorKind,
        canvas: Canvas,
        hub: &mut PointerHub,
        now: Instant,
    ) -> Self {
        log::info!("new {} game, {} graphs", level.name(), kind.name());
        let graph = kind.create(canvas, level.nr_nodes(0));
        Self {
            level,
            kind,
            canvas,
            round_nr: 0,
            round: Round::new(graph, hub, now),
            stopwatch: Stopwatch::start(now),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    /// counts from zero
    pub fn round_nr(&self) -> usize {
        self.round_nr
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn round_mut(&mut self) -> &mut Round {
        &mut self.round
    }

    pub fn is_won(&self) -> bool {
        !self.stopwatch.is_running()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.stopwatch.elapsed(now)
    }

    /// to be called once per frame, after the frame's pointer events were dispatched
    pub fn update(&mut self, hub: &mut PointerHub, now: Instant) -> GameEvent {
        if self.is_won() {
            return GameEvent::Idle;
        }
        if !self.round.is_solved() {
            return match self.round.tick(now) {
                Some(_) => GameEvent::Ticked,
                None => GameEvent::Idle,
            };
        }

        self.round.finish(hub);
        let solved_nr = self.round_nr;
        if solved_nr + 1 == MAX_ROUND {
            let time = self.stopwatch.stop(now);
            log::info!("{} game won in {:?}", self.level.name(), time);
            return GameEvent::Won(time);
        }
        self.round_nr += 1;
        let graph = self.kind.create(self.canvas, self.level.nr_nodes(self.round_nr));
        self.round = Round::new(graph, hub, now);
        log::debug!("round {} of {MAX_ROUND} started", self.round_nr + 1);
        GameEvent::RoundSolved(solved_nr)
    }

    /// ends the game without a result
    pub fn abandon(&mut self, hub: &mut PointerHub) {
        self.round.finish(hub);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::{EdgeStatus, NodeStatus, test::graph_from};
    use egui::pos2;
    use strum::IntoEnumIterator;

    /// square with one diagonal and one side drawn across it
    fn crossed_square() -> Graph {
        let positions = [(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)];
        graph_from(&positions, &[(0, 2), (1, 3), (0, 1)])
    }

    fn event(phase: PointerPhase, x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(phase, pos2(x, y))
    }

    #[test]
    fn rounds_get_bigger() {
        for level in Level::iter() {
            let counts = level.nr_nodes_per_round();
            assert!(counts.windows(2).all(|w| w[0] <= w[1]));
            assert!(counts[0] >= 6);
        }
        assert_eq!(Level::Normal.nr_nodes(4), 9);
        assert_eq!(Level::default(), Level::Normal);
    }

    #[test]
    fn dragging_out_of_the_crossing_solves_round() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut hub = PointerHub::new();
        let mut round = Round::new(crossed_square(), &mut hub, t0);
        assert_eq!(hub.len(), 1);
        assert_eq!(round.crossing_points().len(), 1);

        //primes the ticker
        assert_eq!(round.tick(t0), None);

        //move node 3 above the diagonal 0-2
        hub.dispatch(&event(PointerPhase::Down, 100.0, 300.0));
        assert_eq!(round.graph().node(NodeId::new(3)).status, NodeStatus::Drag);
        hub.dispatch(&event(PointerPhase::Move, 100.0, 200.0));
        assert!(!round.is_solved());
        hub.dispatch(&event(PointerPhase::Move, 50.0, 80.0));
        hub.dispatch(&event(PointerPhase::Up, 50.0, 80.0));
        assert!(round.is_solved());

        let t = round.tick(t0 + ms(50));
        assert_eq!(t, Some(ms(50)));
        assert!(round.crossing_points().is_empty());
        assert_eq!(round.graph().node(NodeId::new(3)).last_released, t);
        assert_eq!(round.graph().node(NodeId::new(0)).last_released, None);

        round.finish(&mut hub);
        assert!(hub.is_empty());
        assert!(round.graph().edges().iter().all(|e| e.status == EdgeStatus::Solved));

        //nothing reaches the graph after the round is over
        let before = round.graph().node(NodeId::new(1)).pos();
        hub.dispatch(&event(PointerPhase::Down, 300.0, 100.0));
        hub.dispatch(&event(PointerPhase::Move, 250.0, 250.0));
        assert_eq!(round.graph().node(NodeId::new(1)).pos(), before);
        assert_eq!(round.graph().dragged_node(), None);
    }

    #[test]
    fn won_graph_ignores_rest_of_frame() {
        let t0 = Instant::now();
        let mut hub = PointerHub::new();
        let mut round = Round::new(crossed_square(), &mut hub, t0);
        hub.dispatch(&event(PointerPhase::Down, 100.0, 300.0));
        hub.dispatch(&event(PointerPhase::Move, 50.0, 80.0));
        hub.dispatch(&event(PointerPhase::Up, 50.0, 80.0));
        assert!(round.is_solved());
        let positions = round.graph().nodes().iter().map(|n| n.pos()).collect::<Vec<_>>();

        //same frame, before the game gets to finish the round
        hub.dispatch(&event(PointerPhase::Down, 100.0, 100.0));
        hub.dispatch(&event(PointerPhase::Move, 400.0, 400.0));
        round.finish(&mut hub);

        let graph = round.graph();
        assert!(!graph.check_crossed_graph());
        assert_eq!(graph.dragged_node(), None);
        for (node, &pos) in graph.nodes().iter().zip(&positions) {
            assert_eq!(node.pos(), pos);
            assert_eq!(node.status, NodeStatus::Normal);
        }
    }

    #[test]
    fn abandoned_round_lets_go_of_dragged_node() {
        let t0 = Instant::now();
        let mut hub = PointerHub::new();
        let mut round = Round::new(crossed_square(), &mut hub, t0);
        hub.dispatch(&event(PointerPhase::Down, 300.0, 100.0));
        assert_eq!(round.graph().dragged_node(), Some(NodeId::new(1)));
        round.finish(&mut hub);
        assert_eq!(round.graph().dragged_node(), None);
        assert!(round.graph().nodes().iter().all(|n| n.status == NodeStatus::Normal));
    }

    #[test]
    fn release_with_crossing_keeps_playing() {
        let t0 = Instant::now();
        let mut hub = PointerHub::new();
        let mut round = Round::new(crossed_square(), &mut hub, t0);
        hub.dispatch(&event(PointerPhase::Down, 100.0, 100.0));
        hub.dispatch(&event(PointerPhase::Move, 120.0, 110.0));
        hub.dispatch(&event(PointerPhase::Up, 120.0, 110.0));
        assert!(!round.is_solved());

        round.tick(t0);
        round.tick(t0 + Duration::from_millis(20));
        let alerts = round
            .graph()
            .edges()
            .iter()
            .filter(|e| e.status == EdgeStatus::Alert)
            .count();
        assert_eq!(alerts, 2);

        round.finish(&mut hub);
        assert!(round.is_finished());
        assert!(round.graph().edges().iter().all(|e| e.status != EdgeStatus::Solved));
        //second finish is harmless
        round.finish(&mut hub);
    }

    #[test]
    fn game_runs_through_all_rounds() {
        let t0 = Instant::now();
        let s = Duration::from_secs;
        let mut hub = PointerHub::new();
        let canvas = Canvas::default();
        let mut game = Game::new(Level::Easy, GeneratorKind::LeftRight, canvas, &mut hub, t0);
        assert_eq!(game.round().graph().nr_nodes(), 6);

        for nr in 0..MAX_ROUND {
            assert_eq!(game.round_nr(), nr);
            assert_eq!(hub.len(), 1, "exactly the current round listens");
            game.round_mut().solved.set(true);
            let now = t0 + s(10 * (nr as u64 + 1));
            let event = game.update(&mut hub, now);
            if nr + 1 < MAX_ROUND {
                assert_eq!(event, GameEvent::RoundSolved(nr));
                assert_eq!(game.round().graph().nr_nodes(), Level::Easy.nr_nodes(nr + 1));
            } else {
                assert_eq!(event, GameEvent::Won(s(50)));
            }
        }
        assert!(game.is_won());
        assert!(hub.is_empty());
        assert_eq!(game.update(&mut hub, t0 + s(100)), GameEvent::Idle);
        assert_eq!(game.elapsed(t0 + s(100)), s(50));
    }

    #[test]
    fn abandon_detaches_round() {
        let t0 = Instant::now();
        let mut hub = PointerHub::new();
        let canvas = Canvas::default();
        let mut game = Game::new(Level::Hard, GeneratorKind::Delaunay, canvas, &mut hub, t0);
        assert_eq!(game.round().graph().nr_nodes(), 8);
        game.abandon(&mut hub);
        assert!(hub.is_empty());
        assert!(game.round().is_finished());
        assert!(!game.is_won());
    }
}
