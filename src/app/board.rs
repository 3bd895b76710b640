use egui::{emath::RectTransform, *};
use web_time::{Duration, Instant};

use super::color;
use crate::graph::{Canvas, NODE_RADIUS, PointerEvent, PointerPhase};
use crate::round::{Game, PointerHub, Round};

/// how long the ring around a released node takes to fade out
const PULSE_DURATION: Duration = Duration::from_millis(450);
const EDGE_WIDTH: f32 = 3.0;
const SPARK_RADIUS: f32 = 5.0;

/// largest rect with the aspect ratio of `canvas` centered in `available`
fn fit_canvas(canvas: Canvas, available: Rect) -> Rect {
    let scale = f32::min(available.width() / canvas.width, available.height() / canvas.height);
    Rect::from_center_size(available.center(), canvas.rect().size() * scale)
}

/// translates this frame's pointer input into canvas coordinates.
/// a press only counts on the board, moving and releasing count anywhere.
fn pointer_events(ui: &Ui, response: &Response, from_screen: RectTransform) -> Vec<PointerEvent> {
    ui.input(|input| {
        let mut events = Vec::new();
        let Some(screen_pos) = input.pointer.latest_pos() else {
            return events;
        };
        let pos = from_screen.transform_pos(screen_pos);
        if input.pointer.primary_pressed() && response.hovered() {
            events.push(PointerEvent::new(PointerPhase::Down, pos));
        }
        if input.pointer.delta() != Vec2::ZERO {
            events.push(PointerEvent::new(PointerPhase::Move, pos));
        }
        if input.pointer.primary_released() {
            events.push(PointerEvent::new(PointerPhase::Up, pos));
        }
        events
    })
}

fn draw_round(round: &Round, painter: &Painter, to_screen: RectTransform, now: Instant) {
    let scale = to_screen.scale().x;
    let graph = round.graph();
    painter.rect_filled(*to_screen.to(), 4.0, color::BOARD);

    for edge in graph.edges() {
        let [v1, v2] = edge.ends();
        let ends = [graph.node(v1).pos(), graph.node(v2).pos()].map(|p| to_screen * p);
        let stroke = Stroke::new(EDGE_WIDTH * scale, color::edge_color(edge.status));
        painter.line_segment(ends, stroke);
    }

    for &p in round.crossing_points() {
        painter.circle_filled(to_screen * p, SPARK_RADIUS * scale, color::YELLOW);
    }

    let round_time = round.elapsed(now);
    let radius = NODE_RADIUS * scale;
    for node in graph.nodes() {
        let center = to_screen * node.pos();
        painter.circle_filled(center, radius, color::node_color(node.status));

        let Some(released) = node.last_released else {
            continue;
        };
        let age = round_time.saturating_sub(released);
        if age < PULSE_DURATION {
            let progress = age.as_secs_f32() / PULSE_DURATION.as_secs_f32();
            let stroke = Stroke::new(2.0 * scale, color::fade(color::WHITE, 1.0 - progress));
            painter.circle_stroke(center, radius * (1.0 + progress), stroke);
        }
    }
}

/// paints the current round and feeds it this frame's pointer input
pub fn draw_game(ui: &mut Ui, game: &mut Game, hub: &mut PointerHub, now: Instant) {
    let canvas = game.round().graph().canvas();
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
    let to_screen = RectTransform::from_to(canvas.rect(), fit_canvas(canvas, response.rect));
    let from_screen = to_screen.inverse();

    for event in pointer_events(ui, &response, from_screen) {
        hub.dispatch(&event);
    }
    let hover = response.hover_pos().map(|p| from_screen * p);
    game.round_mut().set_hover(hover, NODE_RADIUS);

    draw_round(game.round(), &painter, to_screen, now);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn canvas_keeps_aspect_ratio() {
        let canvas = Canvas::new(500.0, 250.0);
        let available = Rect::from_min_size(pos2(10.0, 10.0), vec2(300.0, 300.0));
        let fitted = fit_canvas(canvas, available);
        assert_eq!(fitted.size(), vec2(300.0, 150.0));
        assert_eq!(fitted.center(), available.center());
    }
}
