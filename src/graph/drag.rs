use egui::{Pos2, Vec2};

use super::{Graph, NodeId, NodeStatus};
use crate::geo;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// pointer input in canvas coordinates
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub pos: Pos2,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, pos: Pos2) -> Self {
        Self { phase, pos }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        node: NodeId,
        /// node center minus pointer position at the moment the drag started
        offset: Vec2,
    },
}

impl Graph {
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn dragged_node(&self) -> Option<NodeId> {
        match self.drag {
            DragState::Idle => None,
            DragState::Dragging { node, .. } => Some(node),
        }
    }

    /// the only way to move nodes.
    /// down grabs the closest node, move drags it along (clamped to the canvas),
    /// up lets go. move and up without a grabbed node do nothing.
    /// returns the node affected by the event.
    pub fn set_node_pos(&mut self, phase: PointerPhase, pointer: Pos2) -> Option<NodeId> {
        match (phase, self.drag) {
            (PointerPhase::Down, _) => {
                //up got lost somewhere, e.g. pointer was released outside the window
                self.release_drag();
                let node = self.closest_node(pointer)?;
                let offset = self.node(node).pos() - pointer;
                self.node_mut(node).status = NodeStatus::Drag;
                self.drag = DragState::Dragging { node, offset };
                Some(node)
            },
            (PointerPhase::Move, DragState::Dragging { node, offset }) => {
                let pos = geo::clamp_into(self.canvas.node_area(), pointer + offset);
                self.node_mut(node).set_pos(pos);
                Some(node)
            },
            (PointerPhase::Up, DragState::Dragging { .. }) => self.release_drag(),
            (PointerPhase::Move | PointerPhase::Up, DragState::Idle) => None,
        }
    }

    /// lets go of the dragged node without moving it, returns that node
    pub fn release_drag(&mut self) -> Option<NodeId> {
        let node = self.dragged_node()?;
        self.node_mut(node).status = NodeStatus::Normal;
        self.drag = DragState::Idle;
        Some(node)
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<NodeId> {
        self.set_node_pos(event.phase, event.pos)
    }
}
