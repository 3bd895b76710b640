use egui::Color32;

use crate::graph::{EdgeStatus, NodeStatus};

pub const GREY: Color32 = Color32::from_rgb(130, 130, 150);
pub const LIGHT_BLUE: Color32 = Color32::from_rgb(100, 100, 230);
pub const GREEN: Color32 = Color32::from_rgb(120, 210, 80);
pub const WHITE: Color32 = Color32::from_rgb(255, 255, 255);
pub const RED: Color32 = Color32::from_rgb(230, 50, 50);
pub const YELLOW: Color32 = Color32::from_rgb(240, 240, 50);
pub const BOARD: Color32 = Color32::from_rgb(25, 25, 35);

pub const fn edge_color(status: EdgeStatus) -> Color32 {
    match status {
        EdgeStatus::Normal => GREY,
        EdgeStatus::Alert => RED,
        EdgeStatus::Solved => GREEN,
    }
}

pub const fn node_color(status: NodeStatus) -> Color32 {
    match status {
        NodeStatus::Normal => LIGHT_BLUE,
        NodeStatus::Hover => Color32::from_rgb(140, 140, 245),
        NodeStatus::Drag => WHITE,
    }
}

/// `color` with its alpha scaled by `factor` in `[0, 1]`
pub fn fade(color: Color32, factor: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let alpha = (a as f32 * factor.clamp(0.0, 1.0)) as u8;
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}
