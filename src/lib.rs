#![warn(clippy::all, rust_2018_idioms)]

/// the management side of the program
mod app;
pub use app::State;

/// segment math on plain egui positions
pub mod geo;

/// the puzzle itself: graphs, crossings, dragging and how new graphs are made
pub mod graph;

/// rounds, games and everything that has to be cleaned up between them
pub mod round;
