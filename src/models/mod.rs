//! Data models for braille cells and the cell grid.
//!
//! Models are plain values, independent of input handling and rendering.

pub mod cell;
pub mod grid;

pub use cell::{Cell, Dot};
pub use grid::{Grid, Position};
