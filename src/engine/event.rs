//! Input events accepted by the engine and the results they report.

use serde::{Deserialize, Serialize};

use crate::models::{Cell, Dot, Position};

use super::BoundaryPolicy;

/// A discrete input event, independent of the transport that produced it
/// (keyboard, mouse, touch or HTTP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// A dot key went down
    DotPress {
        /// Dot being pressed
        dot: Dot,
    },
    /// A dot key came up
    DotRelease {
        /// Dot being released
        dot: Dot,
    },
    /// Relative cursor move
    MoveCursor {
        /// Row delta
        d_row: isize,
        /// Column delta
        d_col: isize,
    },
    /// Leave the current cell as is and move right
    Space,
    /// Move to column 0 of the next row
    Newline,
    /// Step back one cell and clear it
    Erase,
    /// Reset grid, cursor and chord
    ClearAll,
}

impl InputEvent {
    /// Shorthand for a dot press.
    #[must_use]
    pub const fn press(dot: Dot) -> Self {
        Self::DotPress { dot }
    }

    /// Shorthand for a dot release.
    #[must_use]
    pub const fn release(dot: Dot) -> Self {
        Self::DotRelease { dot }
    }

    /// Shorthand for a cursor move.
    #[must_use]
    pub const fn move_by(d_row: isize, d_col: isize) -> Self {
        Self::MoveCursor { d_row, d_col }
    }
}

/// What an event did to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EventOutcome {
    /// False when the event was ignored (repeat press, stray release,
    /// erase at the origin)
    pub accepted: bool,
    /// Whether the cursor ended up somewhere else
    pub cursor_moved: bool,
    /// Rows scrolled off the top of the grid
    pub scrolled: usize,
}

impl EventOutcome {
    pub(crate) const fn ignored() -> Self {
        Self {
            accepted: false,
            cursor_moved: false,
            scrolled: 0,
        }
    }

    pub(crate) const fn accepted() -> Self {
        Self {
            accepted: true,
            cursor_moved: false,
            scrolled: 0,
        }
    }
}

/// Chord lifecycle of the cell under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordState {
    /// No dot key held
    Idle,
    /// One or more dot keys held, dots written live to the grid
    Accumulating,
}

/// Read-only projection of engine state for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSnapshot {
    /// Grid row count
    pub rows: usize,
    /// Grid column count
    pub cols: usize,
    /// Active boundary policy
    pub policy: BoundaryPolicy,
    /// Cursor position
    pub cursor: Position,
    /// All cells, row-major
    pub grid: Vec<Vec<Cell>>,
    /// Dots currently held, in index order
    pub active_dots: Vec<Dot>,
    /// Chord accumulator
    pub current_cell: Cell,
    /// Chord lifecycle state
    pub chord_state: ChordState,
}
