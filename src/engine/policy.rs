//! Boundary policies for cursor movement.

use serde::{Deserialize, Serialize};

use crate::models::Position;

/// How the cursor behaves when a move would leave the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Row and column are clamped independently; no wraparound
    Clamp,
    /// Column overflow moves to the start of the next row, underflow to the
    /// end of the previous row; moves past the first/last row are dropped
    #[default]
    Wrap,
    /// Like `Wrap`, but moving past the last row scrolls the grid up
    WrapScroll,
}

impl BoundaryPolicy {
    /// All policies, in settings-cycle order.
    pub const ALL: [Self; 3] = [Self::Clamp, Self::Wrap, Self::WrapScroll];

    /// Short human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Wrap => "wrap",
            Self::WrapScroll => "wrap+scroll",
        }
    }

    /// The next policy in cycle order.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Clamp => Self::Wrap,
            Self::Wrap => Self::WrapScroll,
            Self::WrapScroll => Self::Clamp,
        }
    }

    /// Works out where a move of (`d_row`, `d_col`) from `from` lands on a
    /// `rows` x `cols` grid.
    ///
    /// Total for any deltas: overshoots saturate, and a scroll never
    /// reports more lines than the grid has rows.
    #[must_use]
    pub fn resolve(
        self,
        from: Position,
        d_row: isize,
        d_col: isize,
        rows: usize,
        cols: usize,
    ) -> CursorTarget {
        let rows = rows as isize;
        let cols = cols as isize;
        let new_row = (from.row as isize).saturating_add(d_row);
        let new_col = (from.col as isize).saturating_add(d_col);

        if self == Self::Clamp {
            return CursorTarget::Move(to_position(
                new_row.clamp(0, rows - 1),
                new_col.clamp(0, cols - 1),
            ));
        }

        let scrolls = self == Self::WrapScroll;

        if (0..rows).contains(&new_row) {
            if (0..cols).contains(&new_col) {
                CursorTarget::Move(to_position(new_row, new_col))
            } else if new_col >= cols {
                if new_row + 1 < rows {
                    CursorTarget::Move(to_position(new_row + 1, 0))
                } else if scrolls {
                    CursorTarget::Scroll { lines: 1, col: 0 }
                } else {
                    CursorTarget::Stay
                }
            } else if new_row >= 1 {
                CursorTarget::Move(to_position(new_row - 1, cols - 1))
            } else {
                CursorTarget::Stay
            }
        } else if new_row >= rows && scrolls {
            CursorTarget::Scroll {
                lines: new_row.saturating_sub(rows - 1).min(rows) as usize,
                col: new_col.clamp(0, cols - 1) as usize,
            }
        } else {
            CursorTarget::Stay
        }
    }
}

impl std::fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "wrap" => Ok(Self::Wrap),
            "wrap_scroll" | "wrap-scroll" | "wrap+scroll" | "scroll" => Ok(Self::WrapScroll),
            other => Err(format!(
                "unknown boundary policy '{other}' (expected clamp, wrap or wrap-scroll)"
            )),
        }
    }
}

/// Result of resolving a cursor move against the grid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorTarget {
    /// Cursor moves to this position (possibly its current one)
    Move(Position),
    /// Grid scrolls up by `lines`; cursor lands on the last row at `col`
    Scroll {
        /// Rows dropped from the top
        lines: usize,
        /// Column on the last row
        col: usize,
    },
    /// Move suppressed, cursor unchanged
    Stay,
}

fn to_position(row: isize, col: isize) -> Position {
    Position::new(row.max(0) as usize, col.max(0) as usize)
}
