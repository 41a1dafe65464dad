//! Grid/cursor engine and chorded-input state machine.
//!
//! The engine owns the grid, the cursor, the chord accumulator and the set
//! of held dot keys. Front ends feed it [`InputEvent`]s and render from
//! [`Engine::snapshot`] or the borrowed accessors; they never mutate the
//! state directly.
//!
//! A cell goes through `Idle -> Accumulating -> committed`: each new dot
//! press raises the dot in the accumulator and writes the accumulator to the
//! grid immediately, and releasing the last held dot advances the cursor.

pub mod event;
pub mod policy;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Cell, Dot, Grid, Position};

pub use event::{ChordState, EngineSnapshot, EventOutcome, InputEvent};
pub use policy::{BoundaryPolicy, CursorTarget};

/// Default grid height.
pub const DEFAULT_ROWS: usize = 20;
/// Default grid width.
pub const DEFAULT_COLS: usize = 25;

/// Dimensions and boundary policy the engine is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Row count
    pub rows: usize,
    /// Column count
    pub cols: usize,
    /// Cursor behaviour at the grid edges
    pub boundary_policy: BoundaryPolicy,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            boundary_policy: BoundaryPolicy::default(),
        }
    }
}

/// Braille editing engine. One instance per editing session.
#[derive(Debug, Clone)]
pub struct Engine {
    grid: Grid,
    policy: BoundaryPolicy,
    cursor: Position,
    current_cell: Cell,
    active_dots: BTreeSet<Dot>,
}

impl Engine {
    /// Creates an engine with an empty grid and the cursor at the origin.
    #[must_use]
    pub fn new(settings: GridSettings) -> Self {
        Self {
            grid: Grid::new(settings.rows, settings.cols),
            policy: settings.boundary_policy,
            cursor: Position::origin(),
            current_cell: Cell::EMPTY,
            active_dots: BTreeSet::new(),
        }
    }

    // === Read access ===

    /// The grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cursor position.
    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    /// The chord accumulator.
    #[must_use]
    pub const fn current_cell(&self) -> Cell {
        self.current_cell
    }

    /// Dots currently held down, in index order.
    pub fn active_dots(&self) -> impl Iterator<Item = Dot> + '_ {
        self.active_dots.iter().copied()
    }

    /// Whether `dot` is currently held.
    #[must_use]
    pub fn is_held(&self, dot: Dot) -> bool {
        self.active_dots.contains(&dot)
    }

    /// Current chord lifecycle state.
    #[must_use]
    pub fn chord_state(&self) -> ChordState {
        if self.active_dots.is_empty() {
            ChordState::Idle
        } else {
            ChordState::Accumulating
        }
    }

    /// Active boundary policy.
    #[must_use]
    pub const fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Switches the boundary policy. Grid contents and cursor are untouched.
    pub fn set_policy(&mut self, policy: BoundaryPolicy) {
        debug!(from = %self.policy, to = %policy, "boundary policy changed");
        self.policy = policy;
    }

    /// Owned copy of the full state for rendering or serialization.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            policy: self.policy,
            cursor: self.cursor,
            grid: self.grid.to_rows(),
            active_dots: self.active_dots().collect(),
            current_cell: self.current_cell,
            chord_state: self.chord_state(),
        }
    }

    // === Core operations ===

    /// Raises `dot` in the chord accumulator. The grid is not touched.
    pub fn set_dot(&mut self, dot: Dot) {
        self.current_cell.raise(dot);
    }

    /// Writes the chord accumulator into the grid at the cursor.
    pub fn commit_chord(&mut self) {
        self.grid.set(self.cursor, self.current_cell);
    }

    /// Moves the cursor by (`d_row`, `d_col`) under the active boundary
    /// policy, then reloads the accumulator from the cell under the cursor.
    ///
    /// The accumulator is reloaded even when the move is suppressed, so a
    /// partially typed chord never carries over to another cell.
    pub fn advance_cursor(&mut self, d_row: isize, d_col: isize) -> CursorTarget {
        let target = self.policy.resolve(
            self.cursor,
            d_row,
            d_col,
            self.grid.rows(),
            self.grid.cols(),
        );

        match target {
            CursorTarget::Move(pos) => self.cursor = pos,
            CursorTarget::Scroll { lines, col } => {
                self.grid.scroll_up(lines);
                self.cursor = Position::new(self.grid.rows() - 1, col);
                debug!(lines, "grid scrolled");
            }
            CursorTarget::Stay => {}
        }

        self.reload_accumulator();
        target
    }

    /// Advances one cell to the right; called when the last held dot is
    /// released.
    pub fn advance_after_chord_release(&mut self) -> CursorTarget {
        self.advance_cursor(0, 1)
    }

    /// Moves right without writing anything.
    pub fn handle_space(&mut self) -> CursorTarget {
        self.advance_cursor(0, 1)
    }

    /// Moves to column 0 of the next row.
    pub fn handle_newline(&mut self) -> CursorTarget {
        self.advance_cursor(1, -(self.cursor.col as isize))
    }

    /// Steps back one cell (wrapping to the end of the previous row) and
    /// clears it.
    ///
    /// Independent of the boundary policy. Returns `false` and does nothing
    /// at the origin.
    pub fn handle_erase(&mut self) -> bool {
        let Position { row, col } = self.cursor;
        self.cursor = if col > 0 {
            Position::new(row, col - 1)
        } else if row > 0 {
            Position::new(row - 1, self.grid.cols() - 1)
        } else {
            return false;
        };

        self.grid.set(self.cursor, Cell::EMPTY);
        self.reload_accumulator();
        true
    }

    /// Empties the grid, puts the cursor at the origin and drops the chord.
    pub fn clear_all(&mut self) {
        self.grid.clear();
        self.cursor = Position::origin();
        self.current_cell = Cell::EMPTY;
        self.active_dots.clear();
    }

    // === Event surface ===

    /// A dot key went down.
    ///
    /// Returns `false` if the dot was already held (key repeat); otherwise
    /// the dot is raised and written live to the grid.
    pub fn dot_press(&mut self, dot: Dot) -> bool {
        if !self.active_dots.insert(dot) {
            return false;
        }
        self.set_dot(dot);
        self.commit_chord();
        true
    }

    /// A dot key came up.
    ///
    /// Returns the cursor move if this release emptied the held set, which
    /// completes the chord. Releasing a dot that was not held does nothing.
    pub fn dot_release(&mut self, dot: Dot) -> Option<CursorTarget> {
        if !self.active_dots.remove(&dot) {
            return None;
        }
        if self.active_dots.is_empty() {
            Some(self.advance_after_chord_release())
        } else {
            None
        }
    }

    /// Relative cursor move (arrow keys).
    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) -> CursorTarget {
        self.advance_cursor(d_row, d_col)
    }

    /// Dispatches one event. Events are processed strictly in call order.
    pub fn apply(&mut self, event: InputEvent) -> EventOutcome {
        let before = self.cursor;
        let outcome = match event {
            InputEvent::DotPress { dot } => {
                if self.dot_press(dot) {
                    EventOutcome::accepted()
                } else {
                    EventOutcome::ignored()
                }
            }
            InputEvent::DotRelease { dot } => {
                let was_held = self.is_held(dot);
                match self.dot_release(dot) {
                    Some(target) => self.moved(target),
                    None if was_held => EventOutcome::accepted(),
                    None => EventOutcome::ignored(),
                }
            }
            InputEvent::MoveCursor { d_row, d_col } => {
                let target = self.move_cursor(d_row, d_col);
                self.moved(target)
            }
            InputEvent::Space => {
                let target = self.handle_space();
                self.moved(target)
            }
            InputEvent::Newline => {
                let target = self.handle_newline();
                self.moved(target)
            }
            InputEvent::Erase => {
                if self.handle_erase() {
                    EventOutcome::accepted()
                } else {
                    EventOutcome::ignored()
                }
            }
            InputEvent::ClearAll => {
                self.clear_all();
                EventOutcome::accepted()
            }
        };

        let outcome = EventOutcome {
            cursor_moved: outcome.cursor_moved || self.cursor != before,
            ..outcome
        };
        debug!(?event, cursor = %self.cursor, accepted = outcome.accepted, "event applied");
        outcome
    }

    fn moved(&self, target: CursorTarget) -> EventOutcome {
        EventOutcome {
            accepted: true,
            cursor_moved: false,
            scrolled: match target {
                CursorTarget::Scroll { lines, .. } => lines,
                _ => 0,
            },
        }
    }

    fn reload_accumulator(&mut self) {
        self.current_cell = self.grid.get(self.cursor).unwrap_or(Cell::EMPTY);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(GridSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(policy: BoundaryPolicy) -> Engine {
        Engine::new(GridSettings {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            boundary_policy: policy,
        })
    }

    fn type_chord(engine: &mut Engine, dots: &[Dot]) {
        for dot in dots {
            engine.dot_press(*dot);
        }
        for dot in dots {
            engine.dot_release(*dot);
        }
    }

    #[test]
    fn test_every_dot_lands_at_cursor() {
        for dot in Dot::ALL {
            let mut engine = Engine::default();
            engine.dot_press(dot);
            let cell = engine.grid().get(Position::origin()).unwrap();
            assert_eq!(cell, Cell::with_dots(&[dot]));
            assert_eq!(engine.cursor(), Position::origin());

            engine.dot_release(dot);
            assert_eq!(engine.cursor(), Position::new(0, 1));
            assert_eq!(engine.current_cell(), Cell::EMPTY);
        }
    }

    #[test]
    fn test_single_dot_scenario() {
        let mut engine = Engine::default();
        engine.dot_press(Dot::Dot1);
        engine.dot_release(Dot::Dot1);

        assert_eq!(engine.cursor(), Position::new(0, 1));
        assert_eq!(
            engine.grid().get(Position::origin()).unwrap().dots(),
            [true, false, false, false, false, false]
        );
    }

    #[test]
    fn test_dots_are_written_live() {
        let mut engine = Engine::default();
        engine.dot_press(Dot::Dot1);
        engine.dot_press(Dot::Dot4);

        assert_eq!(engine.chord_state(), ChordState::Accumulating);
        assert_eq!(
            engine.grid().get(Position::origin()),
            Some(Cell::with_dots(&[Dot::Dot1, Dot::Dot4]))
        );

        // Releasing one of two dots does not advance
        assert_eq!(engine.dot_release(Dot::Dot1), None);
        assert_eq!(engine.cursor(), Position::origin());

        assert!(engine.dot_release(Dot::Dot4).is_some());
        assert_eq!(engine.cursor(), Position::new(0, 1));
        assert_eq!(engine.chord_state(), ChordState::Idle);
    }

    #[test]
    fn test_repeat_press_is_ignored() {
        let mut engine = Engine::default();
        assert!(engine.dot_press(Dot::Dot2));
        assert!(!engine.dot_press(Dot::Dot2));
        assert_eq!(engine.active_dots().count(), 1);

        // A single release still completes the chord
        assert!(engine.dot_release(Dot::Dot2).is_some());
        assert_eq!(engine.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_stray_release_does_not_advance() {
        let mut engine = Engine::default();
        assert_eq!(engine.dot_release(Dot::Dot5), None);
        assert_eq!(engine.cursor(), Position::origin());

        let outcome = engine.apply(InputEvent::release(Dot::Dot5));
        assert!(!outcome.accepted);
    }

    #[test]
    fn test_commit_chord_copies_accumulator() {
        let mut engine = Engine::default();
        engine.set_dot(Dot::Dot3);
        engine.set_dot(Dot::Dot6);
        assert!(engine.grid().is_blank());

        engine.commit_chord();
        assert_eq!(engine.grid().get(Position::origin()), Some(engine.current_cell()));
    }

    #[test]
    fn test_accumulator_reloads_existing_cell() {
        let mut engine = Engine::default();
        type_chord(&mut engine, &[Dot::Dot1, Dot::Dot2]);
        engine.move_cursor(0, -1);

        assert_eq!(engine.current_cell(), Cell::with_dots(&[Dot::Dot1, Dot::Dot2]));

        // Adding a dot to an existing cell keeps the old dots
        type_chord(&mut engine, &[Dot::Dot3]);
        assert_eq!(
            engine.grid().get(Position::origin()),
            Some(Cell::with_dots(&[Dot::Dot1, Dot::Dot2, Dot::Dot3]))
        );
    }

    #[test]
    fn test_space_moves_without_writing() {
        let mut engine = Engine::default();
        engine.handle_space();
        assert_eq!(engine.cursor(), Position::new(0, 1));
        assert!(engine.grid().is_blank());
    }

    #[test]
    fn test_newline_reflects_target_contents() {
        let mut engine = Engine::default();
        let existing = Cell::with_dots(&[Dot::Dot2, Dot::Dot5]);
        engine.move_cursor(3, 0);
        type_chord(&mut engine, &[Dot::Dot2, Dot::Dot5]);

        engine.move_cursor(-1, 9);
        assert_eq!(engine.cursor(), Position::new(2, 10));

        engine.handle_newline();
        assert_eq!(engine.cursor(), Position::new(3, 0));
        assert_eq!(engine.current_cell(), existing);
    }

    #[test]
    fn test_newline_on_last_row_wrap_is_suppressed() {
        let mut engine = engine_with(BoundaryPolicy::Wrap);
        engine.move_cursor(DEFAULT_ROWS as isize - 1, 4);
        engine.handle_newline();
        assert_eq!(engine.cursor(), Position::new(DEFAULT_ROWS - 1, 4));
    }

    #[test]
    fn test_clamp_corner() {
        let mut engine = engine_with(BoundaryPolicy::Clamp);
        engine.move_cursor(DEFAULT_ROWS as isize, DEFAULT_COLS as isize);
        let corner = Position::new(DEFAULT_ROWS - 1, DEFAULT_COLS - 1);
        assert_eq!(engine.cursor(), corner);

        engine.advance_cursor(1, 1);
        assert_eq!(engine.cursor(), corner);
    }

    #[test]
    fn test_wrap_row_end() {
        let mut engine = engine_with(BoundaryPolicy::Wrap);
        engine.move_cursor(2, DEFAULT_COLS as isize - 1);
        engine.advance_cursor(0, 1);
        assert_eq!(engine.cursor(), Position::new(3, 0));

        let mut engine = engine_with(BoundaryPolicy::Wrap);
        engine.move_cursor(DEFAULT_ROWS as isize - 1, DEFAULT_COLS as isize - 1);
        let last = Position::new(DEFAULT_ROWS - 1, DEFAULT_COLS - 1);
        assert_eq!(engine.cursor(), last);
        engine.advance_cursor(0, 1);
        assert_eq!(engine.cursor(), last);
    }

    #[test]
    fn test_wrap_scroll_keeps_cursor_on_last_row() {
        let mut engine = engine_with(BoundaryPolicy::WrapScroll);
        type_chord(&mut engine, &[Dot::Dot1]);
        engine.move_cursor(1, -1);
        type_chord(&mut engine, &[Dot::Dot2]);

        // Walk down to the last row without scrolling
        for _ in 0..DEFAULT_ROWS - 2 {
            engine.handle_newline();
        }
        let last_row = DEFAULT_ROWS - 1;
        assert_eq!(engine.cursor().row, last_row);

        let rows_before: Vec<Cell> = engine.grid().iter_rows().map(|r| r[0]).collect();
        let outcome = engine.apply(InputEvent::Newline);
        assert_eq!(outcome.scrolled, 1);
        assert_eq!(engine.cursor(), Position::new(last_row, 0));

        let rows_after: Vec<Cell> = engine.grid().iter_rows().map(|r| r[0]).collect();
        assert_eq!(rows_before[0], Cell::with_dots(&[Dot::Dot1]));
        assert_eq!(rows_after[0], Cell::with_dots(&[Dot::Dot2]));
        assert_eq!(rows_after[..last_row], rows_before[1..]);
        assert_eq!(rows_after[last_row], Cell::EMPTY);
    }

    #[test]
    fn test_wrap_scroll_by_overshoot_of_several_rows() {
        let mut engine = engine_with(BoundaryPolicy::WrapScroll);
        for (row, dot) in Dot::ALL.iter().take(4).enumerate() {
            engine.move_cursor(row as isize - engine.cursor().row as isize, 0);
            type_chord(&mut engine, &[*dot]);
            engine.move_cursor(0, -1);
        }
        engine.move_cursor((DEFAULT_ROWS - 4) as isize, 0);
        let last_row = DEFAULT_ROWS - 1;
        assert_eq!(engine.cursor().row, last_row);

        let before: Vec<Cell> = engine.grid().iter_rows().map(|r| r[0]).collect();
        let outcome = engine.apply(InputEvent::move_by(3, 0));
        assert_eq!(outcome.scrolled, 3);
        assert_eq!(engine.cursor(), Position::new(last_row, 0));

        let after: Vec<Cell> = engine.grid().iter_rows().map(|r| r[0]).collect();
        assert_eq!(after[0], Cell::with_dots(&[Dot::Dot4]));
        assert_eq!(after[..DEFAULT_ROWS - 3], before[3..]);
        assert!(after[DEFAULT_ROWS - 3..].iter().all(Cell::is_empty));
    }

    #[test]
    fn test_wrap_scroll_past_whole_grid_empties_it() {
        let mut engine = engine_with(BoundaryPolicy::WrapScroll);
        type_chord(&mut engine, &[Dot::Dot1, Dot::Dot2]);
        engine.move_cursor(DEFAULT_ROWS as isize - 1, 0);

        let outcome = engine.apply(InputEvent::move_by(DEFAULT_ROWS as isize * 4, 0));
        assert_eq!(outcome.scrolled, DEFAULT_ROWS);
        assert!(engine.grid().is_blank());
        assert_eq!(engine.grid().rows(), DEFAULT_ROWS);
    }

    #[test]
    fn test_extreme_moves_are_total() {
        for policy in BoundaryPolicy::ALL {
            let mut engine = engine_with(policy);
            engine.apply(InputEvent::move_by(5, 0));
            for (dr, dc) in [
                (isize::MAX, 0),
                (isize::MIN, 0),
                (0, isize::MAX),
                (0, isize::MIN),
                (isize::MIN, isize::MAX),
            ] {
                engine.apply(InputEvent::move_by(dr, dc));
                assert!(engine.grid().contains(engine.cursor()));
            }
        }

        let mut engine = engine_with(BoundaryPolicy::Clamp);
        engine.apply(InputEvent::move_by(5, 0));
        engine.apply(InputEvent::move_by(isize::MAX, 0));
        assert_eq!(engine.cursor(), Position::new(DEFAULT_ROWS - 1, 0));
    }

    #[test]
    fn test_erase_at_origin_is_noop() {
        let mut engine = Engine::default();
        engine.dot_press(Dot::Dot1);
        engine.dot_release(Dot::Dot1);
        engine.move_cursor(0, -1);

        assert!(!engine.handle_erase());
        assert_eq!(engine.cursor(), Position::origin());
        assert_eq!(
            engine.grid().get(Position::origin()),
            Some(Cell::with_dots(&[Dot::Dot1]))
        );
    }

    #[test]
    fn test_erase_wraps_to_previous_row() {
        let mut engine = Engine::default();
        engine.move_cursor(0, DEFAULT_COLS as isize - 1);
        type_chord(&mut engine, &[Dot::Dot6]);
        assert_eq!(engine.cursor(), Position::new(1, 0));

        assert!(engine.handle_erase());
        assert_eq!(engine.cursor(), Position::new(0, DEFAULT_COLS - 1));
        assert!(engine.grid().is_blank());
        assert_eq!(engine.current_cell(), Cell::EMPTY);
    }

    #[test]
    fn test_erase_ignores_clamp_policy() {
        let mut engine = engine_with(BoundaryPolicy::Clamp);
        engine.move_cursor(4, 0);
        assert!(engine.handle_erase());
        assert_eq!(engine.cursor(), Position::new(3, DEFAULT_COLS - 1));
    }

    #[test]
    fn test_clear_all_scenario() {
        let mut engine = Engine::default();
        engine.move_cursor(3, 5);
        engine.dot_press(Dot::Dot1);
        engine.dot_press(Dot::Dot3);
        engine.dot_press(Dot::Dot5);

        engine.clear_all();

        assert!(engine.grid().is_blank());
        assert_eq!(engine.cursor(), Position::origin());
        assert_eq!(engine.current_cell(), Cell::EMPTY);
        assert_eq!(engine.chord_state(), ChordState::Idle);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut engine = Engine::default();
        engine.apply(InputEvent::press(Dot::Dot4));

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.rows, DEFAULT_ROWS);
        assert_eq!(snapshot.cols, DEFAULT_COLS);
        assert_eq!(snapshot.active_dots, vec![Dot::Dot4]);
        assert_eq!(snapshot.grid[0][0], Cell::with_dots(&[Dot::Dot4]));
        assert_eq!(snapshot.chord_state, ChordState::Accumulating);
    }

    #[test]
    fn test_set_policy_keeps_contents() {
        let mut engine = Engine::default();
        type_chord(&mut engine, &[Dot::Dot1]);
        engine.set_policy(BoundaryPolicy::Clamp);

        assert_eq!(engine.policy(), BoundaryPolicy::Clamp);
        assert_eq!(engine.cursor(), Position::new(0, 1));
        assert!(!engine.grid().is_blank());
    }

    #[test]
    fn test_apply_reports_cursor_motion() {
        let mut engine = Engine::default();
        assert!(!engine.apply(InputEvent::move_by(-1, 0)).cursor_moved);
        assert!(engine.apply(InputEvent::Space).cursor_moved);
        assert!(engine.apply(InputEvent::Erase).cursor_moved);
    }
}
