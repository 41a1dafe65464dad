//! End-to-end typing scenarios driven through `Engine::apply`.

mod fixtures;
use fixtures::{chord, engine, type_cells};

use brailler::engine::{BoundaryPolicy, ChordState, Engine, GridSettings, InputEvent};
use brailler::export::grid_to_unicode;
use brailler::models::{Cell, Dot, Position};

const ROWS: usize = 20;
const COLS: usize = 25;

#[test]
fn test_every_dot_sets_its_slot() {
    for dot in Dot::ALL {
        let mut engine = engine(ROWS, COLS);
        engine.apply(InputEvent::press(dot));

        let cell = engine.grid().get(Position::origin()).unwrap();
        assert_eq!(cell, Cell::with_dots(&[dot]), "{dot}");

        engine.apply(InputEvent::release(dot));
        assert_eq!(engine.cursor(), Position::new(0, 1));
        assert_eq!(engine.current_cell(), Cell::EMPTY);
    }
}

#[test]
fn test_single_dot_scenario() {
    let mut engine = engine(ROWS, COLS);
    chord(&mut engine, &[Dot::Dot1]);

    assert_eq!(engine.cursor(), Position::new(0, 1));
    assert_eq!(
        engine.grid().get(Position::origin()).unwrap().dots(),
        [true, false, false, false, false, false]
    );
}

#[test]
fn test_repeat_press_is_idempotent() {
    let mut engine = engine(ROWS, COLS);
    engine.apply(InputEvent::press(Dot::Dot2));
    let outcome = engine.apply(InputEvent::press(Dot::Dot2));
    assert!(!outcome.accepted);

    // One release closes the chord: the repeat did not count twice
    engine.apply(InputEvent::release(Dot::Dot2));
    assert_eq!(engine.cursor(), Position::new(0, 1));
    assert_eq!(engine.chord_state(), ChordState::Idle);
}

#[test]
fn test_cell_written_live_while_accumulating() {
    let mut engine = engine(ROWS, COLS);
    engine.apply(InputEvent::press(Dot::Dot1));
    engine.apply(InputEvent::press(Dot::Dot4));
    assert_eq!(engine.chord_state(), ChordState::Accumulating);
    assert_eq!(
        engine.grid().get(Position::origin()),
        Some(Cell::with_dots(&[Dot::Dot1, Dot::Dot4]))
    );
    assert_eq!(engine.grid().get(Position::origin()), Some(engine.current_cell()));

    // Partial release keeps the cursor in place
    engine.apply(InputEvent::release(Dot::Dot1));
    assert_eq!(engine.cursor(), Position::origin());
    engine.apply(InputEvent::release(Dot::Dot4));
    assert_eq!(engine.cursor(), Position::new(0, 1));
}

#[test]
fn test_typing_a_word() {
    // "hello" in uncontracted braille
    let h: &[Dot] = &[Dot::Dot1, Dot::Dot2, Dot::Dot5];
    let e: &[Dot] = &[Dot::Dot1, Dot::Dot5];
    let l: &[Dot] = &[Dot::Dot1, Dot::Dot2, Dot::Dot3];
    let o: &[Dot] = &[Dot::Dot1, Dot::Dot3, Dot::Dot5];

    let mut engine = engine(ROWS, COLS);
    type_cells(&mut engine, &[h, e, l, l, o]);

    assert_eq!(engine.cursor(), Position::new(0, 5));
    assert_eq!(grid_to_unicode(engine.grid()), "⠓⠑⠇⠇⠕");
}

#[test]
fn test_clear_all_scenario() {
    let mut engine = engine(ROWS, COLS);
    engine.apply(InputEvent::move_by(3, 5));
    assert_eq!(engine.cursor(), Position::new(3, 5));
    chord(&mut engine, &[Dot::Dot1, Dot::Dot3, Dot::Dot5]);

    engine.apply(InputEvent::ClearAll);
    assert!(engine.grid().is_blank());
    assert_eq!(engine.cursor(), Position::origin());
    assert_eq!(engine.current_cell(), Cell::EMPTY);
}

#[test]
fn test_newline_loads_existing_cell() {
    let mut engine = engine(ROWS, COLS);
    engine.apply(InputEvent::move_by(3, 0));
    chord(&mut engine, &[Dot::Dot6]);

    engine.apply(InputEvent::move_by(-1, 9));
    assert_eq!(engine.cursor(), Position::new(2, 10));
    engine.apply(InputEvent::Newline);

    assert_eq!(engine.cursor(), Position::new(3, 0));
    assert_eq!(engine.current_cell(), Cell::with_dots(&[Dot::Dot6]));
}

#[test]
fn test_erase_at_origin_is_noop() {
    let mut engine = engine(ROWS, COLS);
    let outcome = engine.apply(InputEvent::Erase);
    assert!(!outcome.accepted);
    assert_eq!(engine.cursor(), Position::origin());
}

#[test]
fn test_erase_wraps_to_previous_row() {
    let mut engine = engine(ROWS, COLS);
    engine.apply(InputEvent::move_by(1, COLS as isize - 1));
    chord(&mut engine, &[Dot::Dot2]);
    assert_eq!(engine.cursor(), Position::new(2, 0));

    engine.apply(InputEvent::Erase);
    assert_eq!(engine.cursor(), Position::new(1, COLS - 1));
    assert_eq!(engine.grid().get(engine.cursor()), Some(Cell::EMPTY));
    assert!(engine.grid().is_blank());
}

#[test]
fn test_clamp_at_bottom_right() {
    let mut engine = Engine::new(GridSettings {
        rows: ROWS,
        cols: COLS,
        boundary_policy: BoundaryPolicy::Clamp,
    });
    engine.apply(InputEvent::move_by(ROWS as isize - 1, COLS as isize - 1));
    engine.apply(InputEvent::move_by(1, 1));
    assert_eq!(engine.cursor(), Position::new(ROWS - 1, COLS - 1));

    // Committing a chord in the last cell stays put too
    chord(&mut engine, &[Dot::Dot3]);
    assert_eq!(engine.cursor(), Position::new(ROWS - 1, COLS - 1));
}

#[test]
fn test_wrap_to_next_row() {
    let mut engine = engine(ROWS, COLS);
    engine.apply(InputEvent::move_by(4, COLS as isize - 1));
    engine.apply(InputEvent::Space);
    assert_eq!(engine.cursor(), Position::new(5, 0));
}

#[test]
fn test_wrap_suppressed_past_last_cell() {
    let mut engine = engine(ROWS, COLS);
    engine.apply(InputEvent::move_by(ROWS as isize - 1, COLS as isize - 1));
    let outcome = engine.apply(InputEvent::Space);
    assert!(!outcome.cursor_moved);
    assert_eq!(engine.cursor(), Position::new(ROWS - 1, COLS - 1));
}

#[test]
fn test_wrap_scroll_keeps_typing() {
    let mut engine = Engine::new(GridSettings {
        rows: 3,
        cols: 2,
        boundary_policy: BoundaryPolicy::WrapScroll,
    });
    let a: &[Dot] = &[Dot::Dot1];
    let b: &[Dot] = &[Dot::Dot1, Dot::Dot2];
    // Everything but the last cell
    type_cells(&mut engine, &[a, a, b, b, a]);
    assert_eq!(engine.cursor(), Position::new(2, 1));

    let c: &[Dot] = &[Dot::Dot1, Dot::Dot4];
    chord(&mut engine, c);

    // First row scrolled away, cursor pinned to the last row
    assert_eq!(engine.cursor(), Position::new(2, 0));
    assert_eq!(grid_to_unicode(engine.grid()), "⠃⠃\n⠁⠉");
}

#[test]
fn test_policy_switch_keeps_contents() {
    let mut engine = engine(ROWS, COLS);
    chord(&mut engine, &[Dot::Dot4, Dot::Dot5]);
    engine.set_policy(BoundaryPolicy::Clamp);
    assert_eq!(engine.policy(), BoundaryPolicy::Clamp);
    assert_eq!(grid_to_unicode(engine.grid()), "⠘");
}

#[test]
fn test_snapshot_reflects_state() {
    let mut engine = engine(4, 6);
    chord(&mut engine, &[Dot::Dot1]);
    engine.apply(InputEvent::press(Dot::Dot2));

    let snapshot = engine.snapshot();
    assert_eq!((snapshot.rows, snapshot.cols), (4, 6));
    assert_eq!(snapshot.cursor, Position::new(0, 1));
    assert_eq!(snapshot.active_dots, vec![Dot::Dot2]);
    assert_eq!(snapshot.chord_state, ChordState::Accumulating);
    assert_eq!(snapshot.grid[0][0], Cell::with_dots(&[Dot::Dot1]));
    assert_eq!(snapshot.grid[0][1], Cell::with_dots(&[Dot::Dot2]));
}

#[test]
fn test_independent_engines() {
    let mut first = engine(ROWS, COLS);
    let second = engine(ROWS, COLS);
    chord(&mut first, &[Dot::Dot1]);
    assert!(second.grid().is_blank());
    assert_eq!(second.cursor(), Position::origin());
}
