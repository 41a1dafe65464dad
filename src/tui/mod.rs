//! Terminal user interface: state, event loop and widgets.
//!
//! Key and mouse events are translated into engine events; the engine is
//! the single owner of grid, cursor and chord state.

// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod clipboard;
pub mod grid_view;
pub mod help_overlay;
pub mod key_pad;
pub mod status_bar;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::calibration::KeyCalibrator;
use crate::config::Config;
use crate::constants::APP_NAME;
use crate::engine::{Engine, InputEvent};
use crate::export;
use crate::input::{Action, Command, KeyTranslator, ReleaseMode, ShortcutRegistry};
use crate::models::Dot;

pub use grid_view::{GridWidget, Viewport};
pub use help_overlay::HelpOverlay;
pub use key_pad::KeyPad;
pub use status_bar::StatusBar;
pub use theme::Theme;

/// Longest wait between redraws when nothing happens.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Screen regions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Title bar
    pub title: Rect,
    /// Braille page
    pub grid: Rect,
    /// On-screen keys
    pub key_pad: Rect,
    /// Status bar
    pub status: Rect,
}

impl ScreenAreas {
    /// Splits the full screen.
    #[must_use]
    pub fn split(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                       // Title bar
                Constraint::Min(3),                          // Page
                Constraint::Length(key_pad::PAD_HEIGHT),     // Key pad
                Constraint::Length(status_bar::STATUS_HEIGHT), // Status bar
            ])
            .split(area);
        Self {
            title: chunks[0],
            grid: chunks[1],
            key_pad: chunks[2],
            status: chunks[3],
        }
    }
}

/// Application state for the TUI.
pub struct AppState {
    // Core data
    /// Chord and cursor engine
    pub engine: Engine,
    /// Application configuration
    pub config: Config,

    // Input
    /// Key event translator
    pub translator: KeyTranslator,
    /// Adaptive offsets for the on-screen keys
    pub calibrator: KeyCalibrator,
    /// Dot currently held with the mouse
    pub mouse_dot: Option<Dot>,

    // UI state
    /// Current UI theme
    pub theme: Theme,
    /// Visible part of the page
    pub viewport: Viewport,
    /// Whether the help overlay is shown
    pub show_help: bool,
    /// Status bar message
    pub status_message: String,
    /// Current error message (if any)
    pub error_message: Option<String>,

    // Control flags
    /// Whether application should exit
    pub should_quit: bool,
}

impl AppState {
    /// Creates the state from a validated configuration.
    #[must_use]
    pub fn new(config: Config, release_mode: ReleaseMode) -> Self {
        let registry = ShortcutRegistry::new(&config.keys.dot_keys);
        let translator = KeyTranslator::new(
            registry,
            release_mode,
            Duration::from_millis(config.keys.chord_timeout_ms),
        );
        let calibrator = KeyCalibrator::new(
            config.calibration,
            key_pad::calibration_layout(Rect::default()),
        );
        let status_message = match release_mode {
            ReleaseMode::Reported => "Ready. Hold dot keys together, release to commit.".to_string(),
            ReleaseMode::Timeout => format!(
                "Ready. Chords close {} ms after the last key press.",
                config.keys.chord_timeout_ms
            ),
        };

        Self {
            engine: Engine::new(config.grid),
            theme: Theme::from_mode(config.ui.theme_mode),
            show_help: config.ui.show_help_on_startup,
            config,
            translator,
            calibrator,
            mouse_dot: None,
            viewport: Viewport::default(),
            status_message,
            error_message: None,
            should_quit: false,
        }
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Set error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error_message = Some(error.into());
    }

    /// Clear error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Feeds one event to the engine.
    pub fn apply_input(&mut self, event: InputEvent) {
        let outcome = self.engine.apply(event);
        if outcome.scrolled > 0 {
            self.set_status(format!("Scrolled {} line(s)", outcome.scrolled));
        }
        if event == InputEvent::ClearAll {
            self.translator.reset();
            self.mouse_dot = None;
            self.set_status("Grid cleared");
        }
    }

    /// Runs a command produced by the translator.
    pub fn run_command(&mut self, command: Command) {
        match command {
            Command::Input(event) => self.apply_input(event),
            Command::App(action) => self.handle_action(action),
        }
    }

    /// Handles actions that live outside the engine.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::CopyBraille => match clipboard::copy_grid(self.engine.grid()) {
                Ok(lines) => self.set_status(format!("Copied {lines} line(s) of braille")),
                Err(e) => self.set_error(format!("{e:#}")),
            },
            Action::ExportSnapshot => match export::write_snapshot(self.engine.grid(), None) {
                Ok(path) => self.set_status(format!("Saved {}", path.display())),
                Err(e) => self.set_error(format!("{e:#}")),
            },
            Action::CycleBoundaryPolicy => {
                let policy = self.engine.policy().next();
                self.engine.set_policy(policy);
                self.set_status(format!("Boundary policy: {policy}"));
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Cancel => {
                self.show_help = false;
                self.status_message.clear();
            }
            Action::Quit => self.should_quit = true,
            other => {
                if let Some(event) = other.engine_event() {
                    self.apply_input(event);
                }
            }
        }
    }

    /// Keeps the cursor inside the visible part of the page.
    pub fn follow_cursor(&mut self, screen: Rect) {
        let areas = ScreenAreas::split(screen);
        let (rows, cols) = grid_view::visible_cells(areas.grid);
        self.viewport.follow(self.engine.cursor(), rows, cols);
    }
}

/// Initialize terminal for TUI
///
/// Key release reporting is requested where the terminal supports it; the
/// returned mode tells the translator whether releases will arrive.
pub fn setup_terminal() -> Result<(Terminal<CrosstermBackend<io::Stdout>>, ReleaseMode)> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let mode = if supports_keyboard_enhancement().unwrap_or(false) {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )
        .context("Failed to enable key release reporting")?;
        ReleaseMode::Reported
    } else {
        ReleaseMode::Timeout
    };
    info!(?mode, "terminal ready");

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok((terminal, mode))
}

/// Restore terminal to normal state
pub fn restore_terminal(
    mut terminal: Terminal<CrosstermBackend<io::Stdout>>,
    mode: ReleaseMode,
) -> Result<()> {
    if mode == ReleaseMode::Reported {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
            .context("Failed to restore keyboard mode")?;
    }
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        let size = terminal.size().context("Failed to read terminal size")?;
        let screen = Rect::new(0, 0, size.width, size.height);
        state.follow_cursor(screen);

        terminal.draw(|f| render(f, state))?;

        // Wake up in time to close a pending chord
        let now = Instant::now();
        let timeout = state
            .translator
            .time_until_release(now)
            .map_or(IDLE_POLL, |left| left.min(IDLE_POLL));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handle_key_event(state, key, Instant::now()),
                Event::Mouse(mouse) => handle_mouse_event(state, mouse, screen),
                // Terminal resized, will re-render on next loop
                _ => {}
            }
        }

        for command in state.translator.tick(Instant::now()) {
            state.run_command(command);
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Render the UI from current state
fn render(f: &mut Frame, state: &AppState) {
    let full_bg = Block::default().style(Style::default().bg(state.theme.background));
    f.render_widget(full_bg, f.area());

    let areas = ScreenAreas::split(f.area());

    render_title_bar(f, areas.title, state);
    GridWidget::render(f, areas.grid, state);
    KeyPad::render(f, areas.key_pad, state);
    StatusBar::render(f, areas.status, state, &state.theme);

    if state.show_help {
        HelpOverlay::render(f, f.area(), state.translator.registry(), &state.theme);
    }

    // Render error overlay on top of everything if error is present
    if let Some(ref error) = state.error_message {
        render_error_overlay(f, error, &state.theme);
    }
}

/// Render title bar with grid size and boundary policy
fn render_title_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let grid = state.engine.grid();
    let title = format!(
        " {} v{}  |  {}x{} cells  |  {} ",
        APP_NAME,
        env!("CARGO_PKG_VERSION"),
        grid.rows(),
        grid.cols(),
        state.engine.policy()
    );

    let title_widget = Paragraph::new(title)
        .style(
            Style::default()
                .fg(state.theme.primary)
                .bg(state.theme.background),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(state.theme.background)),
        );

    f.render_widget(title_widget, area);
}

/// Render error overlay on top of all other UI elements
fn render_error_overlay(f: &mut Frame, error: &str, theme: &Theme) {
    let area = centered_rect(70, 30, f.area());
    f.render_widget(Clear, area);

    let text = vec![
        Line::from(error.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "Enter/Esc",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Dismiss"),
        ]),
    ];
    let widget = Paragraph::new(text)
        .style(Style::default().fg(theme.text).bg(theme.background))
        .block(
            Block::default()
                .title(" ERROR ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(widget, area);
}

/// Helper to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Handle keyboard input events
pub fn handle_key_event(state: &mut AppState, key: KeyEvent, now: Instant) {
    // If error overlay is shown, allow dismissing with Enter or Esc
    if state.error_message.is_some() {
        if key.kind == KeyEventKind::Press && matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.clear_error();
        }
        return;
    }

    let commands = state.translator.translate(key, now);

    // The overlay swallows typing but still lets held chords finish
    if state.show_help {
        for command in commands {
            match command {
                Command::App(Action::ToggleHelp | Action::Cancel) => state.show_help = false,
                Command::App(Action::Quit) => state.should_quit = true,
                Command::Input(event @ InputEvent::DotRelease { .. }) => state.apply_input(event),
                _ => {}
            }
        }
        return;
    }

    for command in commands {
        state.run_command(command);
    }
}

/// Handle mouse presses on the on-screen keys
pub fn handle_mouse_event(state: &mut AppState, mouse: MouseEvent, screen: Rect) {
    // Overlays swallow clicks, but a held mouse dot must still be released
    let overlay = state.show_help || state.error_message.is_some();
    if overlay && mouse.kind != MouseEventKind::Up(MouseButton::Left) {
        return;
    }

    let areas = ScreenAreas::split(screen);
    state
        .calibrator
        .set_layout(key_pad::calibration_layout(areas.key_pad));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            // Aim at the middle of the terminal cell
            let x = f32::from(mouse.column) + 0.5;
            let y = f32::from(mouse.row) + 0.5;
            let Some(dot) = state.calibrator.hit_test(x, y) else {
                return;
            };
            if state.config.ui.adaptive_keys {
                state.calibrator.record_press(dot, x, y);
                debug!(%dot, samples = state.calibrator.samples(dot), "calibration sample");
            }
            if state.mouse_dot.is_none() {
                state.mouse_dot = Some(dot);
                state.apply_input(InputEvent::press(dot));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(dot) = state.mouse_dot.take() {
                state.apply_input(InputEvent::release(dot));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeMode;
    use crate::models::{Cell, Position};
    use crossterm::event::KeyModifiers;

    fn state() -> AppState {
        let mut config = Config::default();
        config.ui.theme_mode = ThemeMode::Dark;
        config.ui.show_help_on_startup = false;
        AppState::new(config, ReleaseMode::Reported)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        let mut event = press(code);
        event.kind = KeyEventKind::Release;
        event
    }

    #[test]
    fn test_keyboard_chord_commits_cell() {
        let mut state = state();
        let now = Instant::now();
        handle_key_event(&mut state, press(KeyCode::Char('f')), now);
        handle_key_event(&mut state, press(KeyCode::Char('d')), now);
        handle_key_event(&mut state, release(KeyCode::Char('f')), now);
        handle_key_event(&mut state, release(KeyCode::Char('d')), now);

        assert_eq!(
            state.engine.grid().get(Position::origin()),
            Some(Cell::with_dots(&[Dot::Dot1, Dot::Dot2]))
        );
        assert_eq!(state.engine.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_help_blocks_typing() {
        let mut state = state();
        state.show_help = true;
        let now = Instant::now();
        handle_key_event(&mut state, press(KeyCode::Char(' ')), now);
        assert_eq!(state.engine.cursor(), Position::origin());

        handle_key_event(&mut state, press(KeyCode::Esc), now);
        assert!(!state.show_help);
    }

    #[test]
    fn test_error_blocks_input_until_dismissed() {
        let mut state = state();
        state.set_error("boom");
        let now = Instant::now();
        handle_key_event(&mut state, press(KeyCode::Char(' ')), now);
        assert_eq!(state.engine.cursor(), Position::origin());

        handle_key_event(&mut state, press(KeyCode::Enter), now);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn test_cycle_policy() {
        let mut state = state();
        state.handle_action(Action::CycleBoundaryPolicy);
        assert_eq!(state.engine.policy(), crate::engine::BoundaryPolicy::WrapScroll);
    }

    #[test]
    fn test_mouse_press_and_release() {
        let mut state = state();
        let screen = Rect::new(0, 0, 80, 40);
        let areas = ScreenAreas::split(screen);
        let key = key_pad::key_rects(areas.key_pad)[Dot::Dot4.index()];

        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: key.x + 1,
            row: key.y + 1,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut state, down, screen);
        assert!(state.engine.is_held(Dot::Dot4));

        let up = MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            ..down
        };
        handle_mouse_event(&mut state, up, screen);
        assert_eq!(
            state.engine.grid().get(Position::origin()),
            Some(Cell::with_dots(&[Dot::Dot4]))
        );
    }

    #[test]
    fn test_mouse_release_reaches_engine_under_help() {
        let mut state = state();
        let screen = Rect::new(0, 0, 80, 40);
        let areas = ScreenAreas::split(screen);
        let key = key_pad::key_rects(areas.key_pad)[Dot::Dot2.index()];

        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: key.x + 1,
            row: key.y + 1,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut state, down, screen);
        assert!(state.engine.is_held(Dot::Dot2));

        handle_key_event(&mut state, press(KeyCode::F(1)), Instant::now());
        assert!(state.show_help);

        // A second click is swallowed by the overlay
        handle_mouse_event(&mut state, down, screen);

        let up = MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            ..down
        };
        handle_mouse_event(&mut state, up, screen);
        assert!(state.mouse_dot.is_none());
        assert!(!state.engine.is_held(Dot::Dot2));
        assert_eq!(
            state.engine.grid().get(Position::origin()),
            Some(Cell::with_dots(&[Dot::Dot2]))
        );
        assert_eq!(state.engine.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_adaptive_keys_record_samples() {
        let mut state = state();
        state.config.ui.adaptive_keys = true;
        let screen = Rect::new(0, 0, 80, 40);
        let areas = ScreenAreas::split(screen);
        let key = key_pad::key_rects(areas.key_pad)[Dot::Dot1.index()];

        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: key.x,
            row: key.y,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut state, down, screen);
        assert_eq!(state.calibrator.samples(Dot::Dot1), 1);
    }

    #[test]
    fn test_viewport_follows_cursor() {
        let mut config = Config::default();
        config.ui.theme_mode = ThemeMode::Dark;
        config.grid.rows = 100;
        let mut state = AppState::new(config, ReleaseMode::Reported);
        for _ in 0..60 {
            state.apply_input(InputEvent::Newline);
        }
        let screen = Rect::new(0, 0, 80, 40);
        state.follow_cursor(screen);
        let (rows, _) = grid_view::visible_cells(ScreenAreas::split(screen).grid);
        assert!(state.viewport.row <= 60);
        assert!(60 < state.viewport.row + rows);
    }
}
