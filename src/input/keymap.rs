//! Centralized shortcut and action system.
//!
//! Maps crossterm key events to actions. Dot keys come from configuration;
//! everything else has a fixed binding.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::engine::InputEvent;
use crate::models::Dot;

/// All possible actions in the terminal front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // === CHORD INPUT ===
    /// A dot key of the six-key chord
    Dot(Dot),
    /// Blank cell, move right
    Space,
    /// Start of the next row
    Newline,
    /// Delete backwards
    Erase,

    // === NAVIGATION ===
    /// Cursor up
    NavigateUp,
    /// Cursor down
    NavigateDown,
    /// Cursor left
    NavigateLeft,
    /// Cursor right
    NavigateRight,

    // === GRID ===
    /// Empty the whole grid
    ClearAll,
    /// Switch to the next boundary policy
    CycleBoundaryPolicy,

    // === OUTPUT ===
    /// Copy the grid as braille text to the system clipboard
    CopyBraille,
    /// Write the grid as braille text to a file
    ExportSnapshot,

    // === GENERAL ===
    /// Show or hide the help overlay
    ToggleHelp,
    /// Leave the application
    Quit,
    /// Close overlays, dismiss messages
    Cancel,
}

impl Action {
    /// Stable action identifier.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Dot(_) => "dot",
            Self::Space => "space",
            Self::Newline => "newline",
            Self::Erase => "erase",
            Self::NavigateUp => "navigate_up",
            Self::NavigateDown => "navigate_down",
            Self::NavigateLeft => "navigate_left",
            Self::NavigateRight => "navigate_right",
            Self::ClearAll => "clear_all",
            Self::CycleBoundaryPolicy => "cycle_boundary_policy",
            Self::CopyBraille => "copy_braille",
            Self::ExportSnapshot => "export_snapshot",
            Self::ToggleHelp => "toggle_help",
            Self::Quit => "quit",
            Self::Cancel => "cancel",
        }
    }

    /// Short description for help text.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Dot(_) => "Chord key",
            Self::Space => "Blank cell",
            Self::Newline => "Next line",
            Self::Erase => "Erase previous cell",
            Self::NavigateUp => "Cursor up",
            Self::NavigateDown => "Cursor down",
            Self::NavigateLeft => "Cursor left",
            Self::NavigateRight => "Cursor right",
            Self::ClearAll => "Clear grid",
            Self::CycleBoundaryPolicy => "Next boundary policy",
            Self::CopyBraille => "Copy braille text",
            Self::ExportSnapshot => "Export to file",
            Self::ToggleHelp => "Help",
            Self::Quit => "Quit",
            Self::Cancel => "Close help, dismiss message",
        }
    }

    /// The engine event for actions the engine handles directly.
    ///
    /// Dot actions are excluded: they need press/release information that
    /// only the translator has.
    #[must_use]
    pub const fn engine_event(&self) -> Option<InputEvent> {
        match self {
            Self::Space => Some(InputEvent::Space),
            Self::Newline => Some(InputEvent::Newline),
            Self::Erase => Some(InputEvent::Erase),
            Self::NavigateUp => Some(InputEvent::move_by(-1, 0)),
            Self::NavigateDown => Some(InputEvent::move_by(1, 0)),
            Self::NavigateLeft => Some(InputEvent::move_by(0, -1)),
            Self::NavigateRight => Some(InputEvent::move_by(0, 1)),
            Self::ClearAll => Some(InputEvent::ClearAll),
            _ => None,
        }
    }

    /// Whether holding the key should repeat the action.
    #[must_use]
    pub const fn repeats(&self) -> bool {
        matches!(
            self,
            Self::Space
                | Self::Erase
                | Self::NavigateUp
                | Self::NavigateDown
                | Self::NavigateLeft
                | Self::NavigateRight
        )
    }
}

/// A key binding (key + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// Key code
    pub code: KeyCode,
    /// Modifier keys
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a new key binding.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a key binding from a KeyEvent.
    #[must_use]
    pub const fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Shortcut registry that maps key events to actions.
///
/// This is the central source of truth for all keyboard shortcuts.
#[derive(Debug, Clone)]
pub struct ShortcutRegistry {
    bindings: HashMap<KeyBinding, Action>,
    /// Human-readable binding labels, in registration order, for help text
    labels: Vec<(String, Action)>,
}

impl ShortcutRegistry {
    /// Create a registry with the given dot keys (dots 1-6 in order).
    ///
    /// Dot keys are matched case-insensitively. Keys beyond the sixth are
    /// ignored; configuration validation rejects such lists anyway.
    #[must_use]
    pub fn new(dot_keys: &[char]) -> Self {
        let mut registry = Self {
            bindings: HashMap::new(),
            labels: Vec::new(),
        };

        registry.register_fixed_shortcuts();
        registry.register_dot_keys(dot_keys);
        registry
    }

    fn register_dot_keys(&mut self, dot_keys: &[char]) {
        for (dot, key) in Dot::ALL.into_iter().zip(dot_keys) {
            let lower = key.to_ascii_lowercase();
            let upper = key.to_ascii_uppercase();
            self.register(KeyCode::Char(lower), KeyModifiers::NONE, Action::Dot(dot));
            if upper != lower {
                // Shift held or caps lock on
                self.register(KeyCode::Char(upper), KeyModifiers::SHIFT, Action::Dot(dot));
                self.register(KeyCode::Char(upper), KeyModifiers::NONE, Action::Dot(dot));
            }
            self.labels.push((lower.to_string(), Action::Dot(dot)));
        }
    }

    fn register_fixed_shortcuts(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        // === CHORD INPUT ===
        self.bind(K::Char(' '), M::NONE, Action::Space, "Space");
        self.bind(K::Enter, M::NONE, Action::Newline, "Enter");
        self.bind(K::Backspace, M::NONE, Action::Erase, "Backspace");

        // === NAVIGATION ===
        self.bind(K::Up, M::NONE, Action::NavigateUp, "Up");
        self.bind(K::Down, M::NONE, Action::NavigateDown, "Down");
        self.bind(K::Left, M::NONE, Action::NavigateLeft, "Left");
        self.bind(K::Right, M::NONE, Action::NavigateRight, "Right");

        // === GRID ===
        self.bind(K::Char('n'), M::CONTROL, Action::ClearAll, "Ctrl+N");
        self.bind(K::Char('p'), M::CONTROL, Action::CycleBoundaryPolicy, "Ctrl+P");

        // === OUTPUT ===
        self.bind(K::Char('y'), M::CONTROL, Action::CopyBraille, "Ctrl+Y");
        self.bind(K::Char('s'), M::CONTROL, Action::ExportSnapshot, "Ctrl+S");

        // === GENERAL ===
        self.bind(K::F(1), M::NONE, Action::ToggleHelp, "F1");
        self.bind(K::Char('q'), M::CONTROL, Action::Quit, "Ctrl+Q");
        self.register(K::Char('c'), M::CONTROL, Action::Quit);
        self.bind(K::Esc, M::NONE, Action::Cancel, "Esc");
    }

    fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: Action, label: &str) {
        self.register(code, modifiers, action);
        self.labels.push((label.to_string(), action));
    }

    /// Register a shortcut binding.
    fn register(&mut self, code: KeyCode, modifiers: KeyModifiers, action: Action) {
        let binding = KeyBinding::new(code, modifiers);
        self.bindings.insert(binding, action);
    }

    /// Look up an action for a key event.
    #[must_use]
    pub fn lookup(&self, event: KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(event);
        self.bindings.get(&binding).copied()
    }

    /// Key label and action pairs, in registration order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, Action)> {
        self.labels.iter().map(|(label, action)| (label.as_str(), *action))
    }

    /// Label of the key assigned to `dot`.
    #[must_use]
    pub fn dot_label(&self, dot: Dot) -> Option<&str> {
        self.labels()
            .find(|(_, action)| *action == Action::Dot(dot))
            .map(|(label, _)| label)
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new(&['f', 'd', 's', 'j', 'k', 'l'])
    }
}
