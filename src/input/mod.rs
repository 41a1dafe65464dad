//! Keyboard input: key bindings and the translation of terminal key events
//! into engine events.

pub mod keymap;
pub mod translator;

pub use keymap::{Action, KeyBinding, ShortcutRegistry};
pub use translator::{Command, KeyTranslator, ReleaseMode};
