//! Turns raw terminal key events into engine events and application actions.
//!
//! Terminals that implement the kitty keyboard protocol report key releases,
//! so chords end when the keys come up. Everywhere else only presses arrive;
//! a chord is then closed once no dot key has been pressed for the chord
//! timeout.

use crossterm::event::{KeyEvent, KeyEventKind};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::engine::InputEvent;
use crate::models::Dot;

use super::keymap::{Action, ShortcutRegistry};

/// How the translator learns that a dot key went up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseMode {
    /// The terminal sends release events
    Reported,
    /// Releases are synthesized after the chord timeout
    Timeout,
}

/// Result of translating one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forward to the engine
    Input(InputEvent),
    /// Handle in the application
    App(Action),
}

/// Stateful key-event translator.
#[derive(Debug)]
pub struct KeyTranslator {
    registry: ShortcutRegistry,
    mode: ReleaseMode,
    chord_timeout: Duration,
    held: BTreeSet<Dot>,
    last_press: Option<Instant>,
}

impl KeyTranslator {
    /// Creates a translator.
    #[must_use]
    pub fn new(registry: ShortcutRegistry, mode: ReleaseMode, chord_timeout: Duration) -> Self {
        Self {
            registry,
            mode,
            chord_timeout,
            held: BTreeSet::new(),
            last_press: None,
        }
    }

    /// The registry used for lookups.
    #[must_use]
    pub const fn registry(&self) -> &ShortcutRegistry {
        &self.registry
    }

    /// Current release mode.
    #[must_use]
    pub const fn mode(&self) -> ReleaseMode {
        self.mode
    }

    /// Translates a key event.
    ///
    /// In timeout mode any non-dot key closes a pending chord first, so the
    /// returned commands start with the synthesized releases.
    pub fn translate(&mut self, key: KeyEvent, now: Instant) -> Vec<Command> {
        let Some(action) = self.registry.lookup(key) else {
            return Vec::new();
        };

        if let Action::Dot(dot) = action {
            return self.translate_dot(dot, key.kind, now);
        }

        let fires = match key.kind {
            KeyEventKind::Press => true,
            KeyEventKind::Repeat => action.repeats(),
            KeyEventKind::Release => false,
        };
        if !fires {
            return Vec::new();
        }

        let mut commands = match self.mode {
            ReleaseMode::Timeout => self.release_all(),
            ReleaseMode::Reported => Vec::new(),
        };
        commands.push(
            action
                .engine_event()
                .map_or(Command::App(action), Command::Input),
        );
        commands
    }

    fn translate_dot(&mut self, dot: Dot, kind: KeyEventKind, now: Instant) -> Vec<Command> {
        match (self.mode, kind) {
            (_, KeyEventKind::Press) => {
                self.last_press = Some(now);
                if self.held.insert(dot) {
                    vec![Command::Input(InputEvent::press(dot))]
                } else {
                    Vec::new()
                }
            }
            // Auto-repeat of a held key keeps a timeout chord open
            (ReleaseMode::Timeout, KeyEventKind::Repeat) => {
                self.last_press = Some(now);
                Vec::new()
            }
            (ReleaseMode::Reported, KeyEventKind::Repeat) => Vec::new(),
            (ReleaseMode::Reported, KeyEventKind::Release) => {
                if self.held.remove(&dot) {
                    vec![Command::Input(InputEvent::release(dot))]
                } else {
                    Vec::new()
                }
            }
            (ReleaseMode::Timeout, KeyEventKind::Release) => Vec::new(),
        }
    }

    /// Closes a timed-out chord.
    ///
    /// Returns the synthesized releases, or nothing when no chord is pending
    /// or the timeout has not elapsed yet.
    pub fn tick(&mut self, now: Instant) -> Vec<Command> {
        if self.mode != ReleaseMode::Timeout || self.held.is_empty() {
            return Vec::new();
        }
        match self.last_press {
            Some(at) if now.saturating_duration_since(at) >= self.chord_timeout => {
                self.release_all()
            }
            _ => Vec::new(),
        }
    }

    /// Time left until [`Self::tick`] would close the pending chord.
    #[must_use]
    pub fn time_until_release(&self, now: Instant) -> Option<Duration> {
        if self.mode != ReleaseMode::Timeout || self.held.is_empty() {
            return None;
        }
        let at = self.last_press?;
        Some(self.chord_timeout.saturating_sub(now.saturating_duration_since(at)))
    }

    /// Forgets held keys without producing releases.
    ///
    /// Used after the engine itself dropped the chord (clear all).
    pub fn reset(&mut self) {
        self.held.clear();
        self.last_press = None;
    }

    fn release_all(&mut self) -> Vec<Command> {
        self.last_press = None;
        std::mem::take(&mut self.held)
            .into_iter()
            .map(|dot| Command::Input(InputEvent::release(dot)))
            .collect()
    }
}
