//! Shared helpers for integration tests.
#![allow(dead_code)] // Not every test binary uses every helper

use std::fs;
use std::path::{Path, PathBuf};

use brailler::engine::{Engine, GridSettings, InputEvent};
use brailler::models::Dot;

/// Engine with the given size and the default policy.
pub fn engine(rows: usize, cols: usize) -> Engine {
    Engine::new(GridSettings {
        rows,
        cols,
        ..GridSettings::default()
    })
}

/// Presses all `dots`, then releases them in the same order.
pub fn chord(engine: &mut Engine, dots: &[Dot]) {
    for &dot in dots {
        engine.apply(InputEvent::press(dot));
    }
    for &dot in dots {
        engine.apply(InputEvent::release(dot));
    }
}

/// Types each chord in turn.
pub fn type_cells(engine: &mut Engine, cells: &[&[Dot]]) {
    for dots in cells {
        chord(engine, dots);
    }
}

/// Writes `content` as the config file inside `dir` and returns its path.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, content).expect("Failed to write config file");
    path
}
