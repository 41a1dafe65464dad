//! Rendering the grid as Unicode braille text.
//!
//! Used for clipboard copies and one-shot snapshot files. Nothing here is
//! ever read back into an engine.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::models::{Cell, Grid};

/// Renders the grid as one line of braille patterns per row.
///
/// Trailing empty cells on each row and trailing empty rows are dropped,
/// so a blank grid renders as an empty string.
#[must_use]
pub fn grid_to_unicode(grid: &Grid) -> String {
    let mut lines: Vec<String> = grid
        .iter_rows()
        .map(|row| {
            let used = row
                .iter()
                .rposition(|cell| !cell.is_empty())
                .map_or(0, |last| last + 1);
            row[..used].iter().map(Cell::to_unicode).collect()
        })
        .collect();

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    lines.join("\n")
}

/// Default snapshot filename: `braille_<YYYY-MM-DD_HHMMSS>.txt`.
#[must_use]
pub fn default_snapshot_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H%M%S");
    PathBuf::from(format!("braille_{stamp}.txt"))
}

/// Writes the grid as braille text to `output` (or the default filename)
/// and returns the path written.
pub fn write_snapshot(grid: &Grid, output: Option<PathBuf>) -> Result<PathBuf> {
    let path = output.unwrap_or_else(default_snapshot_path);
    let mut text = grid_to_unicode(grid);
    text.push('\n');

    fs::write(&path, text)
        .with_context(|| format!("Failed to write braille snapshot: {}", path.display()))?;

    info!(path = %path.display(), "braille snapshot written");
    Ok(path)
}
