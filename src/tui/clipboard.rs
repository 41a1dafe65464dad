//! System clipboard access.

use anyhow::{Context, Result};

use crate::export::grid_to_unicode;
use crate::models::Grid;

/// Copies the grid as braille text to the system clipboard.
///
/// Returns the number of non-empty lines copied.
pub fn copy_grid(grid: &Grid) -> Result<usize> {
    let text = grid_to_unicode(grid);
    let lines = text.lines().count();
    arboard::Clipboard::new()
        .and_then(|mut clipboard| clipboard.set_text(text))
        .context("Failed to copy to clipboard")?;
    Ok(lines)
}
