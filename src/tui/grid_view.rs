//! Grid widget: the braille page with the cursor cell highlighted.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Position;

use super::AppState;

/// Terminal columns per braille cell (glyph plus gap).
pub const CELL_WIDTH: u16 = 2;

/// Shown for empty cells so the page extent stays visible.
const EMPTY_MARK: char = '·';

/// Top-left grid position shown in the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row
    pub row: usize,
    /// First visible column
    pub col: usize,
}

impl Viewport {
    /// Scrolls the smallest amount that keeps `cursor` visible.
    pub fn follow(&mut self, cursor: Position, visible_rows: usize, visible_cols: usize) {
        self.row = follow_axis(self.row, cursor.row, visible_rows);
        self.col = follow_axis(self.col, cursor.col, visible_cols);
    }
}

fn follow_axis(start: usize, target: usize, visible: usize) -> usize {
    let visible = visible.max(1);
    if target < start {
        target
    } else if target >= start + visible {
        target + 1 - visible
    } else {
        start
    }
}

/// Number of grid rows and columns that fit inside `area` (borders excluded).
#[must_use]
pub fn visible_cells(area: Rect) -> (usize, usize) {
    let rows = area.height.saturating_sub(2) as usize;
    let cols = (area.width.saturating_sub(2) / CELL_WIDTH) as usize;
    (rows, cols)
}

/// Grid widget renders the braille page
pub struct GridWidget;

impl GridWidget {
    /// Render the grid widget
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let grid = state.engine.grid();
        let cursor = state.engine.cursor();
        let chord_open = state.engine.active_dots().next().is_some();
        let (visible_rows, visible_cols) = visible_cells(area);

        let end_row = (state.viewport.row + visible_rows).min(grid.rows());
        let end_col = (state.viewport.col + visible_cols).min(grid.cols());

        let mut lines = Vec::with_capacity(end_row.saturating_sub(state.viewport.row));
        for row in state.viewport.row..end_row {
            let mut spans = Vec::with_capacity(end_col.saturating_sub(state.viewport.col));
            for col in state.viewport.col..end_col {
                let pos = Position::new(row, col);
                let cell = grid.get(pos).unwrap_or_default();
                let glyph = if cell.is_empty() {
                    EMPTY_MARK
                } else {
                    cell.to_unicode()
                };

                let style = if pos == cursor {
                    let fg = if chord_open { theme.active } else { theme.text };
                    Style::default()
                        .fg(fg)
                        .bg(theme.cursor_bg)
                        .add_modifier(Modifier::BOLD)
                } else if cell.is_empty() {
                    Style::default().fg(theme.text_muted)
                } else {
                    Style::default().fg(theme.text)
                };

                spans.push(Span::styled(glyph.to_string(), style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        let title = format!(
            " Page {}x{}  {} ",
            grid.rows(),
            grid.cols(),
            cursor
        );
        let widget = Paragraph::new(lines)
            .style(Style::default().bg(theme.background))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.primary)),
            );

        f.render_widget(widget, area);
    }
}
