//! On-screen six-key pad laid out like a Perkins brailler.
//!
//! Left hand holds dots 3 2 1, right hand dots 4 5 6.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calibration::KeyRect;
use crate::models::Dot;

use super::AppState;

/// Width of one key in terminal columns.
pub const KEY_WIDTH: u16 = 7;
/// Height of one key in terminal rows.
pub const KEY_HEIGHT: u16 = 4;
const KEY_GAP: u16 = 1;
const HAND_GAP: u16 = 6;

/// Left to right order of the keys on screen.
const SCREEN_ORDER: [Dot; 6] = [Dot::Dot3, Dot::Dot2, Dot::Dot1, Dot::Dot4, Dot::Dot5, Dot::Dot6];

/// Rows needed by the pad including its border.
pub const PAD_HEIGHT: u16 = KEY_HEIGHT + 2;

/// Screen rectangles of the six keys inside `area`, indexed by dot.
#[must_use]
pub fn key_rects(area: Rect) -> [Rect; 6] {
    let inner = Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    let total = 6 * KEY_WIDTH + 4 * KEY_GAP + HAND_GAP;
    let left = inner.x + inner.width.saturating_sub(total) / 2;
    let height = KEY_HEIGHT.min(inner.height);

    let mut rects = [Rect::default(); 6];
    let mut x = left;
    for (slot, dot) in SCREEN_ORDER.into_iter().enumerate() {
        let width = KEY_WIDTH.min((inner.x + inner.width).saturating_sub(x));
        rects[dot.index()] = Rect::new(x, inner.y, width, height);
        x = x.saturating_add(KEY_WIDTH).saturating_add(if slot == 2 {
            HAND_GAP
        } else {
            KEY_GAP
        });
    }
    rects
}

/// The pad layout in calibration coordinates (one unit per terminal cell).
#[must_use]
pub fn calibration_layout(area: Rect) -> [KeyRect; 6] {
    key_rects(area).map(|r| {
        KeyRect::new(
            f32::from(r.x),
            f32::from(r.y),
            f32::from(r.width),
            f32::from(r.height),
        )
    })
}

/// Key pad widget
pub struct KeyPad;

impl KeyPad {
    /// Render the key pad
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let block = Block::default()
            .title(" Keys ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.background));
        f.render_widget(block, area);

        let cell = state.engine.current_cell();
        for (dot, rect) in Dot::ALL.into_iter().zip(key_rects(area)) {
            if rect.width == 0 || rect.height == 0 {
                continue;
            }
            let held = state.engine.is_held(dot);
            let label = state
                .translator
                .registry()
                .dot_label(dot)
                .unwrap_or("?")
                .to_string();

            let (fg, bg) = if held {
                (theme.background, theme.active)
            } else {
                (theme.text, theme.surface)
            };
            let mark = if cell.is_raised(dot) { "●" } else { "○" };

            let text = vec![
                Line::from(Span::styled(
                    label,
                    Style::default().fg(fg).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("{} {mark}", dot.number()),
                    Style::default().fg(if held { fg } else { theme.text_secondary }),
                )),
            ];
            let key = Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().bg(bg))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(if held {
                            theme.active
                        } else {
                            theme.inactive
                        })),
                );
            f.render_widget(key, rect);
        }
    }
}
