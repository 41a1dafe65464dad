//! Status bar widget for displaying status messages and hints

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::engine::{BoundaryPolicy, ChordState};
use crate::input::Action;

use super::{AppState, Theme};

/// Rows used by the status bar including its border.
pub const STATUS_HEIGHT: u16 = 5;

/// Actions advertised in the hint line, in order.
const HINT_ACTIONS: [Action; 5] = [
    Action::CopyBraille,
    Action::ExportSnapshot,
    Action::CycleBoundaryPolicy,
    Action::ToggleHelp,
    Action::Quit,
];

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar
    pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let message_line = if let Some(error) = &state.error_message {
            Line::from(vec![
                Span::styled("ERROR: ", Style::default().fg(theme.error)),
                Span::raw(error.as_str()),
            ])
        } else {
            Line::from(Span::styled(
                state.status_message.as_str(),
                Style::default().fg(theme.text),
            ))
        };

        let status = Paragraph::new(vec![
            message_line,
            Self::engine_line(state, theme),
            Self::hints_line(state, theme),
        ])
        .style(Style::default().bg(theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Status ")
                .border_style(Style::default().fg(theme.primary)),
        );

        f.render_widget(status, area);
    }

    /// Cursor, policy, chord and current cell.
    fn engine_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let engine = &state.engine;
        let cell = engine.current_cell();
        let chord = match engine.chord_state() {
            ChordState::Idle => "idle".to_string(),
            ChordState::Accumulating => {
                let held: Vec<String> = engine.active_dots().map(|d| d.number().to_string()).collect();
                format!("held {}", held.join(" "))
            }
        };
        let dots: Vec<String> = cell
            .raised_dots()
            .iter()
            .map(|d| d.number().to_string())
            .collect();

        let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.primary));
        Line::from(vec![
            label("Cursor: "),
            Span::raw(engine.cursor().to_string()),
            Span::raw("  "),
            label("Policy: "),
            Span::styled(
                engine.policy().label(),
                Style::default().fg(Self::policy_color(engine.policy(), theme)),
            ),
            Span::raw("  "),
            label("Chord: "),
            Span::styled(
                chord,
                Style::default().fg(if engine.chord_state() == ChordState::Idle {
                    theme.text_muted
                } else {
                    theme.active
                }),
            ),
            Span::raw("  "),
            label("Cell: "),
            Span::raw(format!("{} [{}]", cell.to_unicode(), dots.join(" "))),
        ])
    }

    /// Scrolling drops rows off the top, so that policy is flagged.
    fn policy_color(policy: BoundaryPolicy, theme: &Theme) -> ratatui::style::Color {
        match policy {
            BoundaryPolicy::WrapScroll => theme.warning,
            BoundaryPolicy::Clamp | BoundaryPolicy::Wrap => theme.text,
        }
    }

    /// Key hints from the shortcut registry.
    fn hints_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let registry = state.translator.registry();
        let mut spans: Vec<Span<'static>> = Vec::new();
        for action in HINT_ACTIONS {
            let Some((key, _)) = registry.labels().find(|(_, a)| *a == action) else {
                continue;
            };
            if !spans.is_empty() {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(
                key.to_string(),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(": "));
            spans.push(Span::styled(
                action.description(),
                Style::default().fg(theme.text_muted),
            ));
        }
        Line::from(spans)
    }
}
