//! Help overlay listing every key binding.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::input::{Action, ShortcutRegistry};

use super::Theme;

/// Help overlay widget
pub struct HelpOverlay;

impl HelpOverlay {
    /// Builds the help text from the registry.
    pub fn content(registry: &ShortcutRegistry, theme: &Theme) -> Vec<Line<'static>> {
        let heading = |text: &'static str| {
            Line::from(Span::styled(
                text,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ))
        };
        let entry = |key: String, what: String| {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{key:<12}"), Style::default().fg(theme.success)),
                Span::styled(what, Style::default().fg(theme.text)),
            ])
        };

        let mut lines = vec![heading("═══ CHORDS ═══"), Line::from("")];
        let dot_keys: Vec<(&str, Action)> = registry
            .labels()
            .filter(|(_, a)| matches!(a, Action::Dot(_)))
            .collect();
        for (key, action) in &dot_keys {
            if let Action::Dot(dot) = action {
                lines.push(entry((*key).to_string(), format!("Dot {}", dot.number())));
            }
        }
        lines.push(Line::from(Span::styled(
            "  Hold keys together, release all to commit the cell.",
            Style::default().fg(theme.text_muted),
        )));
        lines.push(Line::from(""));

        lines.push(heading("═══ KEYS ═══"));
        lines.push(Line::from(""));
        for (key, action) in registry.labels() {
            if !matches!(action, Action::Dot(_)) {
                lines.push(entry(key.to_string(), action.description().to_string()));
            }
        }
        lines.push(Line::from(""));

        lines.push(heading("═══ MOUSE ═══"));
        lines.push(Line::from(""));
        lines.push(entry(
            "Click".to_string(),
            "Press an on-screen key (release the button to commit)".to_string(),
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Press F1 or Esc to close",
            Style::default().fg(theme.text_muted),
        )));
        lines
    }

    /// Render the help overlay as a centered modal.
    pub fn render(frame: &mut Frame, area: Rect, registry: &ShortcutRegistry, theme: &Theme) {
        let width = (area.width * 60) / 100;
        let height = (area.height * 80) / 100;
        let modal_area = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, modal_area);
        let paragraph = Paragraph::new(Self::content(registry, theme))
            .block(
                Block::default()
                    .title(" Help - Keyboard Shortcuts ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.primary)),
            )
            .style(Style::default().fg(theme.text).bg(theme.background))
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, modal_area);
    }
}
