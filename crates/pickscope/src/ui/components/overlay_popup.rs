//! Popup drawing the mounted overlay view over the page tree.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::markup::{localize, view_template};
use crate::app::session::OverlaySession;
use crate::domain::model::ViewId;
use crate::domain::ports::Localizer;

/// Terminal stand-in for the overlay surface.
#[derive(Debug, Default)]
pub struct OverlayPopup;

impl OverlayPopup {
    /// Draw the current view when the surface is visible.
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        session: &OverlaySession,
        visible: bool,
        localizer: &dyn Localizer,
    ) {
        let Some(view) = session.current_view() else {
            return;
        };
        if !visible {
            return;
        }

        let template = view_template(view);
        let labels = localize(template.labels, localizer);
        let titles = localize(template.titles, localizer);
        let label = |key: &str| labels.get(key).cloned().unwrap_or_default();
        let title = |key: &str| titles.get(key).cloned().unwrap_or_default();

        let (title_key, lines) = match view {
            ViewId::SelectorPrompt => (
                "prompt_title",
                vec![
                    Line::from(vec![
                        key_span("enter"),
                        Span::raw(format!(" {}", label("prompt_start"))),
                    ]),
                    Line::from(vec![
                        key_span("esc"),
                        Span::raw(format!(" {}", label("prompt_cancel"))),
                    ]),
                ],
            ),
            ViewId::ScopeMenu => {
                let scope = session
                    .scope()
                    .map(|scope| format!("{} [{}..{}]", scope.position, scope.lower, scope.upper))
                    .unwrap_or_default();
                (
                    "menu_title",
                    vec![
                        Line::from(vec![
                            key_span("-"),
                            Span::raw(format!(" {}  ", title("menu_narrow"))),
                            key_span("+"),
                            Span::raw(format!(" {}", title("menu_widen"))),
                        ]),
                        Line::from(vec![
                            Span::styled(label("menu_scope"), Style::default().fg(Color::Gray)),
                            Span::raw(": "),
                            Span::styled(scope, Style::default().fg(Color::Yellow)),
                        ]),
                        Line::from(vec![
                            key_span("p"),
                            Span::raw(format!(" {}  ", label("menu_preview"))),
                            key_span("a"),
                            Span::raw(format!(" {}  ", label("menu_accept"))),
                            key_span("esc"),
                            Span::raw(format!(" {}", title("menu_close"))),
                        ]),
                    ],
                )
            }
        };
        let heading = label(title_key);

        let width = area.width.saturating_sub(4).min(64);
        let height = lines.len() as u16 + 2;
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: match view {
                ViewId::SelectorPrompt => area.y + area.height.saturating_sub(height) / 2,
                ViewId::ScopeMenu => area.y + area.height.saturating_sub(height),
            },
            width,
            height: height.min(area.height),
        };

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title(Span::styled(
                heading,
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }
}

fn key_span(key: &str) -> Span<'static> {
    Span::styled(key.to_owned(), Style::default().fg(Color::Cyan))
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::infra::localization::Catalog;

    fn render(session: &OverlaySession, visible: bool) -> String {
        let backend = TestBackend::new(70, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let catalog = Catalog::load("en").unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                OverlayPopup.render(frame, area, session, visible, &catalog);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn draws_nothing_without_view() {
        let text = render(&OverlaySession::default(), true);
        assert!(text.trim().is_empty());
    }

    #[test]
    fn hidden_surface_draws_nothing() {
        let mut session = OverlaySession::default();
        session.set_view(Some(ViewId::SelectorPrompt));
        assert!(render(&session, false).trim().is_empty());
    }

    #[test]
    fn prompt_uses_catalog_labels() {
        let mut session = OverlaySession::default();
        session.set_view(Some(ViewId::SelectorPrompt));
        let text = render(&session, true);
        assert!(text.contains("Select element"));
        assert!(text.contains("Cancel"));
    }
}
