//! Panel reporting the session target, scope and derived rule.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::session::SessionSnapshot;
use crate::domain::model::NodeId;
use crate::infra::page::BlockPreview;

/// Shows what accepting the current scope would block.
#[derive(Debug, Default)]
pub struct RulePanel {
    latest: Option<SessionSnapshot>,
}

impl RulePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed session report.
    pub fn update(&mut self, snapshot: SessionSnapshot) {
        self.latest = Some(snapshot);
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }

    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        describe: &dyn Fn(NodeId) -> String,
        preview: Option<&BlockPreview>,
    ) {
        let block = Block::default().title("Blocking Rule").borders(Borders::ALL);
        let snapshot = match &self.latest {
            Some(snapshot) if snapshot.view.is_some() => snapshot,
            _ => {
                let placeholder = Paragraph::new("No overlay session")
                    .block(block)
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(placeholder, area);
                return;
            }
        };

        let mut lines = vec![field("View", snapshot.view.unwrap_or("-").to_owned())];
        if let Some(target) = snapshot.target {
            lines.push(field("Target", format!("{} {target}", describe(target))));
        }
        if let Some(position) = snapshot.position {
            lines.push(field("Scope", position.to_string()));
        }
        if let Some(rule) = &snapshot.rule {
            lines.push(Line::default());
            lines.push(Line::styled(
                rule.clone(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(preview) = preview {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("previewing {} blocked", describe(preview.node)),
                Style::default().fg(Color::Yellow),
            ));
        }

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn field(name: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(name, Style::default().fg(Color::Gray)),
        Span::raw(": "),
        Span::styled(value, Style::default().fg(Color::Cyan)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(panel: &RulePanel, preview: Option<&BlockPreview>) -> String {
        let backend = TestBackend::new(60, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let describe = |node: NodeId| format!("node{}", node.0);
        terminal
            .draw(|frame| {
                let area = frame.size();
                panel.render(frame, area, &describe, preview);
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
    fn renders_placeholder_without_session() {
        let text = draw(&RulePanel::new(), None);
        assert!(text.contains("No overlay session"));
    }

    #[test]
    fn renders_rule_and_preview() {
        let mut panel = RulePanel::new();
        panel.update(SessionSnapshot {
            view: Some("mobile-menu.html"),
            target: Some(NodeId(3)),
            position: Some(-1),
            rule: Some("example.org##html > body".into()),
        });
        let preview = BlockPreview {
            node: NodeId(3),
            rule: Some("example.org##html > body".into()),
        };

        let text = draw(&panel, Some(&preview));
        assert!(text.contains("node3 #3"));
        assert!(text.contains("example.org##html > body"));
        assert!(text.contains("previewing node3 blocked"));
    }
}
