//! Page tree component and cursor state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::domain::model::NodeId;
use crate::infra::page::{PageHighlight, PageTree};

/// Navigable rows of the page tree, one per node in document order.
#[derive(Debug, Default, Clone)]
pub struct PageTreeState {
    rows: Vec<TreeRow>,
    selected: usize,
}

#[derive(Debug, Clone)]
struct TreeRow {
    node: NodeId,
    depth: usize,
    label: String,
}

impl PageTreeState {
    pub fn from_tree(tree: &PageTree) -> Self {
        let rows = tree
            .iter()
            .map(|node| TreeRow {
                node,
                depth: tree.depth(node),
                label: tree.describe(node),
            })
            .collect();
        Self { rows, selected: 0 }
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.rows.get(self.selected).map(|row| row.node)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the cursor onto `node` if it is part of the tree.
    pub fn focus_node(&mut self, node: NodeId) {
        if let Some(index) = self.rows.iter().position(|row| row.node == node) {
            self.selected = index;
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renders the page structure with the page-level highlight marked.
#[derive(Debug, Default)]
pub struct PageTreeView;

impl PageTreeView {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        state: &PageTreeState,
        highlight: &PageHighlight,
        location: &str,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Page · {location}"));
        frame.render_widget(block.clone(), area);

        let inner = block.inner(area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let (mode, mode_style) = if highlight.is_picking() {
            (
                "◎ picking · enter selects",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        } else {
            ("◎ idle", Style::default().fg(Color::Gray))
        };
        frame.render_widget(Paragraph::new(mode).style(mode_style), layout[0]);

        if state.is_empty() {
            let placeholder = Paragraph::new("Page is empty").style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(placeholder, layout[1]);
            return;
        }

        let previewed = highlight.preview().map(|preview| preview.node);
        let items: Vec<ListItem<'_>> = state
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut spans = vec![Span::raw("  ".repeat(row.depth))];
                let mut label_style = Style::default();
                if highlight.highlighted() == Some(row.node) {
                    spans.push(Span::styled("◆ ", Style::default().fg(Color::Yellow)));
                    label_style = label_style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
                } else {
                    spans.push(Span::styled("• ", Style::default().fg(Color::Gray)));
                }
                if previewed == Some(row.node) {
                    label_style = label_style.add_modifier(Modifier::CROSSED_OUT);
                }
                spans.push(Span::styled(row.label.clone(), label_style));
                spans.push(Span::styled(
                    format!(" {}", row.node),
                    Style::default().fg(Color::DarkGray),
                ));

                let mut item = ListItem::new(Line::from(spans));
                if index % 2 == 1 {
                    item = item.style(Style::default().bg(Color::Rgb(24, 24, 24)));
                }
                item
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(state.selected));

        let list = List::new(items)
            .block(Block::default())
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(list, layout[1], &mut list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::domain::ports::PageSelector;
    use crate::infra::page::NodeShape;

    fn tree() -> PageTree {
        PageTree::from_shape(
            &NodeShape::new("html").child(
                NodeShape::new("body")
                    .child(NodeShape::new("div").attr("class", "ad banner"))
                    .child(NodeShape::new("img").attr("id", "logo")),
            ),
        )
    }

    #[test]
    fn cursor_stays_within_rows() {
        let mut state = PageTreeState::from_tree(&tree());
        state.select_previous();
        assert_eq!(state.selected_node(), Some(NodeId(0)));
        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.selected_node(), Some(NodeId(3)));

        state.focus_node(NodeId(1));
        assert_eq!(state.selected_node(), Some(NodeId(1)));
        state.focus_node(NodeId(42));
        assert_eq!(state.selected_node(), Some(NodeId(1)));
    }

    #[test]
    fn renders_labels_and_highlight() {
        let backend = TestBackend::new(50, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        let state = PageTreeState::from_tree(&tree());
        let mut highlight = PageHighlight::new();
        highlight.select_element(NodeId(3));

        terminal
            .draw(|frame| {
                let area = frame.size();
                PageTreeView.render(frame, area, &state, &highlight, "https://example.org/");
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("div.ad.banner"));
        assert!(text.contains("img#logo"));
        assert!(text.contains('◆'));
    }
}
