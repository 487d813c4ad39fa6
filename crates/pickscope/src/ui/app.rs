//! Application loop for the TUI.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::domain::errors::OverlayError;
use crate::domain::model::{EventOrigin, ListenerKind, NodeId, ViewId};
use crate::infra::clipboard::Clipboard;
use crate::infra::local::LocalOverlay;
use crate::ui::components::overlay_popup::OverlayPopup;
use crate::ui::components::page_tree::{PageTreeState, PageTreeView};
use crate::ui::components::rule_panel::RulePanel;

const TICK_RATE: Duration = Duration::from_millis(120);

/// Interactive element picker over a loaded page.
pub struct UiApp {
    overlay: LocalOverlay,
    tree: PageTreeState,
    tree_view: PageTreeView,
    popup: OverlayPopup,
    rule_panel: RulePanel,
    clipboard: Option<Clipboard>,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(overlay: LocalOverlay) -> Self {
        let tree = PageTreeState::from_tree(overlay.tree());
        Self {
            overlay,
            tree,
            tree_view: PageTreeView,
            popup: OverlayPopup,
            rule_panel: RulePanel::new(),
            clipboard: None,
            status: None,
            should_quit: false,
        }
    }

    pub fn overlay(&self) -> &LocalOverlay {
        &self.overlay
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<()> {
        self.clipboard = Some(Clipboard::new());

        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        terminal.hide_cursor().ok();

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        event_loop_result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;
            self.tick();

            if self.should_quit {
                break;
            }

            if event::poll(TICK_RATE)? {
                let ev = event::read()?;
                self.handle_event(ev);
            }
        }
        Ok(())
    }

    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(size);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(44)])
            .split(layout[0]);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(6)])
            .split(main_chunks[1]);

        self.tree_view.render(
            frame,
            main_chunks[0],
            &self.tree,
            self.overlay.highlight(),
            self.overlay.location(),
        );

        let tree = self.overlay.tree();
        let describe = |node: NodeId| tree.describe(node);
        self.rule_panel.render(
            frame,
            right_chunks[0],
            &describe,
            self.overlay.highlight().preview(),
        );

        let hints = Paragraph::new(vec![
            Line::from(vec![
                key_hint("j/k"),
                Span::raw(" move · "),
                key_hint("s"),
                Span::raw(" prompt · "),
                key_hint("↵"),
                Span::raw(" pick · "),
                key_hint("+/-"),
                Span::raw(" scope"),
            ]),
            Line::from(vec![
                key_hint("p"),
                Span::raw(" preview · "),
                key_hint("a"),
                Span::raw(" accept · "),
                key_hint("esc"),
                Span::raw(" close · "),
                key_hint("x"),
                Span::raw(" synthetic close"),
            ]),
            Line::from(vec![
                key_hint("r"),
                Span::raw(" resize · "),
                key_hint("o"),
                Span::raw(" rotate · "),
                key_hint("q"),
                Span::raw(" quit"),
            ]),
        ])
        .block(Block::default().borders(Borders::ALL).title("Keys"))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(hints, right_chunks[1]);

        self.render_status(frame, layout[1]);

        let host = self.overlay.host();
        self.popup.render(
            frame,
            main_chunks[0],
            host.session(),
            host.surface().is_visible(),
            self.overlay.catalog(),
        );
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let message = self.status.as_ref().map(|status| {
            let style = match status.level {
                StatusLevel::Info => Style::default().fg(Color::Gray),
                StatusLevel::Success => Style::default().fg(Color::Green),
                StatusLevel::Error => Style::default().fg(Color::Red),
            };
            Line::styled(status.text.clone(), style)
        });

        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let line = message.unwrap_or_else(|| {
            Line::styled(
                "Ready · press s to start blocking",
                Style::default().fg(Color::DarkGray),
            )
        });
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn tick(&mut self) {
        if let Some(status) = &self.status
            && status.is_expired()
        {
            self.status = None;
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Resize(..) => {
                let result = self
                    .overlay
                    .fire(ListenerKind::WindowResize, EventOrigin::UserEvent);
                self.report(result, "Window resized");
                self.sync_session();
            }
            Event::Mouse(_) => {}
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.tree.select_next();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.tree.select_previous();
            }
            KeyCode::Char('s') => {
                let result = self.overlay.show_selector_prompt().map(|_| ());
                self.report(result, "Tap an element to block it");
            }
            KeyCode::Enter => self.activate(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.click("adg-plus", "Scope widened"),
            KeyCode::Char('-') => self.click("adg-minus", "Scope narrowed"),
            KeyCode::Char('p') => self.click("adg-preview", "Previewing block"),
            KeyCode::Char('a') => self.accept(),
            KeyCode::Esc => match self.current_view() {
                Some(ViewId::SelectorPrompt) => self.click("cancel-select-mode", "Cancelled"),
                Some(ViewId::ScopeMenu) => self.click("adg-close", "Closed"),
                None => {}
            },
            KeyCode::Char('x') => {
                let result = self.overlay.close(EventOrigin::SyntheticEvent);
                self.report(result, "Closed");
            }
            KeyCode::Char('r') => {
                let result = self
                    .overlay
                    .fire(ListenerKind::WindowResize, EventOrigin::UserEvent);
                self.report(result, "Window resized");
            }
            KeyCode::Char('o') => {
                let result = self
                    .overlay
                    .fire(ListenerKind::OrientationChange, EventOrigin::UserEvent);
                self.report(result, "Orientation changed");
            }
            _ => {}
        }
        self.sync_session();
    }

    fn current_view(&self) -> Option<ViewId> {
        self.overlay.host().session().current_view()
    }

    /// Enter picks the node under the cursor while picking, starts picking from the prompt, and
    /// otherwise opens the scope menu straight away.
    fn activate(&mut self) {
        let Some(node) = self.tree.selected_node() else {
            return;
        };
        if self.overlay.highlight().is_picking() {
            if let Some(result) = self.overlay.pick(node) {
                self.report(result.map(|_| ()), "Element selected");
            }
            return;
        }
        match self.current_view() {
            Some(ViewId::SelectorPrompt) => self.click("start-select-mode", "Picking an element"),
            Some(ViewId::ScopeMenu) => {}
            None => {
                let result = self.overlay.show_scope_menu(node).map(|_| ());
                self.report(result, "Element selected");
            }
        }
    }

    fn accept(&mut self) {
        if self.current_view() != Some(ViewId::ScopeMenu) {
            return;
        }
        let rule = self
            .overlay
            .host()
            .session()
            .derived_rule()
            .map(str::to_owned);
        let result = self.overlay.click("adg-accept", EventOrigin::UserEvent);
        if let Err(err) = result {
            self.set_status(StatusLevel::Error, err.to_string());
            return;
        }

        let Some(rule) = rule else {
            return;
        };
        match self.clipboard.as_mut().map(|clipboard| clipboard.copy(&rule)) {
            Some(Ok(())) => self.set_status(StatusLevel::Success, format!("Copied {rule}")),
            Some(Err(err)) => {
                tracing::warn!(error = %err, "failed to copy rule");
                self.set_status(StatusLevel::Error, format!("{rule} (clipboard unavailable)"));
            }
            None => self.set_status(StatusLevel::Success, format!("Accepted {rule}")),
        }
    }

    fn click(&mut self, class: &str, success: &str) {
        let result = self.overlay.click(class, EventOrigin::UserEvent);
        self.report(result, success);
    }

    fn report(&mut self, result: Result<(), OverlayError>, success: &str) {
        match result {
            Ok(()) => self.set_status(StatusLevel::Info, success),
            Err(OverlayError::UntrustedTeardown) => {
                self.set_status(StatusLevel::Info, "Ignored close from a synthesized event")
            }
            Err(err) => self.set_status(StatusLevel::Error, err.to_string()),
        }
    }

    /// Keep the tree cursor and rule panel in line with the session.
    fn sync_session(&mut self) {
        let session = self.overlay.host().session();
        if let Some(target) = session.current_target() {
            self.tree.focus_node(target);
        }
        let snapshot = session.snapshot();
        if snapshot.view.is_some() {
            self.rule_panel.update(snapshot);
        } else {
            self.rule_panel.clear();
        }
    }

    fn set_status<S: Into<String>>(&mut self, level: StatusLevel, message: S) {
        self.status = Some(StatusMessage::new(level, message.into()));
    }
}

fn key_hint(key: &'static str) -> Span<'static> {
    Span::styled(key, Style::default().fg(Color::Cyan))
}

#[derive(Debug)]
struct StatusMessage {
    level: StatusLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + Duration::from_secs(4),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusLevel {
    Info,
    Success,
    Error,
}
