//! Application loop: routes events to actions, actions to screens,
//! and draws frames.

use chrono::{DateTime, Utc};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Tabs};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use vigia_core::{LinkState, Monitor, humanize};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::{DashboardScreen, EventsScreen};
use crate::theme;
use crate::tui::Tui;

pub struct App {
    monitor: Monitor,
    screens: Vec<Box<dyn Component>>,
    active: ScreenId,
    show_help: bool,
    link: LinkState,
    last_refresh: Option<DateTime<Utc>>,
    should_quit: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(monitor: Monitor) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: Vec<Box<dyn Component>> = vec![
            Box::new(DashboardScreen::new(monitor.config().active_window)),
            Box::new(EventsScreen::new()),
        ];
        Self {
            monitor,
            screens,
            active: ScreenId::default(),
            show_help: false,
            link: LinkState::Starting,
            last_refresh: None,
            should_quit: false,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(mut self, tui: &mut Tui) -> Result<()> {
        let cancel = CancellationToken::new();
        let bridge =
            data_bridge::spawn(self.monitor.clone(), self.action_tx.clone(), cancel.clone());

        for screen in &mut self.screens {
            screen.init(self.action_tx.clone())?;
        }

        let mut events = EventReader::new();
        while !self.should_quit {
            let Some(event) = events.next().await else { break };
            self.handle_event(event)?;

            // Coalesce everything queued behind this event into one frame.
            let mut needs_draw = false;
            while let Ok(action) = self.action_rx.try_recv() {
                needs_draw |= self.apply(action)?;
            }
            if needs_draw && !self.should_quit {
                self.draw(tui)?;
            }
        }

        cancel.cancel();
        let _ = bridge.await;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Tick => self.action_tx.send(Action::Tick)?,
            Event::Render => self.action_tx.send(Action::Render)?,
            Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
            Event::Key(key) => self.handle_key(key)?,
        }
        Ok(())
    }

    /// Global bindings first; anything unclaimed goes to the active
    /// screen. While the help overlay is up it swallows every key.
    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.show_help {
            let action = match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
                _ => Action::ToggleHelp,
            };
            self.action_tx.send(action)?;
            return Ok(());
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('r') => Some(Action::RefreshNow),
            KeyCode::Esc => Some(Action::GoBack),
            KeyCode::Tab => Some(Action::SwitchScreen(self.active.next())),
            KeyCode::BackTab => Some(Action::SwitchScreen(self.active.prev())),
            KeyCode::Char(c @ '1'..='9') => c
                .to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .and_then(ScreenId::from_number)
                .map(Action::SwitchScreen),
            _ => None,
        };

        if let Some(action) = action {
            self.action_tx.send(action)?;
            return Ok(());
        }

        let active = self.active;
        if let Some(screen) = self.screens.iter_mut().find(|s| s.id() == active) {
            if let Some(action) = screen.handle_key_event(key)? {
                self.action_tx.send(action)?;
            }
        }
        Ok(())
    }

    /// Apply one action. Returns whether a redraw is due.
    fn apply(&mut self, action: Action) -> Result<bool> {
        match &action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::SwitchScreen(id) => self.active = *id,
            Action::GoBack => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.active = ScreenId::default();
                }
            }
            Action::RefreshNow => self.monitor.refresh_now(),
            Action::LinkChanged(link) => self.link = link.clone(),
            Action::RefreshedAt(at) => self.last_refresh = Some(*at),
            _ => {}
        }

        // Data updates go to every screen, not just the active one, so
        // switching screens never shows stale state.
        let mut follow_ups = Vec::new();
        for screen in &mut self.screens {
            if let Some(follow) = screen.update(&action)? {
                follow_ups.push(follow);
            }
        }
        for follow in follow_ups {
            self.action_tx.send(follow)?;
        }

        Ok(matches!(action, Action::Render | Action::Resize(..)))
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        let active = self.active;
        tui.draw(|frame| {
            let [content, tabs_area, status_area] = Layout::vertical([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(frame.area());

            if let Some(screen) = self.screens.iter_mut().find(|s| s.id() == active) {
                screen.render(frame, content);
            }
            self.render_tabs(frame, tabs_area);
            self.render_status_bar(frame, status_area);
            if self.show_help {
                render_help(frame);
            }
        })
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles = ScreenId::ALL
            .iter()
            .map(|id| format!(" {} {} ", id.number(), id.label()));
        let selected = ScreenId::ALL.iter().position(|id| *id == self.active);
        let tabs = Tabs::new(titles)
            .select(selected)
            .style(theme::tab_inactive())
            .highlight_style(theme::tab_active())
            .divider("│");
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hints = Line::from(vec![
            Span::styled("q", theme::help_key()),
            Span::raw(" quit  "),
            Span::styled("?", theme::help_key()),
            Span::raw(" help  "),
            Span::styled("r", theme::help_key()),
            Span::raw(" refresh "),
        ]);
        let hints_width = u16::try_from(hints.width()).unwrap_or(area.width);
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(hints_width)]).areas(area);

        let link = match &self.link {
            LinkState::Starting => Span::styled("○ starting", theme::label()),
            LinkState::Online => Span::styled("● online", theme::online()),
            LinkState::Degraded { failures, .. } => {
                Span::styled(format!("▲ degraded ({failures})"), theme::degraded())
            }
        };
        let age = match self.last_refresh {
            Some(at) => format!("updated {}", humanize::time_ago(at, Utc::now())),
            None => "waiting for data".to_string(),
        };
        let left = Line::from(vec![
            Span::raw(" "),
            link,
            Span::raw("  "),
            Span::styled(age, theme::label()),
        ]);

        frame.render_widget(Paragraph::new(left).style(theme::status_bar()), left_area);
        frame.render_widget(Paragraph::new(hints).style(theme::status_bar()), right_area);
    }
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 52, 13);
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .title(" Help ")
        .title_style(theme::title());
    let lines = vec![
        help_line("1 / 2", "switch screen"),
        help_line("Tab / Shift-Tab", "cycle screens"),
        help_line("r", "refresh now"),
        help_line("p / space", "pause the event list"),
        help_line("j / k", "scroll events (while paused)"),
        help_line("g / G", "jump to newest / oldest"),
        help_line("Esc", "back to the dashboard"),
        help_line("?", "toggle this help"),
        help_line("q / Ctrl-C", "quit"),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn help_line<'a>(keys: &'a str, what: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {keys:>16}  "), theme::help_key()),
        Span::styled(what, theme::text()),
    ])
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, rect, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(middle);
    rect
}
