//! Events screen: the full detection log as a scrollable table.
//!
//! The list follows new data by default. Pausing freezes the visible
//! log (updates are stashed, not dropped) and unlocks the scroll keys;
//! resuming applies the newest stashed log and snaps back to the top.

use std::sync::Arc;

use chrono::Utc;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Cell, Row, Table, TableState};

use vigia_core::{DetectionLog, humanize};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

pub struct EventsScreen {
    log: Option<Arc<DetectionLog>>,
    /// Newest log received while paused, applied on resume.
    pending: Option<Arc<DetectionLog>>,
    paused: bool,
    table: TableState,
}

impl EventsScreen {
    pub fn new() -> Self {
        Self {
            log: None,
            pending: None,
            paused: false,
            table: TableState::default(),
        }
    }

    fn len(&self) -> usize {
        self.log.as_deref().map_or(0, DetectionLog::len)
    }

    // Scrolling only makes sense on a frozen list, so all four
    // movements are no-ops unless paused.

    fn select_next(&mut self) {
        if !self.paused || self.len() == 0 {
            return;
        }
        let last = self.len() - 1;
        let next = self.table.selected().map_or(0, |i| (i + 1).min(last));
        self.table.select(Some(next));
    }

    fn select_prev(&mut self) {
        if !self.paused || self.len() == 0 {
            return;
        }
        let prev = self.table.selected().map_or(0, |i| i.saturating_sub(1));
        self.table.select(Some(prev));
    }

    fn select_first(&mut self) {
        if !self.paused || self.len() == 0 {
            return;
        }
        self.table.select(Some(0));
    }

    fn select_last(&mut self) {
        if !self.paused || self.len() == 0 {
            return;
        }
        self.table.select(Some(self.len() - 1));
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            if self.table.selected().is_none() && self.len() > 0 {
                self.table.select(Some(0));
            }
        } else {
            if let Some(pending) = self.pending.take() {
                self.log = Some(pending);
            }
            self.table = TableState::default();
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        let Some(log) = self.log.clone() else {
            frame.render_widget(Line::styled("loading…", theme::label()), area);
            return;
        };
        if log.is_empty() {
            frame.render_widget(Line::styled("no events yet", theme::label()), area);
            return;
        }

        let now = Utc::now();
        let rows = log.events().iter().map(|event| {
            Row::new(vec![
                Cell::from(event.id.to_string()),
                Cell::from(event.description.clone()),
                Cell::from(humanize::time_ago(event.occurred_at, now)),
                Cell::from(event.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(24),
                Constraint::Length(10),
                Constraint::Length(19),
            ],
        )
        .header(Row::new(["ID", "Description", "When", "Time (UTC)"]).style(theme::table_header()))
        .row_highlight_style(theme::row_highlight())
        .column_spacing(2);
        frame.render_stateful_widget(table, area, &mut self.table);
    }
}

impl Default for EventsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for EventsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('p' | ' ') => return Ok(Some(Action::ToggleEventPause)),
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('g') | KeyCode::Home => self.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.select_last(),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LogUpdated(log) => {
                if self.paused {
                    self.pending = Some(log.clone());
                } else {
                    self.log = Some(log.clone());
                }
            }
            Action::ToggleEventPause => self.toggle_pause(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut title = vec![Span::styled(" Detections ", theme::title())];
        if self.paused {
            title.push(Span::styled("[paused] ", theme::idle()));
        }
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(theme::border())
            .title(Line::from(title));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.render_table(frame, inner);
    }

    fn id(&self) -> ScreenId {
        ScreenId::Events
    }
}
