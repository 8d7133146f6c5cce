//! Dashboard screen: status cards, hourly sparkline, recent detections.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use color_eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Sparkline};

use vigia_core::{ActivityState, DetectionLog, HourlySeries, LinkState, MotionStats, humanize};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

/// Consecutive stats failures after which a stale-data outage is surfaced.
const PERSISTENT_FAILURES: u32 = 3;

/// The landing screen: headline counters, the 24-hour activity chart,
/// and a short preview of the latest detections.
pub struct DashboardScreen {
    /// Recency window for the activity card, from the monitor config.
    active_window: Duration,
    stats: Option<Arc<MotionStats>>,
    log: Option<Arc<DetectionLog>>,
    series: Option<Arc<HourlySeries>>,
    /// Bucket values cached in sparkline order.
    spark: Vec<u64>,
    link: LinkState,
}

impl DashboardScreen {
    pub fn new(active_window: Duration) -> Self {
        Self {
            active_window,
            stats: None,
            log: None,
            series: None,
            spark: Vec::new(),
            link: LinkState::Starting,
        }
    }

    /// A short blip with data still on screen stays quiet (the footer
    /// reports it); the banner raises when contact was lost before any
    /// snapshot arrived, or when failures keep repeating.
    fn banner_active(&self) -> bool {
        match &self.link {
            LinkState::Degraded { failures, .. } => {
                self.stats.is_none() || *failures >= PERSISTENT_FAILURES
            }
            LinkState::Starting | LinkState::Online => false,
        }
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect) {
        if !self.banner_active() {
            return;
        }
        let LinkState::Degraded { message, failures } = &self.link else {
            return;
        };
        let text = format!("⚠ sensor link lost: {message} ({failures} consecutive failures)");
        let banner = Paragraph::new(Line::styled(text, theme::degraded()))
            .centered()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(theme::degraded()),
            );
        frame.render_widget(banner, area);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let [total_area, today_area, week_area, activity_area] =
            Layout::horizontal([Constraint::Percentage(25); 4]).areas(area);

        let value = |n: Option<u64>| n.map_or_else(|| "…".to_string(), |n| n.to_string());
        let stats = self.stats.as_deref();

        card(
            frame,
            total_area,
            "Total",
            Line::styled(value(stats.map(|s| s.total)), theme::title().fg(theme::SKY_BLUE)),
            Line::styled("all time", theme::label()),
        );
        card(
            frame,
            today_area,
            "Today",
            Line::styled(
                value(stats.map(|s| s.today)),
                theme::title().fg(theme::SIGNAL_GREEN),
            ),
            Line::styled("since midnight", theme::label()),
        );
        card(
            frame,
            week_area,
            "This week",
            Line::styled(value(stats.map(|s| s.week)), theme::title().fg(theme::VIOLET)),
            Line::styled("last 7 days", theme::label()),
        );

        let now = Utc::now();
        let (activity, style) = match stats {
            None => ("…".to_string(), theme::label()),
            Some(stats) => match stats.activity(self.active_window, now) {
                ActivityState::Active => ("● active".to_string(), theme::active()),
                ActivityState::Idle => ("○ idle".to_string(), theme::idle()),
            },
        };
        let last_seen =
            stats.map_or_else(String::new, |s| humanize::time_ago_opt(s.last_motion, now));
        card(
            frame,
            activity_area,
            "Activity",
            Line::styled(activity, style),
            Line::styled(last_seen, theme::label()),
        );
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.series {
            Some(series) => format!(" Activity by hour · {} in 24h ", series.total()),
            None => " Activity by hour ".to_string(),
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(theme::border())
            .title(title)
            .title_style(theme::title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.series.is_some() {
            let spark = Sparkline::default()
                .data(&self.spark)
                .style(Style::default().fg(theme::SKY_BLUE));
            frame.render_widget(spark, inner);
        } else {
            let placeholder = Paragraph::new("waiting for first chart poll…")
                .style(theme::label())
                .centered();
            frame.render_widget(placeholder, inner);
        }
    }

    fn render_recent(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(theme::border())
            .title(" Recent detections ")
            .title_style(theme::title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let now = Utc::now();
        let lines: Vec<Line<'_>> = match self.log.as_deref() {
            None => vec![Line::styled("loading…", theme::label())],
            Some(log) if log.is_empty() => vec![Line::styled("no events yet", theme::label())],
            Some(log) => log
                .events()
                .iter()
                .take(usize::from(inner.height))
                .map(|event| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:>10}  ", humanize::time_ago(event.occurred_at, now)),
                            theme::label(),
                        ),
                        Span::styled(&event.description, theme::text()),
                    ])
                })
                .collect(),
        };
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Single-line fallback for terminals too small for the full layout.
    fn render_minimal(&self, frame: &mut Frame, area: Rect) {
        let line = match self.stats.as_deref() {
            Some(stats) => format!(
                "{} total · {} today · {}",
                stats.total,
                stats.today,
                stats.activity(self.active_window, Utc::now())
            ),
            None => "loading…".to_string(),
        };
        frame.render_widget(Paragraph::new(line).style(theme::text()), area);
    }
}

impl Component for DashboardScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StatsUpdated(stats) => self.stats = Some(stats.clone()),
            Action::LogUpdated(log) => self.log = Some(log.clone()),
            Action::SeriesUpdated(series) => {
                self.spark = series.values().collect();
                self.series = Some(series.clone());
            }
            Action::LinkChanged(link) => self.link = link.clone(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.height < 14 || area.width < 48 {
            self.render_minimal(frame, area);
            return;
        }

        let banner_height = if self.banner_active() { 3 } else { 0 };
        let [banner_area, cards_area, chart_area, recent_area] = Layout::vertical([
            Constraint::Length(banner_height),
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Min(4),
        ])
        .areas(area);

        self.render_banner(frame, banner_area);
        self.render_cards(frame, cards_area);
        self.render_chart(frame, chart_area);
        self.render_recent(frame, recent_area);
    }

    fn id(&self) -> ScreenId {
        ScreenId::Dashboard
    }
}

fn card(frame: &mut Frame, area: Rect, title: &str, value: Line<'_>, sub: Line<'_>) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .title(format!(" {title} "))
        .title_style(theme::title());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(vec![value, sub]).centered(), inner);
}
