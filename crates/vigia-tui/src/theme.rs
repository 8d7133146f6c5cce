//! Night-watch palette and the semantic styles built from it.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ────────────────────────────────────────────────────────

pub const AMBER: Color = Color::Rgb(0xf0, 0xc6, 0x74);
pub const SIGNAL_GREEN: Color = Color::Rgb(0x8e, 0xc0, 0x7c);
pub const ALERT_RED: Color = Color::Rgb(0xe0, 0x6c, 0x75);
pub const SKY_BLUE: Color = Color::Rgb(0x7f, 0xb4, 0xca);
pub const VIOLET: Color = Color::Rgb(0xb4, 0x8e, 0xad);
pub const DIM_WHITE: Color = Color::Rgb(0xd8, 0xd8, 0xd8);
pub const GRAY: Color = Color::Rgb(0x66, 0x6c, 0x7c);
pub const BG_HIGHLIGHT: Color = Color::Rgb(0x2a, 0x2f, 0x3a);
pub const BG_DARK: Color = Color::Rgb(0x14, 0x17, 0x1e);

// ── Semantic styles ────────────────────────────────────────────────

pub fn border() -> Style {
    Style::default().fg(GRAY)
}

pub fn title() -> Style {
    Style::default().fg(DIM_WHITE).add_modifier(Modifier::BOLD)
}

pub fn text() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn label() -> Style {
    Style::default().fg(GRAY)
}

pub fn online() -> Style {
    Style::default().fg(SIGNAL_GREEN)
}

pub fn degraded() -> Style {
    Style::default().fg(ALERT_RED).add_modifier(Modifier::BOLD)
}

pub fn active() -> Style {
    Style::default()
        .fg(SIGNAL_GREEN)
        .add_modifier(Modifier::BOLD)
}

pub fn idle() -> Style {
    Style::default().fg(AMBER)
}

pub fn tab_active() -> Style {
    Style::default().fg(SKY_BLUE).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(GRAY)
}

pub fn table_header() -> Style {
    Style::default().fg(VIOLET).add_modifier(Modifier::BOLD)
}

pub fn row_highlight() -> Style {
    Style::default()
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn status_bar() -> Style {
    Style::default().fg(GRAY).bg(BG_DARK)
}

pub fn help_key() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}
