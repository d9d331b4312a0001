//! Semantic style builders.

use instancer_app::ControllerState;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use super::palette;

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

// --- Text ---
pub fn text_primary() -> Style {
    fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    fg(palette::TEXT_MUTED)
}

// --- Borders ---
pub fn border_inactive() -> Style {
    fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    fg(palette::BORDER_ACTIVE)
}

// --- Accent ---
pub fn accent() -> Style {
    fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

// --- Status colors ---
pub fn status_green() -> Style {
    fg(palette::STATUS_GREEN)
}

pub fn status_red() -> Style {
    fg(palette::STATUS_RED)
}

pub fn status_yellow() -> Style {
    fg(palette::STATUS_YELLOW)
}

pub fn status_blue() -> Style {
    fg(palette::STATUS_BLUE)
}

/// Key names in hints share the warning color
pub fn keybinding() -> Style {
    status_yellow()
}

/// Cursor row of the focused list
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Selected row of an unfocused list
pub fn unfocused_selected() -> Style {
    Style::default()
        .fg(palette::TEXT_PRIMARY)
        .add_modifier(Modifier::REVERSED)
}

/// Rounded card frame, highlighted while it has focus
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
}

/// Red-framed block for a control that just failed
pub fn shake_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(status_red())
        .style(Style::default().bg(palette::SHAKE_BG))
}

/// `(icon, label, style)` for the deployment controller state
pub fn controller_indicator(state: ControllerState) -> (&'static str, &'static str, Style) {
    match state {
        ControllerState::Deployed => (
            "●",
            "Deployed",
            status_green().add_modifier(Modifier::BOLD),
        ),
        ControllerState::Deploying => (
            "↻",
            "Deploying",
            status_yellow().add_modifier(Modifier::BOLD),
        ),
        ControllerState::Extending => (
            "↻",
            "Extending",
            status_yellow().add_modifier(Modifier::BOLD),
        ),
        ControllerState::Terminating => ("✗", "Terminating", status_red()),
        ControllerState::Idle => ("○", "Not deployed", text_muted()),
    }
}
