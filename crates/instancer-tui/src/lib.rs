//! instancer-tui - Terminal UI for the instancer client
//!
//! Renders the catalog, challenge, login, registration and profile screens
//! with ratatui and feeds crossterm key events into the [`Engine`].
//!
//! [`Engine`]: instancer_app::Engine

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use runner::run;
