//! Test utilities for TUI rendering verification
//!
//! Widgets and full screens are rendered into ratatui's TestBackend and
//! asserted on by searching the resulting buffer.
//!
//! # Example
//!
//! ```ignore
//! let mut term = TestTerminal::new();
//! term.render_widget(MainHeader::new(&state), term.area());
//! assert!(term.buffer_contains("Instancer"));
//! ```

use instancer_api::test_utils::{test_challenge, test_deployment};
use instancer_app::{AppState, ChallengeView, LoadState};
use instancer_core::{now_epoch, Route};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::Frame;
use ratatui::Terminal;

pub const TEST_WIDTH: u16 = 80;
pub const TEST_HEIGHT: u16 = 24;

/// Small enough that the catalog sidebar collapses
pub const COMPACT_WIDTH: u16 = 40;
pub const COMPACT_HEIGHT: u16 = 12;

/// In-memory terminal whose cells can be searched as text rows
pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    pub fn new() -> Self {
        Self::with_size(TEST_WIDTH, TEST_HEIGHT)
    }

    pub fn compact() -> Self {
        Self::with_size(COMPACT_WIDTH, COMPACT_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test backend never fails");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        *self.buffer().area()
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.draw_with(|frame| frame.render_widget(widget, area));
    }

    /// Draws a full frame, e.g. `render::view`
    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("draw to test backend");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    /// Each screen row as plain text
    pub fn rows(&self) -> Vec<String> {
        let buffer = self.buffer();
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    pub fn buffer_contains(&self, text: &str) -> bool {
        self.rows().iter().any(|row| row.contains(text))
    }

    pub fn line_contains(&self, line: u16, text: &str) -> bool {
        self.rows()
            .get(line as usize)
            .is_some_and(|row| row.contains(text))
    }

    /// Row index of the first line containing `text`
    pub fn find_line(&self, text: &str) -> Option<u16> {
        self.rows()
            .iter()
            .position(|row| row.contains(text))
            .map(|y| y as u16)
    }

    /// Whole screen, one row per line (handy in assertion messages)
    pub fn content(&self) -> String {
        self.rows().join("\n")
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed-in state on the catalog
pub fn create_test_state() -> AppState {
    let mut state = AppState::new();
    state.session = Some("session-token".to_string());
    state
}

/// Signed-in state showing challenge `id`, loaded, with an optional live
/// deployment of `ttl` seconds
pub fn state_on_challenge(id: &str, ttl: Option<i64>) -> AppState {
    let now = now_epoch();
    let mut state = create_test_state();
    state.route = Route::challenge(id);

    let mut view = ChallengeView::new(id);
    view.load = LoadState::Found(test_challenge(id));
    if let Some(ttl) = ttl {
        view.deployment = Some(test_deployment(now, ttl));
        view.resync_countdown(now);
    }
    state.challenge = Some(view);
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_sizes() {
        assert_eq!(TestTerminal::new().area(), Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT));
        assert_eq!(
            TestTerminal::compact().area(),
            Rect::new(0, 0, COMPACT_WIDTH, COMPACT_HEIGHT)
        );
    }

    #[test]
    fn test_buffer_contains() {
        use ratatui::widgets::Paragraph;

        let mut term = TestTerminal::with_size(20, 5);
        term.render_widget(Paragraph::new("Hello World"), term.area());

        assert!(term.buffer_contains("Hello World"));
        assert!(!term.buffer_contains("Goodbye"));
        assert_eq!(term.rows().len(), 5);
        assert_eq!(term.find_line("Hello"), Some(0));
        assert!(term.line_contains(0, "World"));
    }

    #[test]
    fn test_state_on_challenge_with_deployment() {
        let state = state_on_challenge("web-1", Some(600));
        let view = state.challenge.as_ref().unwrap();
        assert!(view.is_deployed(now_epoch()));
        assert!(view.countdown.running);
    }
}
