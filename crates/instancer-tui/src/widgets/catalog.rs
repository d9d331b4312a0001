//! Catalog widgets: challenge list, filter sidebar and search box

use instancer_app::catalog::{CatalogFocus, CatalogState};
use instancer_core::{format_countdown, seconds_remaining, ChallengeSummary};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::styles;

/// Clip `text` to `max` display columns, marking the cut with an ellipsis
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Filtered challenge list with the cursor row highlighted
pub struct ChallengeList<'a> {
    catalog: &'a CatalogState,
    now: i64,
}

impl<'a> ChallengeList<'a> {
    pub fn new(catalog: &'a CatalogState, now: i64) -> Self {
        Self { catalog, now }
    }

    fn row(&self, summary: &ChallengeSummary, name_width: usize) -> ListItem<'static> {
        let info = &summary.challenge_info;
        let (dot, dot_style) = if summary.is_deployed(self.now) {
            ("●", styles::status_green())
        } else {
            ("○", styles::text_muted())
        };

        let mut spans = vec![
            Span::styled(format!("{} ", dot), dot_style),
            Span::styled(
                format!(
                    "{:<width$}",
                    truncate_to_width(&info.name, name_width),
                    width = name_width
                ),
                styles::text_primary(),
            ),
            Span::raw(" "),
            Span::styled(info.categories().join(", "), styles::accent()),
        ];

        if let Some(d) = summary.deployment.as_ref().filter(|d| d.is_live(self.now)) {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format_countdown(seconds_remaining(d.expiration, self.now)),
                styles::status_green(),
            ));
        }

        ListItem::new(Line::from(spans))
    }
}

impl Widget for ChallengeList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let focused = self.catalog.focus == CatalogFocus::List;
        let visible = self.catalog.visible(self.now);
        let title = if self.catalog.filter.is_active() {
            format!(" Challenges ({}/{}) ", visible.len(), self.catalog.items.len())
        } else {
            format!(" Challenges ({}) ", visible.len())
        };
        let block = styles::glass_block(focused).title(title);

        if visible.is_empty() {
            let text = if self.catalog.loading {
                "Loading challenges…"
            } else if self.catalog.items.is_empty() {
                "No challenges available."
            } else {
                "No challenges match the current filter. Press esc to reset."
            };
            Paragraph::new(Span::styled(text, styles::text_muted()))
                .block(block)
                .render(area, buf);
            return;
        }

        let name_width = (area.width as usize / 2).clamp(8, 40);
        let items: Vec<ListItem> = visible.iter().map(|s| self.row(s, name_width)).collect();
        let highlight = if focused {
            styles::focused_selected()
        } else {
            styles::unfocused_selected()
        };

        let list = List::new(items).block(block).highlight_style(highlight);
        let mut list_state = ListState::default().with_selected(Some(self.catalog.cursor));
        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}

/// Include/exclude checkboxes grouped by section
pub struct FilterSidebar<'a> {
    catalog: &'a CatalogState,
}

impl<'a> FilterSidebar<'a> {
    pub fn new(catalog: &'a CatalogState) -> Self {
        Self { catalog }
    }
}

impl Widget for FilterSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let focused = self.catalog.focus == CatalogFocus::Sidebar;
        let block = styles::glass_block(focused).title(" Filter ");

        let entries = self.catalog.sidebar_entries();
        let mut items = Vec::new();
        let mut selected_row = None;
        let mut section = None;

        for (i, entry) in entries.iter().enumerate() {
            if section != Some(entry.section) {
                section = Some(entry.section);
                items.push(ListItem::new(Line::from(Span::styled(
                    entry.section.title(),
                    styles::text_muted(),
                ))));
            }
            if i == self.catalog.sidebar_cursor {
                selected_row = Some(items.len());
            }
            let (mark, style) = if self.catalog.is_checked(entry) {
                let style = if entry.section.is_include() {
                    styles::status_green()
                } else {
                    styles::status_red()
                };
                ("[x]", style)
            } else {
                ("[ ]", styles::text_secondary())
            };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", mark), style),
                Span::styled(entry.label.clone(), styles::text_primary()),
            ])));
        }

        if items.is_empty() {
            Paragraph::new(Span::styled("Nothing to filter", styles::text_muted()))
                .block(block)
                .render(area, buf);
            return;
        }

        let highlight = if focused {
            styles::focused_selected()
        } else {
            Style::default()
        };
        let list = List::new(items).block(block).highlight_style(highlight);
        let mut list_state = ListState::default().with_selected(selected_row.filter(|_| focused));
        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}

/// One-line search box above the list
pub struct SearchInput<'a> {
    catalog: &'a CatalogState,
}

impl<'a> SearchInput<'a> {
    pub fn new(catalog: &'a CatalogState) -> Self {
        Self { catalog }
    }
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let focused = self.catalog.focus == CatalogFocus::Search;
        let mut spans = vec![Span::styled(" / ", styles::keybinding())];

        if self.catalog.search_input.is_empty() && !focused {
            spans.push(Span::styled("search by name", styles::text_muted()));
        } else {
            spans.push(Span::styled(
                self.catalog.search_input.clone(),
                styles::text_primary(),
            ));
            if focused {
                spans.push(Span::styled("█", styles::accent()));
            }
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
