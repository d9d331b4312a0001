//! Catalog screen state: challenge list, cursor, filter sidebar and search box

use chrono::{DateTime, Local};

use instancer_core::{CatalogFilter, ChallengeSummary, Facets};

/// Which part of the catalog receives keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogFocus {
    #[default]
    List,
    Sidebar,
    Search,
}

/// Sidebar dropdown a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarSection {
    IncludeCategory,
    IncludeTag,
    ExcludeCategory,
    ExcludeTag,
    ExcludeStatus,
}

impl SidebarSection {
    pub fn title(&self) -> &'static str {
        match self {
            SidebarSection::IncludeCategory => "INCLUDE CATEGORY",
            SidebarSection::IncludeTag => "INCLUDE TAG",
            SidebarSection::ExcludeCategory => "EXCLUDE CATEGORY",
            SidebarSection::ExcludeTag => "EXCLUDE TAG",
            SidebarSection::ExcludeStatus => "STATUS",
        }
    }

    pub fn is_include(&self) -> bool {
        matches!(
            self,
            SidebarSection::IncludeCategory | SidebarSection::IncludeTag
        )
    }
}

/// One selectable sidebar row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub section: SidebarSection,
    pub label: String,
}

/// State of the catalog screen
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub items: Vec<ChallengeSummary>,
    pub loading: bool,
    pub filter: CatalogFilter,
    pub focus: CatalogFocus,
    /// Index into the visible (filtered) list
    pub cursor: usize,
    pub sidebar_cursor: usize,
    /// Raw text of the search box; the filter keeps it lowercased
    pub search_input: String,
    pub last_refreshed: Option<DateTime<Local>>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list after a fetch, keeping filter and cursor where possible
    pub fn set_items(&mut self, items: Vec<ChallengeSummary>, now: i64) {
        self.items = items;
        self.loading = false;
        self.last_refreshed = Some(Local::now());
        self.clamp_cursor(now);
        self.clamp_sidebar_cursor();
    }

    pub fn visible(&self, now: i64) -> Vec<&ChallengeSummary> {
        self.filter.apply(&self.items, now)
    }

    pub fn selected(&self, now: i64) -> Option<&ChallengeSummary> {
        self.visible(now).get(self.cursor).copied()
    }

    pub fn move_cursor(&mut self, delta: isize, now: i64) {
        let len = self.visible(now).len();
        self.cursor = step(self.cursor, delta, len);
    }

    fn clamp_cursor(&mut self, now: i64) {
        let len = self.visible(now).len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    // ─────────────────────────────────────────────────────────
    // Sidebar
    // ─────────────────────────────────────────────────────────

    /// Sidebar rows in display order
    pub fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        let facets = Facets::collect(&self.items);
        let sections = [
            (SidebarSection::IncludeCategory, &facets.categories),
            (SidebarSection::IncludeTag, &facets.tags),
            (SidebarSection::ExcludeCategory, &facets.categories),
            (SidebarSection::ExcludeTag, &facets.tags),
            (SidebarSection::ExcludeStatus, &facets.statuses),
        ];

        sections
            .into_iter()
            .flat_map(|(section, labels)| {
                labels.iter().map(move |label| SidebarEntry {
                    section,
                    label: label.clone(),
                })
            })
            .collect()
    }

    pub fn is_checked(&self, entry: &SidebarEntry) -> bool {
        if entry.section.is_include() {
            self.filter.is_included(&entry.label)
        } else {
            self.filter.is_excluded(&entry.label)
        }
    }

    pub fn move_sidebar_cursor(&mut self, delta: isize) {
        let len = self.sidebar_entries().len();
        self.sidebar_cursor = step(self.sidebar_cursor, delta, len);
    }

    fn clamp_sidebar_cursor(&mut self) {
        let len = self.sidebar_entries().len();
        self.sidebar_cursor = self.sidebar_cursor.min(len.saturating_sub(1));
    }

    /// Toggle the label under the sidebar cursor
    pub fn toggle_sidebar_entry(&mut self, now: i64) {
        let Some(entry) = self.sidebar_entries().into_iter().nth(self.sidebar_cursor) else {
            return;
        };
        if entry.section.is_include() {
            self.filter.toggle_include(&entry.label);
        } else {
            self.filter.toggle_exclude(&entry.label);
        }
        self.clamp_cursor(now);
    }

    // ─────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────

    pub fn push_search(&mut self, c: char, now: i64) {
        self.search_input.push(c);
        self.filter.set_search(&self.search_input);
        self.clamp_cursor(now);
    }

    pub fn pop_search(&mut self, now: i64) {
        self.search_input.pop();
        self.filter.set_search(&self.search_input);
        self.clamp_cursor(now);
    }

    /// Drop every constraint and return focus to the list
    pub fn reset_filter(&mut self, now: i64) {
        self.filter.reset();
        self.search_input.clear();
        self.focus = CatalogFocus::List;
        self.clamp_cursor(now);
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
