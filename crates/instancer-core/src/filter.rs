//! Catalog filtering: include/exclude label sets plus a name search
//!
//! The filter is plain data owned by the catalog screen. `matches` is a pure
//! predicate so it can be tested without any UI around it.

use std::collections::BTreeSet;

use crate::types::ChallengeSummary;

/// Pseudo-label carried by challenges with a live deployment
pub const STATUS_ACTIVE: &str = "active";
/// Pseudo-label carried by challenges without a live deployment
pub const STATUS_INACTIVE: &str = "inactive";

/// Include/exclude/search filter state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
    search: String,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(&self) -> &BTreeSet<String> {
        &self.include
    }

    pub fn exclude(&self) -> &BTreeSet<String> {
        &self.exclude
    }

    /// Lowercased search text
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_included(&self, label: &str) -> bool {
        self.include.contains(label)
    }

    pub fn is_excluded(&self, label: &str) -> bool {
        self.exclude.contains(label)
    }

    /// Flip membership of `label` in the include set
    pub fn toggle_include(&mut self, label: &str) {
        if !self.include.remove(label) {
            self.include.insert(label.to_string());
        }
    }

    /// Flip membership of `label` in the exclude set
    pub fn toggle_exclude(&mut self, label: &str) {
        if !self.exclude.remove(label) {
            self.exclude.insert(label.to_string());
        }
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_lowercase();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Whether any constraint is active
    pub fn is_active(&self) -> bool {
        !self.include.is_empty() || !self.exclude.is_empty() || !self.search.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Decide whether a catalog entry is shown.
    ///
    /// Labels are the challenge's categories and tags plus `active` or
    /// `inactive`. An entry is shown when it carries at least one included
    /// label (or nothing is included), carries no excluded label, and its
    /// name contains the search text.
    pub fn matches(&self, summary: &ChallengeSummary, now: i64) -> bool {
        let info = &summary.challenge_info;
        let status = if summary.is_deployed(now) {
            STATUS_ACTIVE
        } else {
            STATUS_INACTIVE
        };

        let carries_any = |set: &BTreeSet<String>| {
            set.contains(status) || info.tags.iter().any(|t| set.contains(&t.name))
        };

        let included = self.include.is_empty() || carries_any(&self.include);
        let excluded = carries_any(&self.exclude);

        let found = self.search.is_empty() || info.name.to_lowercase().contains(&self.search);

        included && !excluded && found
    }

    /// The visible subset of `items`, in catalog order
    pub fn apply<'a>(&self, items: &'a [ChallengeSummary], now: i64) -> Vec<&'a ChallengeSummary> {
        items.iter().filter(|s| self.matches(s, now)).collect()
    }
}

/// Selectable labels for the filter sidebar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub statuses: Vec<String>,
}

impl Facets {
    /// Collect sorted, de-duplicated categories and tags across `items`
    pub fn collect(items: &[ChallengeSummary]) -> Self {
        let mut categories = BTreeSet::new();
        let mut tags = BTreeSet::new();
        for item in items {
            for tag in &item.challenge_info.tags {
                if tag.is_category {
                    categories.insert(tag.name.clone());
                } else {
                    tags.insert(tag.name.clone());
                }
            }
        }

        Self {
            categories: categories.into_iter().collect(),
            tags: tags.into_iter().collect(),
            statuses: vec![STATUS_ACTIVE.to_string(), STATUS_INACTIVE.to_string()],
        }
    }
}
