//! Application orchestration layer for Bookbrowse.
//!
//! A [`Session`] owns the catalog, the active filter criteria, the pager,
//! and the theme, and is the only holder of browsing state. Operations
//! return plain outcome values; rendering lives entirely above this crate.

use bookbrowse_catalog::Catalog;
use bookbrowse_core::{BookDetail, BookId, FilterCriteria, Preview, Theme};
use bookbrowse_engine::{Pager, filter_books};

/// Result of a search submission: the first page of the new working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub previews: Vec<Preview>,
    pub remaining: usize,
    /// True when nothing matched; the renderer shows the empty-state
    /// message instead of cards.
    pub empty: bool,
}

/// Result of a show-more click: the next page to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoreOutcome {
    pub previews: Vec<Preview>,
    pub remaining: usize,
}

#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    criteria: FilterCriteria,
    pager: Pager,
    theme: Theme,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        let pager = Pager::new(catalog.page_size());
        Self {
            catalog,
            criteria: FilterCriteria::default(),
            pager,
            theme: Theme::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.cycle();
    }

    pub fn remaining(&self) -> usize {
        self.pager.remaining()
    }

    /// Runs the filter over the full catalog, replaces the working set
    /// wholesale, and resets pagination to the first page. With the
    /// default criteria this is the initial-load view.
    pub fn submit_search(&mut self, criteria: FilterCriteria) -> SearchOutcome {
        let working_set = filter_books(self.catalog.books(), &criteria);
        let empty = working_set.is_empty();
        self.criteria = criteria;
        let page = self.pager.reset(working_set);
        SearchOutcome {
            previews: self.project(&page.books),
            remaining: page.remaining,
            empty,
        }
    }

    /// Advances within the current working set without re-running the
    /// filter. Callers must keep the affordance disabled at remaining == 0;
    /// the pager clamps if they do not.
    pub fn show_more(&mut self) -> MoreOutcome {
        let page = self.pager.advance();
        MoreOutcome {
            previews: self.project(&page.books),
            remaining: page.remaining,
        }
    }

    /// Resolves a selection id against the current catalog, never against
    /// anything cached from a previous working set. A miss opens nothing.
    pub fn select(&self, id: &BookId) -> Option<BookDetail> {
        self.catalog.detail(id)
    }

    fn project(&self, books: &[bookbrowse_core::Book]) -> Vec<Preview> {
        books.iter().map(|book| self.catalog.preview(book)).collect()
    }
}
