//! Query-and-paginate engine: the stable multi-field filter and the pager
//! that windows the active working set into fixed-size pages.

use bookbrowse_core::{AuthorFilter, Book, FilterCriteria, GenreFilter};

/// Stable filter over the catalog order. A book matches when all three
/// fields match: title substring (case-insensitive, empty query matches
/// everything), author id, genre membership.
pub fn filter_books(books: &[Book], criteria: &FilterCriteria) -> Vec<Book> {
    let query = criteria.title_query.trim().to_lowercase();
    books
        .iter()
        .filter(|book| {
            let title_match = query.is_empty() || book.title.to_lowercase().contains(&query);
            let author_match = match &criteria.author {
                AuthorFilter::Any => true,
                AuthorFilter::Selected(id) => book.author == *id,
            };
            let genre_match = match &criteria.genre {
                GenreFilter::Any => true,
                GenreFilter::Selected(id) => book.genres.contains(id),
            };
            title_match && author_match && genre_match
        })
        .cloned()
        .collect()
}

/// One window of the working set plus the count of books left after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub books: Vec<Book>,
    pub remaining: usize,
}

impl Page {
    fn empty() -> Self {
        Self {
            books: Vec::new(),
            remaining: 0,
        }
    }
}

/// Windows the active working set into fixed-size pages. The working set is
/// replaced wholesale by `reset`; `advance` only ever moves forward.
#[derive(Debug, Clone)]
pub struct Pager {
    page_size: usize,
    current_page: usize,
    working_set: Vec<Book>,
}

impl Pager {
    /// `page_size` of zero is normalized to one page entry per page.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            working_set: Vec::new(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 1-based; never exceeds the last non-empty page of the working set.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn working_set(&self) -> &[Book] {
        &self.working_set
    }

    pub fn remaining(&self) -> usize {
        self.working_set
            .len()
            .saturating_sub(self.current_page * self.page_size)
    }

    /// Installs a new working set and returns its first page.
    pub fn reset(&mut self, working_set: Vec<Book>) -> Page {
        self.working_set = working_set;
        self.current_page = 1;
        Page {
            books: self.slice(0),
            remaining: self.remaining(),
        }
    }

    /// Returns the next page. Advancing past the end is a caller error
    /// (the show-more affordance must be disabled at remaining == 0);
    /// the pager clamps to an empty page rather than failing.
    pub fn advance(&mut self) -> Page {
        if self.remaining() == 0 {
            return Page::empty();
        }
        let start = self.current_page * self.page_size;
        self.current_page += 1;
        Page {
            books: self.slice(start),
            remaining: self.remaining(),
        }
    }

    fn slice(&self, start: usize) -> Vec<Book> {
        let start = start.min(self.working_set.len());
        let end = (start + self.page_size).min(self.working_set.len());
        self.working_set[start..end].to_vec()
    }
}
