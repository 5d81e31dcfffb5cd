//! Catalog payload loading and the read-only catalog store.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context as _, bail};
use bookbrowse_core::{AuthorId, Book, BookDetail, BookId, GenreId, Preview};
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: usize = 36;

/// The startup payload shape: the book list, the id→name maps, and the
/// page size for the show-more pagination.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPayload {
    pub books: Vec<Book>,
    pub authors: HashMap<AuthorId, String>,
    pub genres: HashMap<GenreId, String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// The load-time-fixed collection. Read-only after construction; selection
/// resolution goes through a precomputed id index rather than a scan.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
    authors: HashMap<AuthorId, String>,
    genres: HashMap<GenreId, String>,
    page_size: usize,
    index_by_id: HashMap<BookId, usize>,
}

impl Catalog {
    /// Reads and validates a catalog payload file. Any failure here is
    /// fatal to startup.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("read catalog payload {}", path.as_ref().display()))?;
        let payload: CatalogPayload = serde_json::from_str(&raw)
            .with_context(|| format!("parse catalog payload {}", path.as_ref().display()))?;
        Self::from_payload(payload)
    }

    pub fn from_payload(payload: CatalogPayload) -> anyhow::Result<Self> {
        if payload.page_size == 0 {
            bail!("catalog payload: page_size must be positive");
        }

        let mut index_by_id = HashMap::with_capacity(payload.books.len());
        for (idx, book) in payload.books.iter().enumerate() {
            if index_by_id.insert(book.id.clone(), idx).is_some() {
                bail!("catalog payload: duplicate book id {}", book.id);
            }
        }

        Ok(Self {
            books: payload.books,
            authors: payload.authors,
            genres: payload.genres,
            page_size: payload.page_size,
            index_by_id,
        })
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn author_name(&self, id: &AuthorId) -> Option<&str> {
        self.authors.get(id).map(String::as_str)
    }

    pub fn genre_name(&self, id: &GenreId) -> Option<&str> {
        self.genres.get(id).map(String::as_str)
    }

    /// All authors, sorted by display name for option lists.
    pub fn authors_sorted(&self) -> Vec<(AuthorId, String)> {
        sorted_by_name(&self.authors)
    }

    /// All genres, sorted by display name for option lists.
    pub fn genres_sorted(&self) -> Vec<(GenreId, String)> {
        sorted_by_name(&self.genres)
    }

    /// Resolves an opaque id against the current catalog. Ids arriving from
    /// stale render state are an expected miss, not an error.
    pub fn resolve(&self, id: &BookId) -> Option<&Book> {
        self.index_by_id.get(id).map(|&idx| &self.books[idx])
    }

    pub fn preview(&self, book: &Book) -> Preview {
        project(book, &self.authors)
    }

    /// Detail view-model for a selected id; `None` when the id no longer
    /// resolves, in which case no detail view opens.
    pub fn detail(&self, id: &BookId) -> Option<BookDetail> {
        let book = self.resolve(id)?;
        Some(BookDetail {
            title: book.title.clone(),
            description: book.description.clone(),
            image: book.image.clone(),
            author_name: self.author_name(&book.author).map(str::to_string),
            published_year: book.published_year(),
        })
    }
}

/// Pure preview projection. An author id missing from the map leaves the
/// name absent; the renderer degrades instead of failing.
pub fn project(book: &Book, authors: &HashMap<AuthorId, String>) -> Preview {
    Preview {
        id: book.id.clone(),
        title: book.title.clone(),
        author_name: authors.get(&book.author).cloned(),
        image: book.image.clone(),
    }
}

fn sorted_by_name<K: Clone + Eq + std::hash::Hash>(map: &HashMap<K, String>) -> Vec<(K, String)> {
    let mut out: Vec<(K, String)> = map
        .iter()
        .map(|(id, name)| (id.clone(), name.clone()))
        .collect();
    out.sort_by(|a, b| {
        a.1.to_lowercase()
            .cmp(&b.1.to_lowercase())
            .then_with(|| a.1.cmp(&b.1))
    });
    out
}
