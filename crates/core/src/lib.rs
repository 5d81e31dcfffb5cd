//! Core domain types for Bookbrowse.

use chrono::{DateTime, Datelike as _, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreId(pub String);

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single catalog record. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: AuthorId,
    pub image: String,
    pub description: String,
    pub published: DateTime<Utc>,
    pub genres: Vec<GenreId>,
}

impl Book {
    pub fn published_year(&self) -> i32 {
        self.published.year()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorFilter {
    Any,
    Selected(AuthorId),
}

impl Default for AuthorFilter {
    fn default() -> Self {
        Self::Any
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreFilter {
    Any,
    Selected(GenreId),
}

impl Default for GenreFilter {
    fn default() -> Self {
        Self::Any
    }
}

/// One search submission. `Default` is the initial-load criteria: empty
/// title query, author and genre both "any".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub title_query: String,
    pub author: AuthorFilter,
    pub genre: GenreFilter,
}

impl FilterCriteria {
    /// True when the criteria cannot exclude anything.
    pub fn is_unfiltered(&self) -> bool {
        self.title_query.trim().is_empty()
            && self.author == AuthorFilter::Any
            && self.genre == GenreFilter::Any
    }
}

/// Render-ready reduction of a book for the card list. Recomputed per
/// render, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub id: BookId,
    pub title: String,
    pub author_name: Option<String>,
    pub image: String,
}

/// View-model for the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetail {
    pub title: String,
    pub description: String,
    pub image: String,
    pub author_name: Option<String>,
    pub published_year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Day,
    Night,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Day
    }
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Day => "day",
            Theme::Night => "night",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Theme::Day => Theme::Night,
            Theme::Night => Theme::Day,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Theme::Day),
            "night" => Ok(Theme::Night),
            _ => Err("unknown theme"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn make_book() -> Book {
        Book {
            id: BookId("b1".to_string()),
            title: "The Trial".to_string(),
            author: AuthorId("a1".to_string()),
            image: "https://example.org/trial.jpg".to_string(),
            description: "A novel.".to_string(),
            published: Utc.with_ymd_and_hms(1925, 4, 26, 0, 0, 0).unwrap(),
            genres: vec![GenreId("g1".to_string())],
        }
    }

    #[test]
    fn published_year_from_timestamp() {
        assert_eq!(make_book().published_year(), 1925);
    }

    #[test]
    fn default_criteria_are_unfiltered() {
        assert!(FilterCriteria::default().is_unfiltered());
    }

    #[test]
    fn whitespace_query_is_still_unfiltered() {
        let criteria = FilterCriteria {
            title_query: "   ".to_string(),
            ..Default::default()
        };
        assert!(criteria.is_unfiltered());
    }

    #[test]
    fn selected_author_is_filtered() {
        let criteria = FilterCriteria {
            author: AuthorFilter::Selected(AuthorId("a1".to_string())),
            ..Default::default()
        };
        assert!(!criteria.is_unfiltered());
    }

    #[test]
    fn theme_cycles_and_parses() {
        assert_eq!(Theme::Day.cycle(), Theme::Night);
        assert_eq!(Theme::Night.cycle(), Theme::Day);
        assert_eq!("day".parse::<Theme>().unwrap(), Theme::Day);
        assert_eq!(" NIGHT ".parse::<Theme>().unwrap(), Theme::Night);
        assert!("dusk".parse::<Theme>().is_err());
    }

    #[test]
    fn book_deserializes_from_payload_shape() {
        let json = r#"{
            "id": "b9",
            "title": "Dawn",
            "author": "a2",
            "image": "https://example.org/dawn.jpg",
            "description": "First of a trilogy.",
            "published": "1987-05-01T00:00:00.000Z",
            "genres": ["g1", "g2"]
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.id, BookId("b9".to_string()));
        assert_eq!(book.published_year(), 1987);
        assert_eq!(book.genres.len(), 2);
    }
}
