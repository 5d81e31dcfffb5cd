//! Test helpers and fixtures.

use bookbrowse_catalog::{Catalog, CatalogPayload};
use bookbrowse_core::{AuthorId, Book, BookId, GenreId};
use chrono::{TimeZone as _, Utc};
use std::collections::HashMap;

pub fn make_book(id: &str, title: &str, author: &str, genres: &[&str]) -> Book {
    Book {
        id: BookId(id.to_string()),
        title: title.to_string(),
        author: AuthorId(author.to_string()),
        image: format!("https://example.org/{id}.jpg"),
        description: format!("Description of {title}."),
        published: Utc.with_ymd_and_hms(1990, 6, 1, 0, 0, 0).unwrap(),
        genres: genres.iter().map(|g| GenreId(g.to_string())).collect(),
    }
}

/// A catalog of `count` books spread over two authors and three genres,
/// the shape the scenario tests assume.
pub fn make_catalog(count: usize, page_size: usize) -> Catalog {
    let books: Vec<Book> = (0..count)
        .map(|n| {
            make_book(
                &format!("b{n}"),
                &format!("Book {n}"),
                &format!("a{}", n % 2),
                &[&format!("g{}", n % 3)],
            )
        })
        .collect();

    let mut authors = HashMap::new();
    authors.insert(AuthorId("a0".to_string()), "Author Zero".to_string());
    authors.insert(AuthorId("a1".to_string()), "Author One".to_string());

    let mut genres = HashMap::new();
    genres.insert(GenreId("g0".to_string()), "Genre Zero".to_string());
    genres.insert(GenreId("g1".to_string()), "Genre One".to_string());
    genres.insert(GenreId("g2".to_string()), "Genre Two".to_string());

    Catalog::from_payload(CatalogPayload {
        books,
        authors,
        genres,
        page_size,
    })
    .expect("fixture catalog is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookbrowse_application::Session;
    use bookbrowse_core::{AuthorFilter, FilterCriteria, GenreFilter};
    use bookbrowse_engine::{Pager, filter_books};

    #[test]
    fn builds_a_catalog_fixture() {
        let catalog = make_catalog(5, 36);
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.page_size(), 36);
    }

    #[test]
    fn forty_books_page_through_in_two_steps() {
        let mut session = Session::new(make_catalog(40, 36));
        let first = session.submit_search(FilterCriteria::default());
        assert_eq!(first.previews.len(), 36);
        assert_eq!(first.remaining, 4);

        let second = session.show_more();
        assert_eq!(second.previews.len(), 4);
        assert_eq!(second.remaining, 0);

        // The two pages cover the catalog exactly once, in order.
        let mut ids: Vec<String> = first.previews.into_iter().map(|p| p.id.0).collect();
        ids.extend(second.previews.into_iter().map(|p| p.id.0));
        let expected: Vec<String> = (0..40).map(|n| format!("b{n}")).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn filter_then_page_covers_the_working_set() {
        let catalog = make_catalog(30, 4);
        let criteria = FilterCriteria {
            author: AuthorFilter::Selected(AuthorId("a1".to_string())),
            ..Default::default()
        };
        let working_set = filter_books(catalog.books(), &criteria);
        assert_eq!(working_set.len(), 15);

        let mut pager = Pager::new(catalog.page_size());
        let mut seen = Vec::new();
        let mut page = pager.reset(working_set.clone());
        seen.extend(page.books);
        while page.remaining > 0 {
            page = pager.advance();
            seen.extend(page.books.clone());
        }
        assert_eq!(seen, working_set);
    }

    #[test]
    fn narrowing_and_widening_searches_keep_state_consistent() {
        let mut session = Session::new(make_catalog(40, 36));
        session.submit_search(FilterCriteria::default());
        session.show_more();

        let narrowed = session.submit_search(FilterCriteria {
            genre: GenreFilter::Selected(GenreId("g2".to_string())),
            ..Default::default()
        });
        assert_eq!(narrowed.previews.len(), 13);
        assert_eq!(narrowed.remaining, 0);

        let widened = session.submit_search(FilterCriteria::default());
        assert_eq!(widened.previews.len(), 36);
        assert_eq!(widened.remaining, 4);
        assert_eq!(widened.previews[0].id.0, "b0");
    }

    #[test]
    fn stale_ids_do_not_resolve_after_a_new_search() {
        let mut session = Session::new(make_catalog(4, 36));
        session.submit_search(FilterCriteria::default());
        // The catalog never changes under a search, so a real id keeps
        // resolving and a fabricated one never does.
        session.submit_search(FilterCriteria {
            title_query: "Book 2".to_string(),
            ..Default::default()
        });
        assert!(session.select(&BookId("b0".to_string())).is_some());
        assert!(session.select(&BookId("removed".to_string())).is_none());
    }
}
