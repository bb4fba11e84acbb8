use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::api::{Book, BookGenreLink, BookId, GenreId};

/// How a selection of several genres is matched against the genres of a book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenreMatch {
    /// Book has at least one of the selected genres
    #[default]
    Any,
    /// Book has every selected genre
    All,
}

/// Books whose title contains `search_term` (trimmed, case insensitive) and
/// which are linked to any of the `selected` genres. Empty selection matches every book.
/// Order of `books` is preserved.
pub fn filter_books_by_genres(
    books: &[Book],
    links: &[BookGenreLink],
    selected: &HashSet<GenreId>,
    search_term: &str,
) -> Vec<Book> {
    BookFilter {
        search_term: search_term.to_string(),
        selected_genres: selected.clone(),
        genre_match: GenreMatch::Any,
    }
    .apply(books, links)
}

/// Search box and genre chips of the browse screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub search_term: String,
    pub selected_genres: HashSet<GenreId>,
    pub genre_match: GenreMatch,
}

impl BookFilter {
    /// Selects the genre, or deselects it when it already was selected
    pub fn toggle_genre(&mut self, genre_id: GenreId) {
        if !self.selected_genres.remove(&genre_id) {
            self.selected_genres.insert(genre_id);
        }
    }

    pub fn clear(&mut self) {
        self.search_term.clear();
        self.selected_genres.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.search_term.trim().is_empty() || !self.selected_genres.is_empty()
    }

    pub fn apply(&self, books: &[Book], links: &[BookGenreLink]) -> Vec<Book> {
        let needle = self.search_term.trim().to_lowercase();
        let genres_by_book: HashMap<BookId, HashSet<GenreId>> = links
            .iter()
            .map(|link| (link.book_id, link.genre_id))
            .into_grouping_map()
            .collect();

        books
            .iter()
            .filter(|book| book.title.to_lowercase().contains(&needle))
            .filter(|book| self.matches_genres(genres_by_book.get(&book.book_id)))
            .cloned()
            .collect()
    }

    fn matches_genres(&self, book_genres: Option<&HashSet<GenreId>>) -> bool {
        if self.selected_genres.is_empty() {
            return true;
        }
        let Some(book_genres) = book_genres else {
            return false;
        };
        match self.genre_match {
            GenreMatch::Any => !book_genres.is_disjoint(&self.selected_genres),
            GenreMatch::All => self.selected_genres.is_subset(book_genres),
        }
    }
}
