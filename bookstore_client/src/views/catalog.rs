use futures_util::future::join3;

use crate::api::{Book, BookGenreLink, Genre};
use crate::client::BookstoreClient;
use crate::error::BookstoreError;
use crate::filter::BookFilter;

/// Failures of the independent catalog requests, a failed part leaves its list empty
#[derive(Debug, Default)]
pub struct CatalogLoadErrors {
    pub books: Option<BookstoreError>,
    pub genres: Option<BookstoreError>,
    pub book_genres: Option<BookstoreError>,
}

impl CatalogLoadErrors {
    pub fn is_empty(&self) -> bool {
        self.books.is_none() && self.genres.is_none() && self.book_genres.is_none()
    }
}

/// Everything the browse screen shows
#[derive(Debug, Default)]
pub struct CatalogView {
    pub books: Vec<Book>,
    pub genres: Vec<Genre>,
    pub book_genres: Vec<BookGenreLink>,
    pub errors: CatalogLoadErrors,
}

impl CatalogView {
    /// Fetches books, genres and book-genre links concurrently
    pub async fn load(client: &BookstoreClient) -> Self {
        let (books, genres, book_genres) = join3(
            client.get_books(),
            client.get_genres(),
            client.get_book_genres(),
        )
        .await;

        let mut errors = CatalogLoadErrors::default();
        let books = split("books", books, &mut errors.books);
        let genres = split("genres", genres, &mut errors.genres);
        let book_genres = split("book genres", book_genres, &mut errors.book_genres);

        Self {
            books,
            genres,
            book_genres,
            errors,
        }
    }

    pub fn filtered(&self, filter: &BookFilter) -> Vec<Book> {
        filter.apply(&self.books, &self.book_genres)
    }
}

fn split<T>(
    what: &str,
    result: Result<Vec<T>, BookstoreError>,
    error: &mut Option<BookstoreError>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            tracing::error!("Failed to load {}: {}", what, err);
            *error = Some(err);
            Vec::new()
        }
    }
}
