use std::collections::HashSet;

use crate::api::{BookId, CollectionCreate, CollectionId, UserId};
use crate::client::BookstoreClient;
use crate::error::BookstoreError;

/// Ids of the books the user saved, backing the bookmark icons of the browse screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedBooks {
    user_id: UserId,
    saved: HashSet<BookId>,
}

impl SavedBooks {
    pub async fn load(client: &BookstoreClient, user_id: UserId) -> Result<Self, BookstoreError> {
        let saved = client
            .get_collection_by_user(user_id)
            .await?
            .into_iter()
            .map(|collection| collection.book_id)
            .collect();
        Ok(Self { user_id, saved })
    }

    pub fn is_saved(&self, book_id: BookId) -> bool {
        self.saved.contains(&book_id)
    }

    pub fn saved(&self) -> &HashSet<BookId> {
        &self.saved
    }

    /// Saves or unsaves the book, returns whether it is saved afterwards.
    ///
    /// Unsaving looks the collection up again, so a stale local id is never deleted.
    /// A refused save leaves the set unchanged.
    pub async fn toggle(
        &mut self,
        client: &BookstoreClient,
        book_id: BookId,
    ) -> Result<bool, BookstoreError> {
        if self.is_saved(book_id) {
            let collection = client
                .get_collection_by_user(self.user_id)
                .await?
                .into_iter()
                .find(|collection| collection.book_id == book_id);
            match collection {
                Some(collection) => {
                    client
                        .delete_collection(collection.collection_id, self.user_id)
                        .await?;
                }
                None => tracing::warn!(
                    "Book {} was not saved on the server for user {}",
                    book_id,
                    self.user_id
                ),
            }
            self.saved.remove(&book_id);
            Ok(false)
        } else {
            let created = client
                .post_collection(&CollectionCreate {
                    user_id: self.user_id,
                    book_id,
                })
                .await?;
            if created.is_some() {
                self.saved.insert(book_id);
            }
            Ok(created.is_some())
        }
    }
}

/// Saved state of a single book, as on the book details screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookSaveState {
    pub user_id: UserId,
    pub book_id: BookId,
    pub collection_id: Option<CollectionId>,
}

impl BookSaveState {
    pub async fn load(
        client: &BookstoreClient,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<Self, BookstoreError> {
        let collection_id = client
            .get_collection_by_user_and_book(user_id, book_id)
            .await?
            .first()
            .map(|collection| collection.collection_id);
        Ok(Self {
            user_id,
            book_id,
            collection_id,
        })
    }

    pub fn is_saved(&self) -> bool {
        self.collection_id.is_some()
    }

    /// Returns whether the book is saved afterwards
    pub async fn toggle(&mut self, client: &BookstoreClient) -> Result<bool, BookstoreError> {
        if self.is_saved() {
            let collections = client
                .get_collection_by_user_and_book(self.user_id, self.book_id)
                .await?;
            if let Some(collection) = collections.first() {
                client
                    .delete_collection(collection.collection_id, self.user_id)
                    .await?;
            }
            self.collection_id = None;
        } else {
            let created = client
                .post_collection(&CollectionCreate {
                    user_id: self.user_id,
                    book_id: self.book_id,
                })
                .await?;
            if let Some(collection) = created {
                self.collection_id = Some(collection.collection_id);
            }
        }
        Ok(self.is_saved())
    }
}
