use std::sync::Arc;

use serde::de::IgnoredAny;

use crate::api::{
    Author, Book, BookGenreLink, BookId, CartCreate, CartId, CartItem, CartQuantityUpdate,
    Collection, CollectionCreate, CollectionId, DeliveryType, Genre, LoginData, Order,
    OrderCreate, OrderDetails, OrderId, RegisterData, Review, ReviewCreate, ReviewId,
    ReviewPatch, ReviewPatchRequest, UserId, UserPatchData, UserResponse,
};
use crate::error::{BookstoreError, SoftFail, SoftFailEmpty};
use crate::resource_client::ResourceClient;
use crate::retry::RetryPolicy;
use crate::session_store::{Session, SessionStore};
use crate::validation;

/// Typed functions for every endpoint of the bookstore backend.
///
/// Cheap to clone, clones share the connection pool and the session store.
#[derive(Clone)]
pub struct BookstoreClient {
    resources: ResourceClient,
    session: Session,
    credential_retry: RetryPolicy,
}

impl BookstoreClient {
    pub fn new(url: &str, session_store: Arc<dyn SessionStore>) -> anyhow::Result<Self> {
        Ok(Self {
            resources: ResourceClient::new(url)?,
            session: Session::new(session_store),
            credential_retry: RetryPolicy::default(),
        })
    }

    pub fn with_credential_retry(self, credential_retry: RetryPolicy) -> Self {
        Self {
            credential_retry,
            ..self
        }
    }

    pub fn resources(&self) -> &ResourceClient {
        &self.resources
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn image_url(&self, image: &str) -> String {
        self.resources.image_url(image)
    }

    /// Calls POST /api/User
    pub async fn register(&self, data: &RegisterData) -> Result<UserResponse, BookstoreError> {
        self.resources
            .create_resource("User", data)
            .await
            .map_err(|err| auth_failure(err, "Registration failed"))
    }

    /// Calls POST /api/User/login
    pub async fn login(&self, data: &LoginData) -> Result<UserResponse, BookstoreError> {
        self.resources
            .create_resource("User/login", data)
            .await
            .map_err(|err| auth_failure(err, "Login failed"))
    }

    /// Calls DELETE /api/User/{user_id}
    pub async fn delete_user(&self, user_id: UserId) -> Result<(), BookstoreError> {
        self.resources
            .delete_resource::<IgnoredAny>("User", user_id)
            .await
            .map_err(|err| err.with_message("Failed to delete user account"))?;
        Ok(())
    }

    /// Calls PATCH /api/User/{user_id}, retried according to the client's credential retry policy
    pub async fn patch_user_credentials(
        &self,
        user_id: UserId,
        data: &UserPatchData,
    ) -> Result<(), BookstoreError> {
        self.patch_user_credentials_with_retries(user_id, data, self.credential_retry.max_retries)
            .await
    }

    /// Same as [`Self::patch_user_credentials`] with an explicit number of retries.
    /// The identical payload is sent on every attempt, so at most `1 + retries` requests are made.
    pub async fn patch_user_credentials_with_retries(
        &self,
        user_id: UserId,
        data: &UserPatchData,
        retries: u32,
    ) -> Result<(), BookstoreError> {
        self.resources
            .with_retry(&self.credential_retry.with_max_retries(retries))
            .patch_resource::<_, IgnoredAny>("User", user_id, data)
            .await
            .map_err(|err| {
                tracing::error!("Patch user credentials failed after {} retries: {}", retries, err);
                err.with_message("Failed to update credentials")
            })?;
        Ok(())
    }

    /// Calls GET /api/Book
    pub async fn get_books(&self) -> Result<Vec<Book>, BookstoreError> {
        self.resources.get_resource("Book").await
    }

    /// Calls GET /api/Book/{book_id}, details include genres, author and reviews
    pub async fn get_book(&self, book_id: BookId) -> Result<Book, BookstoreError> {
        self.resources.get_resource_by_id("Book", book_id).await
    }

    /// Calls GET /api/Genre
    pub async fn get_genres(&self) -> Result<Vec<Genre>, BookstoreError> {
        self.resources.get_resource("Genre").await
    }

    /// Calls GET /api/BookGenre
    pub async fn get_book_genres(&self) -> Result<Vec<BookGenreLink>, BookstoreError> {
        self.resources.get_resource("BookGenre").await
    }

    /// Calls GET /api/Author
    pub async fn get_authors(&self) -> Result<Vec<Author>, BookstoreError> {
        self.resources.get_resource("Author").await
    }

    /// Calls GET /api/Collection?userId={user_id}
    pub async fn get_collection_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Collection>, BookstoreError> {
        self.resources
            .get_resource_with_query("Collection", &[("userId", user_id.to_string())])
            .await
            .map_err(|err| err.with_message("Failed to fetch saved collections"))
    }

    /// Calls GET /api/Collection?userId={user_id}&bookId={book_id}
    /// Any failure status means "not saved" and gives an empty list
    pub async fn get_collection_by_user_and_book(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<Vec<Collection>, BookstoreError> {
        self.resources
            .get_resource_with_query::<Vec<Collection>>(
                "Collection",
                &[
                    ("userId", user_id.to_string()),
                    ("bookId", book_id.to_string()),
                ],
            )
            .await
            .or_empty("get collection by user and book")
    }

    /// Calls POST /api/Collection
    /// Returns None if the backend refused to save the book
    pub async fn post_collection(
        &self,
        collection: &CollectionCreate,
    ) -> Result<Option<Collection>, BookstoreError> {
        self.resources
            .create_resource::<_, Collection>("Collection", collection)
            .await
            .or_none("post collection")
    }

    /// Calls DELETE /api/Collection/{collection_id}?userId={user_id}
    pub async fn delete_collection(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
    ) -> Result<(), BookstoreError> {
        self.resources
            .delete_resource_with_query::<IgnoredAny>(
                "Collection",
                collection_id,
                &[("userId", user_id.to_string())],
            )
            .await
            .map_err(|err| err.with_message("Failed to delete collection"))?;
        Ok(())
    }

    /// Calls POST /api/Cart, the backend adds a new line or bumps the quantity of the existing one
    /// Returns None if the backend refused
    pub async fn post_cart_item(
        &self,
        cart_item: &CartCreate,
    ) -> Result<Option<CartItem>, BookstoreError> {
        validation::validate_quantity(cart_item.quantity)?;
        self.resources
            .create_resource::<_, CartItem>("Cart", cart_item)
            .await
            .or_none("post cart item")
    }

    /// Calls GET /api/Cart?userId={user_id}
    pub async fn get_cart_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartItem>, BookstoreError> {
        self.resources
            .get_resource_with_query("Cart", &[("userId", user_id.to_string())])
            .await
            .map_err(|err| err.with_message("Failed to fetch cart"))
    }

    /// Calls DELETE /api/Cart/{cart_id}
    pub async fn delete_cart_item(&self, cart_id: CartId) -> Result<(), BookstoreError> {
        self.resources
            .delete_resource::<IgnoredAny>("Cart", cart_id)
            .await
            .map_err(|err| err.with_message("Failed to delete cart item"))?;
        Ok(())
    }

    /// Calls PUT /api/Cart/{cart_id}
    /// Quantities below 1 are rejected without calling the backend
    pub async fn update_cart_item_quantity(
        &self,
        cart_id: CartId,
        quantity: u32,
    ) -> Result<(), BookstoreError> {
        validation::validate_quantity(quantity)?;
        self.resources
            .update_resource::<_, IgnoredAny>("Cart", cart_id, &CartQuantityUpdate { quantity })
            .await
            .map_err(|err| err.with_message("Failed to update quantity"))?;
        Ok(())
    }

    /// Calls POST /api/Review
    /// Returns None if the backend refused the review
    pub async fn post_review(&self, review: &ReviewCreate) -> Result<Option<Review>, BookstoreError> {
        validation::validate_review(review.rating, &review.comment)?;
        self.resources
            .create_resource::<_, Review>("Review", review)
            .await
            .or_none("post review")
    }

    /// Calls GET /api/Review/user/{user_id}
    pub async fn get_reviews_by_user(&self, user_id: UserId) -> Result<Vec<Review>, BookstoreError> {
        self.resources
            .get_resource_by_id("Review/user", user_id)
            .await
            .map_err(|err| err.with_message("Failed to fetch reviews"))
    }

    /// Calls DELETE /api/Review/{review_id}?userId={session user}
    /// Fails without calling the backend when nobody is logged in
    pub async fn delete_review(&self, review_id: ReviewId) -> Result<(), BookstoreError> {
        let Some(user_id) = self.session.current_user_id().await? else {
            tracing::warn!("Refusing to delete review {}, no user logged in", review_id);
            return Err(BookstoreError::Auth("User not logged in".to_string()));
        };

        self.resources
            .delete_resource_with_query::<IgnoredAny>(
                "Review",
                review_id,
                &[("userId", user_id.to_string())],
            )
            .await
            .map_err(|err| err.with_message("Failed to delete review"))?;
        Ok(())
    }

    /// Calls PATCH /api/Review/{review_id} with the session user attached.
    /// Without a session user `userId` is sent as null and left for the backend to reject.
    pub async fn patch_review(
        &self,
        review_id: ReviewId,
        patch: &ReviewPatch,
    ) -> Result<Review, BookstoreError> {
        let user_id = self.session.current_user_id().await?;
        let request = ReviewPatchRequest {
            patch: patch.clone(),
            user_id,
        };
        self.resources
            .patch_resource("Review", review_id, &request)
            .await
            .map_err(|err| err.with_message("Failed to update review"))
    }

    /// Calls GET /api/Order?userId={user_id}
    pub async fn get_orders_by_user_id(&self, user_id: UserId) -> Result<Vec<Order>, BookstoreError> {
        self.resources
            .get_resource_with_query("Order", &[("userId", user_id.to_string())])
            .await
            .map_err(|err| err.with_message("Failed to fetch orders"))
    }

    /// Calls GET /api/Order/{order_id}
    pub async fn get_order_by_id(&self, order_id: OrderId) -> Result<OrderDetails, BookstoreError> {
        self.resources
            .get_resource_by_id("Order", order_id)
            .await
            .map_err(|err| err.with_message("Failed to fetch order"))
    }

    /// Calls POST /api/Order
    /// On failure the response body is kept in the error for diagnostics.
    /// Any success status means the order is placed, the details are None when
    /// the body is empty or has another shape.
    pub async fn post_order(
        &self,
        order: &OrderCreate,
    ) -> Result<Option<OrderDetails>, BookstoreError> {
        let placed: serde_json::Value = self
            .resources
            .create_resource("Order", order)
            .await
            .map_err(|err| {
                if let BookstoreError::Network { status, body, .. } = &err {
                    tracing::error!("Post order failed with status {}: {}", status, body);
                }
                err.with_message("Failed to place order")
            })?;
        if placed.is_null() {
            return Ok(None);
        }
        match serde_json::from_value(placed) {
            Ok(details) => Ok(Some(details)),
            Err(err) => {
                tracing::warn!("Order placed, but its details could not be read: {}", err);
                Ok(None)
            }
        }
    }

    /// Calls GET /api/DeliveryType
    pub async fn get_delivery_types(&self) -> Result<Vec<DeliveryType>, BookstoreError> {
        self.resources
            .get_resource("DeliveryType")
            .await
            .map_err(|err| err.with_message("Failed to fetch delivery types"))
    }
}

/// Status failures of the auth endpoints become AuthError, the rest is passed on
fn auth_failure(err: BookstoreError, message: &str) -> BookstoreError {
    if err.is_status_failure() {
        tracing::warn!("{}: {}", message, err);
        BookstoreError::Auth(message.to_string())
    } else {
        err
    }
}
