use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type BookId = i64;
pub type GenreId = i64;
pub type AuthorId = i64;
pub type CollectionId = i64;
pub type CartId = i64;
pub type ReviewId = i64;
pub type OrderId = i64;
pub type DeliveryTypeId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct LoginData {
    /// Username or email
    pub identifier: String,
    pub password: String,
}

/// Returned by login and registration.
/// The backend has been seen answering both in camelCase and PascalCase, both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(alias = "UserId")]
    pub user_id: UserId,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Username")]
    pub username: String,
}

/// Partial update of the user account, only present fields are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPatchData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub genre_id: GenreId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookGenre {
    pub book_genre_id: i64,
    pub book_id: BookId,
    pub genre_id: GenreId,
    pub genre: Genre,
}

/// Flat book to genre link as served by the `BookGenre` resource, used for filtering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct BookGenreLink {
    #[serde(alias = "BookId")]
    pub book_id: BookId,
    #[serde(alias = "GenreId")]
    pub genre_id: GenreId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub author_id: AuthorId,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub price: f64,
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub year_published: i32,
    #[serde(default)]
    pub number_of_pages: i32,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_genre: Option<Vec<BookGenre>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<Vec<Review>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

impl Book {
    /// Genres embedded in the book details, empty when the backend did not include them
    pub fn genres(&self) -> Vec<Genre> {
        self.book_genre
            .iter()
            .flatten()
            .map(|link| link.genre.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionUser {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A book saved by the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub collection_id: CollectionId,
    pub user_id: UserId,
    pub book_id: BookId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<CollectionUser>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCreate {
    pub user_id: UserId,
    pub book_id: BookId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartBookSummary {
    pub title: String,
    pub price: f64,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub cart_id: CartId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub quantity: u32,
    pub book: CartBookSummary,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.book.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartCreate {
    pub user_id: UserId,
    pub book_id: BookId,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct CartQuantityUpdate {
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUser {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBook {
    pub book_id: BookId,
    pub title: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: ReviewId,
    pub book_id: BookId,
    pub user_id: UserId,
    pub rating: u8,
    pub comment: String,
    pub date_created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ReviewUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<ReviewBook>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreate {
    pub book_id: BookId,
    pub user_id: UserId,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Body sent by `patch_review`, the acting user is attached from the session
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPatchRequest {
    #[serde(flatten)]
    pub patch: ReviewPatch,
    pub user_id: Option<UserId>,
}

/// Entry of the order history list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub order_date: String,
    #[serde(default)]
    pub order_status_name: String,
    #[serde(default)]
    pub total_item_count: u32,
    #[serde(default)]
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetails {
    pub order_item_id: i64,
    pub book_id: BookId,
    pub book_title: String,
    pub image_url: String,
    pub quantity: u32,
    pub price_at_purchase: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order_id: OrderId,
    pub order_date: String,
    #[serde(default)]
    pub order_status_name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub delivery_type_name: String,
    pub delivery_fee: f64,
    #[serde(default)]
    pub total_price: Option<f64>,
    pub order_items: Vec<OrderItemDetails>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemCreate {
    pub book_id: BookId,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub delivery_type_id: DeliveryTypeId,
    pub order_items: Vec<OrderItemCreate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryType {
    pub delivery_type_id: DeliveryTypeId,
    pub name: String,
    pub fee: f64,
}

/// Locally persisted copy of the logged in user
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl From<UserResponse> for SessionUser {
    fn from(user: UserResponse) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            username: user.username,
            street: None,
            city: None,
            postal_code: None,
        }
    }
}
