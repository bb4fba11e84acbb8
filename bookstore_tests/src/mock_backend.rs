use std::sync::Arc;

use bookstore_client::retry::RetryPolicy;
use bookstore_client::session_store::InMemorySessionStore;
use bookstore_client::BookstoreClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client against the mock server with an empty in-memory session and immediate retries
pub fn client(server: &MockServer) -> BookstoreClient {
    BookstoreClient::new(&server.uri(), Arc::new(InMemorySessionStore::default()))
        .expect("Failed to create client")
        .with_credential_retry(RetryPolicy::immediate(3))
}

pub fn cart_line(cart_id: i64, book_id: i64, quantity: u32, price: f64) -> Value {
    json!({
        "cartId": cart_id,
        "userId": 1,
        "bookId": book_id,
        "quantity": quantity,
        "book": {"title": format!("Book {book_id}"), "price": price, "imageUrl": format!("{book_id}.jpg")}
    })
}

pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/User/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"UserId": 1, "Email": "a@b.com", "Username": "alice"})),
        )
        .mount(server)
        .await;
}

pub async fn mount_cart(server: &MockServer, lines: Value) {
    Mock::given(method("GET"))
        .and(path("/api/Cart"))
        .and(query_param("userId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lines))
        .mount(server)
        .await;
}
