use std::fmt::Display;

use anyhow::Context;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::RetryTransientMiddleware;
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BookstoreError, NETWORK_ERROR_MESSAGE};
use crate::retry::{RetryEveryFailure, RetryPolicy};

/// Generic typed access to the `{base}/api/{resource}` family of endpoints.
///
/// Pure pass-through: no retries, no caching, timeouts are whatever reqwest defaults to.
/// Every non-success status becomes [`BookstoreError::Network`].
#[derive(Clone)]
pub struct ResourceClient {
    url: String,
    reqwest_client: reqwest::Client,
    client: ClientWithMiddleware,
}

impl ResourceClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client.clone())
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            reqwest_client,
            client,
        })
    }

    /// Same endpoints and connection pool, every failed request is retried according to `policy`
    pub fn with_retry(&self, policy: &RetryPolicy) -> Self {
        let client = ClientBuilder::new(self.reqwest_client.clone())
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            // Retry every failure, not only the transient ones
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                policy.backoff(),
                RetryEveryFailure,
            ))
            .build();

        Self {
            url: self.url.clone(),
            reqwest_client: self.reqwest_client.clone(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.url
    }

    /// `{base}/api/{resource}`
    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}/api/{}", self.url, resource)
    }

    /// `{base}/images/{image}`, images are served outside of the api
    pub fn image_url(&self, image: &str) -> String {
        format!("{}/images/{}", self.url, image.trim_start_matches('/'))
    }

    /// Calls GET /api/{resource}
    pub async fn get_resource<T: DeserializeOwned>(
        &self,
        resource: &str,
    ) -> Result<T, BookstoreError> {
        self.execute(self.client.get(self.resource_url(resource)))
            .await
    }

    /// Calls GET /api/{resource}?{query}
    pub async fn get_resource_with_query<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<T, BookstoreError> {
        self.execute(self.client.get(self.resource_url(resource)).query(query))
            .await
    }

    /// Calls GET /api/{resource}/{id}
    pub async fn get_resource_by_id<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: impl Display,
    ) -> Result<T, BookstoreError> {
        self.execute(
            self.client
                .get(format!("{}/{}", self.resource_url(resource), id)),
        )
        .await
    }

    /// Calls POST /api/{resource} with json body
    pub async fn create_resource<T: Serialize + ?Sized, U: DeserializeOwned>(
        &self,
        resource: &str,
        body: &T,
    ) -> Result<U, BookstoreError> {
        self.execute(self.client.post(self.resource_url(resource)).json(body))
            .await
    }

    /// Calls PUT /api/{resource}/{id} with json body
    pub async fn update_resource<T: Serialize + ?Sized, U: DeserializeOwned>(
        &self,
        resource: &str,
        id: impl Display,
        body: &T,
    ) -> Result<U, BookstoreError> {
        self.execute(
            self.client
                .put(format!("{}/{}", self.resource_url(resource), id))
                .json(body),
        )
        .await
    }

    /// Calls PATCH /api/{resource}/{id} with json body
    pub async fn patch_resource<T: Serialize + ?Sized, U: DeserializeOwned>(
        &self,
        resource: &str,
        id: impl Display,
        body: &T,
    ) -> Result<U, BookstoreError> {
        self.execute(
            self.client
                .patch(format!("{}/{}", self.resource_url(resource), id))
                .json(body),
        )
        .await
    }

    /// Calls DELETE /api/{resource}/{id}
    pub async fn delete_resource<U: DeserializeOwned>(
        &self,
        resource: &str,
        id: impl Display,
    ) -> Result<U, BookstoreError> {
        self.delete_resource_with_query(resource, id, &[]).await
    }

    /// Calls DELETE /api/{resource}/{id}?{query}
    pub async fn delete_resource_with_query<U: DeserializeOwned>(
        &self,
        resource: &str,
        id: impl Display,
        query: &[(&str, String)],
    ) -> Result<U, BookstoreError> {
        let mut request = self
            .client
            .delete(format!("{}/{}", self.resource_url(resource), id));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request).await
    }

    async fn execute<U: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<U, BookstoreError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!("Request failed with status {}: {}", status, body);
            return Err(BookstoreError::Network {
                status: status.as_u16(),
                message: NETWORK_ERROR_MESSAGE.to_string(),
                body,
            });
        }

        decode_body(&body)
    }
}

/// An empty body decodes as json `null`, so `()`, `Option<_>` and `IgnoredAny` accept it
fn decode_body<U: DeserializeOwned>(body: &str) -> Result<U, BookstoreError> {
    if body.trim().is_empty() {
        Ok(serde_json::from_str("null")?)
    } else {
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests_resource_client {
    use serde::de::IgnoredAny;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn urls() {
        let client = ResourceClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.resource_url("Book"), "http://localhost:5000/api/Book");
        assert_eq!(
            client.image_url("gatsby.jpg"),
            "http://localhost:5000/images/gatsby.jpg"
        );
    }

    #[test]
    fn empty_body_decodes_as_null() {
        decode_body::<()>("").unwrap();
        assert_eq!(decode_body::<Option<i32>>("  ").unwrap(), None);
        decode_body::<IgnoredAny>("").unwrap();
        decode_body::<IgnoredAny>(r#"{"cartId": 1}"#).unwrap();
        assert!(matches!(
            decode_body::<Vec<i32>>(""),
            Err(BookstoreError::Decode(..))
        ));
    }

    #[tokio::test]
    /// 1. GET list
    /// 2. GET by id
    /// 3. POST, PUT, PATCH with json body
    /// 4. DELETE with and without query string
    async fn test_verbs_and_paths() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Genre"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"genreId": 1}])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/Genre/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"genreId": 1})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/Genre"))
            .and(body_json(json!({"name": "Horror"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"genreId": 2})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/Genre/2"))
            .and(body_json(json!({"name": "Thriller"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/Genre/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"genreId": 2})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/Genre/2"))
            .and(query_param("userId", "9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/Genre/3"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ResourceClient::new(&server.uri()).unwrap();

        let list: Value = client.get_resource("Genre").await.unwrap();
        assert_eq!(list, json!([{"genreId": 1}]));
        let one: Value = client.get_resource_by_id("Genre", 1).await.unwrap();
        assert_eq!(one, json!({"genreId": 1}));
        let created: Value = client
            .create_resource("Genre", &json!({"name": "Horror"}))
            .await
            .unwrap();
        assert_eq!(created, json!({"genreId": 2}));
        client
            .update_resource::<_, ()>("Genre", 2, &json!({"name": "Thriller"}))
            .await
            .unwrap();
        client
            .patch_resource::<_, IgnoredAny>("Genre", 2, &json!({"name": "Crime"}))
            .await
            .unwrap();
        client
            .delete_resource_with_query::<()>("Genre", 2, &[("userId", "9".to_string())])
            .await
            .unwrap();
        client.delete_resource::<()>("Genre", 3).await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_status_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Book/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let client = ResourceClient::new(&server.uri()).unwrap();
        let result = client.get_resource_by_id::<Value>("Book", 404).await;

        assert!(matches!(
            &result,
            Err(BookstoreError::Network { status: 404, message, body })
                if message == NETWORK_ERROR_MESSAGE && body == "missing"
        ));
    }

    #[tokio::test]
    /// 1. Two failing answers, then success - three attempts, success returned
    /// 2. Always failing endpoint - 1 + max_retries attempts, last status returned
    async fn test_retrying_client() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/Cart/1"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/Cart/1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/Cart/2"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad quantity"))
            .expect(3)
            .mount(&server)
            .await;

        let client = ResourceClient::new(&server.uri())
            .unwrap()
            .with_retry(&RetryPolicy::immediate(2));

        client
            .update_resource::<_, ()>("Cart", 1, &json!({"quantity": 2}))
            .await
            .unwrap();
        let result = client
            .update_resource::<_, ()>("Cart", 2, &json!({"quantity": 2}))
            .await;
        assert!(matches!(
            &result,
            Err(BookstoreError::Network { status: 400, body, .. }) if body == "bad quantity"
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // nothing listens on port 9 of localhost
        let client = ResourceClient::new("http://127.0.0.1:9").unwrap();
        let result = client.get_resource::<Value>("Book").await;
        assert!(matches!(result, Err(BookstoreError::Transport(..))));
    }
}
