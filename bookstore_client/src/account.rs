use crate::api::{LoginData, RegisterData, SessionUser, UserPatchData};
use crate::client::BookstoreClient;
use crate::error::BookstoreError;
use crate::validation;

/// Logs in with the trimmed credentials and keeps the returned user as the session user
pub async fn sign_in(
    client: &BookstoreClient,
    identifier: &str,
    password: &str,
) -> Result<SessionUser, BookstoreError> {
    let (identifier, password) = (identifier.trim(), password.trim());
    validation::require_filled(&[identifier, password])?;

    let user: SessionUser = client
        .login(&LoginData {
            identifier: identifier.to_string(),
            password: password.to_string(),
        })
        .await?
        .into();
    client.session().save_user(&user).await?;
    tracing::info!("User {} signed in", user.user_id);
    Ok(user)
}

/// Registers a new account with the trimmed values and signs it in right away
pub async fn sign_up(
    client: &BookstoreClient,
    email: &str,
    username: &str,
    password: &str,
) -> Result<SessionUser, BookstoreError> {
    let (email, username, password) = (email.trim(), username.trim(), password.trim());
    validation::require_filled(&[email, username, password])?;

    let user: SessionUser = client
        .register(&RegisterData {
            email: email.to_string(),
            password: password.to_string(),
            username: username.to_string(),
        })
        .await?
        .into();
    client.session().save_user(&user).await?;
    tracing::info!("User {} registered", user.user_id);
    Ok(user)
}

pub async fn sign_out(client: &BookstoreClient) -> Result<(), BookstoreError> {
    client.session().clear().await?;
    Ok(())
}

/// Editable copy of the session user, as shown on the credentials screen.
/// An empty password keeps the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl CredentialsForm {
    pub fn from_user(user: &SessionUser) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
            street: user.street.clone().unwrap_or_default(),
            city: user.city.clone().unwrap_or_default(),
            postal_code: user.postal_code.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<(), BookstoreError> {
        validation::validate_credentials(&self.username, &self.email, &self.password)?;
        Ok(())
    }

    /// Trimmed fields, the password only when one was typed in
    pub fn to_patch(&self) -> UserPatchData {
        let password = self.password.trim();
        UserPatchData {
            username: Some(self.username.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            password: (!password.is_empty()).then(|| password.to_string()),
            street: Some(self.street.trim().to_string()),
            city: Some(self.city.trim().to_string()),
            postal_code: Some(self.postal_code.trim().to_string()),
        }
    }
}

/// Form prefilled from the session user, None when nobody is logged in
pub async fn load_credentials(
    client: &BookstoreClient,
) -> Result<Option<CredentialsForm>, BookstoreError> {
    Ok(client
        .session()
        .current_user()
        .await?
        .as_ref()
        .map(CredentialsForm::from_user))
}

/// Validates the form, patches the account (with retries) and merges the
/// new values into the session user.
pub async fn update_credentials(
    client: &BookstoreClient,
    form: &CredentialsForm,
) -> Result<SessionUser, BookstoreError> {
    let Some(user_id) = client.session().current_user_id().await? else {
        return Err(BookstoreError::Auth("User not loaded".to_string()));
    };
    form.validate()?;

    let patch = form.to_patch();
    client.patch_user_credentials(user_id, &patch).await?;

    client
        .session()
        .merge_user(&patch)
        .await?
        .ok_or_else(|| BookstoreError::Auth("User not loaded".to_string()))
}

/// Deletes the account of the session user and signs out
pub async fn delete_account(client: &BookstoreClient) -> Result<(), BookstoreError> {
    let Some(user_id) = client.session().current_user_id().await? else {
        return Err(BookstoreError::Auth("User not logged in".to_string()));
    };
    client.delete_user(user_id).await?;
    client.session().clear().await?;
    tracing::info!("User {} deleted the account", user_id);
    Ok(())
}

#[cfg(test)]
mod tests_account {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::retry::RetryPolicy;
    use crate::session_store::InMemorySessionStore;
    use crate::validation::ValidationError;

    use super::*;

    fn client(server: &MockServer) -> BookstoreClient {
        BookstoreClient::new(&server.uri(), Arc::new(InMemorySessionStore::default()))
            .unwrap()
            .with_credential_retry(RetryPolicy::immediate(3))
    }

    async fn mock_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/User/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"userId": 1, "email": "a@b.com", "username": "alice"}),
            ))
            .mount(server)
            .await;
    }

    #[tokio::test]
    /// 1. Empty fields are rejected locally
    /// 2. Successful login is persisted
    /// 3. Sign out clears the session
    async fn test_sign_in_and_out() {
        let server = MockServer::start().await;
        mock_login(&server).await;
        let client = client(&server);

        assert!(matches!(
            sign_in(&client, "alice", "").await,
            Err(BookstoreError::Validation(ValidationError::MissingFields))
        ));

        let user = sign_in(&client, "alice", "secret").await.unwrap();
        assert_eq!(client.session().current_user().await.unwrap(), Some(user));

        sign_out(&client).await.unwrap();
        assert_eq!(client.session().current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_up_persists_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/User"))
            .and(body_json(
                json!({"Email": "b@c.com", "Password": "secret", "Username": "bob"}),
            ))
            .respond_with(ResponseTemplate::new(201).set_body_json(
                json!({"userId": 2, "email": "b@c.com", "username": "bob"}),
            ))
            .mount(&server)
            .await;
        let client = client(&server);

        let user = sign_up(&client, " b@c.com", "bob ", " secret ").await.unwrap();
        assert_eq!(user.user_id, 2);
        assert_eq!(client.session().current_user_id().await.unwrap(), Some(2));
    }

    #[tokio::test]
    /// Surrounding whitespace of the typed in credentials is not sent
    async fn test_sign_in_sends_trimmed_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/User/login"))
            .and(body_json(json!({"Identifier": "alice", "Password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"userId": 1, "email": "a@b.com", "username": "alice"}),
            ))
            .expect(1)
            .mount(&server)
            .await;
        let client = client(&server);

        let user = sign_in(&client, " alice ", "secret ").await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(matches!(
            sign_in(&client, "   ", "secret").await,
            Err(BookstoreError::Validation(ValidationError::MissingFields))
        ));
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_session_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/User/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let client = client(&server);

        let result = sign_in(&client, "alice", "wrong").await;
        assert_eq!(result.unwrap_err().user_message(), "Login failed");
        assert_eq!(client.session().current_user().await.unwrap(), None);
    }

    #[test]
    fn credentials_form_patch_is_trimmed() {
        let form = CredentialsForm {
            username: " alice2 ".to_string(),
            email: "a@b.com ".to_string(),
            password: "  ".to_string(),
            street: "Long 1".to_string(),
            city: " Gdansk".to_string(),
            postal_code: "80-001".to_string(),
        };
        assert_eq!(
            form.to_patch(),
            UserPatchData {
                username: Some("alice2".to_string()),
                email: Some("a@b.com".to_string()),
                password: None,
                street: Some("Long 1".to_string()),
                city: Some("Gdansk".to_string()),
                postal_code: Some("80-001".to_string()),
            }
        );
    }

    #[tokio::test]
    /// 1. Signs in
    /// 2. Loads the form from the session
    /// 3. Rejects a too short password without calling the backend
    /// 4. Updates, the session record gets the new address
    async fn test_update_credentials_merges_into_session() {
        let server = MockServer::start().await;
        mock_login(&server).await;
        Mock::given(method("PATCH"))
            .and(path("/api/User/1"))
            .and(body_json(json!({
                "username": "alice",
                "email": "a@b.com",
                "street": "Long 1",
                "city": "Gdansk",
                "postalCode": "80-001"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let client = client(&server);

        assert_eq!(load_credentials(&client).await.unwrap(), None);
        sign_in(&client, "alice", "secret").await.unwrap();

        let mut form = load_credentials(&client).await.unwrap().unwrap();
        assert_eq!(form.username, "alice");
        assert_eq!(form.street, "");

        form.password = "abc".to_string();
        assert!(matches!(
            update_credentials(&client, &form).await,
            Err(BookstoreError::Validation(ValidationError::PasswordTooShort))
        ));

        form.password.clear();
        form.street = "Long 1".to_string();
        form.city = "Gdansk".to_string();
        form.postal_code = "80-001".to_string();
        let updated = update_credentials(&client, &form).await.unwrap();

        assert_eq!(updated.street.as_deref(), Some("Long 1"));
        assert_eq!(client.session().current_user().await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_credentials_without_session() {
        let server = MockServer::start().await;
        let client = client(&server);
        let result = update_credentials(&client, &CredentialsForm::default()).await;
        assert!(matches!(result, Err(BookstoreError::Auth(..))));
    }

    #[tokio::test]
    async fn test_delete_account_clears_session() {
        let server = MockServer::start().await;
        mock_login(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/api/User/1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let client = client(&server);

        sign_in(&client, "alice", "secret").await.unwrap();
        delete_account(&client).await.unwrap();
        assert_eq!(client.session().current_user().await.unwrap(), None);
    }
}
