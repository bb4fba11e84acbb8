use crate::session_store::SessionStoreError;
use crate::validation::ValidationError;

pub const NETWORK_ERROR_MESSAGE: &str = "Network response was not ok";

#[derive(Debug, thiserror::Error)]
pub enum BookstoreError {
    #[error("{message} (status {status})")]
    Network {
        status: u16,
        message: String,
        body: String,
    },

    #[error("{0}")]
    Auth(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Request failed {0}")]
    Transport(#[from] reqwest_middleware::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session storage failure {0}")]
    Session(#[from] SessionStoreError),

    #[error("{0} not found")]
    NotFound(String),
}

impl From<reqwest::Error> for BookstoreError {
    fn from(error: reqwest::Error) -> Self {
        BookstoreError::Transport(reqwest_middleware::Error::Reqwest(error))
    }
}

impl BookstoreError {
    /// Replaces the generic message of a status failure with an endpoint specific one.
    /// Other errors are returned untouched.
    pub fn with_message(self, message: &str) -> Self {
        match self {
            BookstoreError::Network { status, body, .. } => BookstoreError::Network {
                status,
                message: message.to_string(),
                body,
            },
            other => other,
        }
    }

    /// True when the server answered, but with a non-success status
    pub fn is_status_failure(&self) -> bool {
        matches!(self, BookstoreError::Network { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BookstoreError::Network { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short message suitable for an alert dialog
    pub fn user_message(&self) -> String {
        match self {
            BookstoreError::Network { message, .. } => message.clone(),
            BookstoreError::Auth(message) => message.clone(),
            BookstoreError::Validation(error) => error.to_string(),
            BookstoreError::Transport(_) => "Could not reach the server".to_string(),
            BookstoreError::Decode(_) => "Unexpected response from the server".to_string(),
            BookstoreError::Session(_) => "Could not access the saved session".to_string(),
            BookstoreError::NotFound(what) => format!("{what} not found"),
        }
    }
}

/// Makes the choice of treating a failure status as "nothing there" explicit at the call site.
///
/// Only status failures are softened, transport and decoding errors still propagate.
pub trait SoftFail<T> {
    /// Status failure becomes `None`
    fn or_none(self, context: &str) -> Result<Option<T>, BookstoreError>;
}

pub trait SoftFailEmpty<T> {
    /// Status failure becomes an empty list
    fn or_empty(self, context: &str) -> Result<Vec<T>, BookstoreError>;
}

impl<T> SoftFail<T> for Result<T, BookstoreError> {
    fn or_none(self, context: &str) -> Result<Option<T>, BookstoreError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_status_failure() => {
                tracing::warn!("{} failed softly: {}", context, err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

impl<T> SoftFailEmpty<T> for Result<Vec<T>, BookstoreError> {
    fn or_empty(self, context: &str) -> Result<Vec<T>, BookstoreError> {
        Ok(self.or_none(context)?.unwrap_or_default())
    }
}
