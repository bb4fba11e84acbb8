use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::client::BookstoreClient;
use crate::retry::RetryPolicy;
use crate::session_store::{FileSessionStore, InMemorySessionStore, SessionStore};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const ENV_PREFIX: &str = "BOOKSTORE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Session is kept in memory only when not set
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    #[serde(default)]
    pub credential_retry: RetryPolicy,
}

impl ClientConfig {
    /// Defaults, then the optional file, then `BOOKSTORE_*` environment variables.
    /// Nested keys are separated with `__`, e.g. `BOOKSTORE_CREDENTIAL_RETRY__MAX_RETRIES`.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let retry = RetryPolicy::default();
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("credential_retry.max_retries", i64::from(retry.max_retries))?
            .set_default("credential_retry.min_delay_ms", retry.min_delay_ms)?
            .set_default("credential_retry.max_delay_ms", retry.max_delay_ms)?;
        if let Some(file) = file {
            builder = builder.add_source(File::from(file));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read client configuration")?
            .try_deserialize()
            .context("Invalid client configuration")
    }

    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        match &self.session_file {
            Some(path) => Arc::new(FileSessionStore::new(path)),
            None => Arc::new(InMemorySessionStore::default()),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: None,
            credential_retry: RetryPolicy::default(),
        }
    }
}

impl BookstoreClient {
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        tracing::info!("Creating bookstore client for {}", config.base_url);
        Ok(Self::new(&config.base_url, config.session_store())?
            .with_credential_retry(config.credential_retry))
    }
}

#[cfg(test)]
mod tests_app_config {
    use serial_test::serial;

    use super::*;

    const ENV_VARS: [&str; 3] = [
        "BOOKSTORE_BASE_URL",
        "BOOKSTORE_SESSION_FILE",
        "BOOKSTORE_CREDENTIAL_RETRY__MAX_RETRIES",
    ];

    fn clear_env() {
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_sources() {
        clear_env();
        let config = ClientConfig::load(None).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    #[serial]
    fn environment_overrides_file() {
        clear_env();
        let path = std::env::temp_dir().join(format!(
            "bookstore_client_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "base_url = \"http://file:5000\"\n\n[credential_retry]\nmax_retries = 1\nmin_delay_ms = 0\nmax_delay_ms = 0\n",
        )
        .unwrap();

        let from_file = ClientConfig::load(Some(&path)).unwrap();
        assert_eq!(from_file.base_url, "http://file:5000");
        assert_eq!(from_file.credential_retry, RetryPolicy::immediate(1));

        std::env::set_var("BOOKSTORE_BASE_URL", "http://env:5000");
        std::env::set_var("BOOKSTORE_CREDENTIAL_RETRY__MAX_RETRIES", "5");
        std::env::set_var("BOOKSTORE_SESSION_FILE", "/tmp/bookstore/session.json");
        let config = ClientConfig::load(Some(&path)).unwrap();
        clear_env();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.base_url, "http://env:5000");
        assert_eq!(config.credential_retry.max_retries, 5);
        assert_eq!(config.credential_retry.min_delay_ms, 0);
        assert_eq!(
            config.session_file,
            Some(PathBuf::from("/tmp/bookstore/session.json"))
        );
    }

    #[test]
    #[serial]
    fn missing_file_is_an_error() {
        clear_env();
        let result = ClientConfig::load(Some(Path::new("/nonexistent/bookstore.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn client_from_config() {
        let config = ClientConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..ClientConfig::default()
        };
        let client = BookstoreClient::from_config(&config).unwrap();
        assert_eq!(client.resources().base_url(), "http://localhost:5000");
    }
}
