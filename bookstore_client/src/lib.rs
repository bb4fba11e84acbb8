pub mod account;
pub mod api;
pub mod app_config;
pub mod client;
pub mod error;
pub mod filter;
pub mod optimistic;
pub mod resource_client;
pub mod retry;
pub mod session_store;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod validation;
pub mod views;

pub use client::BookstoreClient;
pub use error::{BookstoreError, SoftFail, SoftFailEmpty};
