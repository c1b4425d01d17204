//! Temple Puja Admin Console
//!
//! Authenticated REST client, per-resource state slices, and dashboard analytics
//! for administering the puja booking and e-commerce platform.

pub mod client;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod session;
pub mod store;

use std::sync::Arc;

use client::ApiClient;
use config::Config;
use errors::ClientError;
use session::{FileTokenStore, Session};
use store::AdminStore;

/// Build the full console from configuration: file-backed session, client, and store.
pub fn connect(config: &Config) -> Result<AdminStore, ClientError> {
    let session = Session::new(Arc::new(FileTokenStore::new(&config.token_path)));
    let client = ApiClient::new(config, session)?;
    tracing::debug!("Console bound to {}", client.base_url());
    Ok(AdminStore::new(client, config.page_size))
}

#[cfg(test)]
mod tests;
