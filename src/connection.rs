//! The store connection credential and its persistence.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::storage::KeyValueStorage;

/// Storage key of the persisted credential
pub const CONFIG_KEY: &str = "wooCommerceConfig";

/// Path of the connector's order endpoint below the store URL
const ORDERS_PATH: &str = "wp-json/order-dashboard/v1/orders";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
  pub url: String,
  pub token: String,
}

impl ConnectionConfig {
  /// Build a config, trimming surrounding whitespace from both fields
  pub fn new(url: impl AsRef<str>, token: impl AsRef<str>) -> Self {
    Self {
      url: url.as_ref().trim().to_string(),
      token: token.as_ref().trim().to_string(),
    }
  }

  pub fn validate(&self) -> Result<()> {
    if self.url.is_empty() {
      return Err(Error::Config("Store URL is missing.".to_string()));
    }

    let lower = self.url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
      return Err(Error::Config(format!(
        "Store URL '{}' must start with http:// or https://",
        self.url
      )));
    }

    url::Url::parse(&self.url)
      .map_err(|e| Error::Config(format!("Store URL '{}' is invalid: {}", self.url, e)))?;

    if self.token.is_empty() {
      return Err(Error::Config("Connection token is missing.".to_string()));
    }

    Ok(())
  }

  /// Collection endpoint for orders, without trailing slash
  pub fn orders_endpoint(&self) -> String {
    format!("{}/{}", self.url.trim_end_matches('/'), ORDERS_PATH)
  }

  /// Host (and port) of the store for display; the raw URL if it has no host
  pub fn domain(&self) -> String {
    let Ok(url) = url::Url::parse(&self.url) else {
      return self.url.clone();
    };
    match (url.host_str(), url.port()) {
      (Some(host), Some(port)) => format!("{}:{}", host, port),
      (Some(host), None) => host.to_string(),
      (None, _) => self.url.clone(),
    }
  }
}

/// Owner of the persisted credential.
pub struct ConnectionStore<S: KeyValueStorage> {
  storage: S,
}

impl<S: KeyValueStorage> ConnectionStore<S> {
  pub fn new(storage: S) -> Self {
    Self { storage }
  }

  pub fn load(&self) -> Result<Option<ConnectionConfig>> {
    let Some(raw) = self.storage.get(CONFIG_KEY)? else {
      return Ok(None);
    };

    let config = serde_json::from_str(&raw)
      .map_err(|e| Error::Storage(format!("Saved connection is unreadable: {}", e)))?;
    Ok(Some(config))
  }

  /// Validate and persist. Nothing is written when validation fails.
  pub fn save(&self, config: &ConnectionConfig) -> Result<ConnectionConfig> {
    let config = ConnectionConfig::new(&config.url, &config.token);
    config.validate()?;

    let raw = serde_json::to_string(&config)
      .map_err(|e| Error::Storage(format!("Failed to encode connection: {}", e)))?;
    self.storage.put(CONFIG_KEY, &raw)?;

    info!(store = %config.domain(), "saved connection");
    Ok(config)
  }

  pub fn clear(&self) -> Result<()> {
    self.storage.delete(CONFIG_KEY)?;
    info!("cleared connection");
    Ok(())
  }
}
