use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

use super::api_types::{decode_body, error_from_response, ApiStatusUpdate};
use super::gateway::OrderApi;
use super::types::{Order, OrderId, OrderStatus};
use crate::connection::ConnectionConfig;
use crate::error::{Error, Result};

/// Header the connector plugin checks the token against
pub const TOKEN_HEADER: &str = "X-Order-Dashboard-Token";

/// HTTP client for the store's order-dashboard connector
#[derive(Clone)]
pub struct StoreClient {
  client: reqwest::Client,
}

impl StoreClient {
  pub fn new(timeout: Duration) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .user_agent(concat!("ordash/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self { client })
  }

  fn headers(cfg: &ConnectionConfig) -> Result<HeaderMap> {
    if cfg.token.is_empty() {
      return Err(Error::Config("Connection token is missing.".to_string()));
    }

    let token = HeaderValue::from_str(&cfg.token)
      .map_err(|_| Error::Config("Connection token contains invalid characters.".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(TOKEN_HEADER, token);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
  }

  async fn read(response: reqwest::Response) -> Result<(reqwest::StatusCode, String)> {
    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
  }
}

#[async_trait]
impl OrderApi for StoreClient {
  async fn fetch_page(
    &self,
    cfg: &ConnectionConfig,
    page: u32,
    per_page: u32,
  ) -> Result<Vec<Order>> {
    let response = self
      .client
      .get(cfg.orders_endpoint())
      .headers(Self::headers(cfg)?)
      .query(&[("per_page", per_page), ("page", page)])
      .send()
      .await?;

    let (status, body) = Self::read(response).await?;
    if !status.is_success() {
      return Err(error_from_response(status, &body));
    }
    decode_body(status, &body)
  }

  async fn put_status(
    &self,
    cfg: &ConnectionConfig,
    order_id: OrderId,
    status: OrderStatus,
  ) -> Result<Order> {
    let url = format!("{}/{}", cfg.orders_endpoint(), order_id);

    let response = self
      .client
      .put(url)
      .headers(Self::headers(cfg)?)
      .json(&ApiStatusUpdate { status })
      .send()
      .await?;

    let (code, body) = Self::read(response).await?;
    if !code.is_success() {
      return Err(error_from_response(code, &body));
    }
    decode_body(code, &body)
  }
}
