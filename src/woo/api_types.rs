//! Wire types for the connector endpoint that are not domain types.

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::types::OrderStatus;
use crate::error::Error;

/// Error body returned by the store on non-success responses
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
  #[serde(default)]
  pub message: Option<String>,
}

/// Body of the status-replace request
#[derive(Debug, Serialize)]
pub struct ApiStatusUpdate {
  pub status: OrderStatus,
}

/// Build the error for a non-success response.
///
/// Prefers the body's `message`; falls back to the status text when the body
/// is missing, not JSON, or carries an empty message.
pub fn error_from_response(status: StatusCode, body: &str) -> Error {
  let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();

  let message = parsed
    .message
    .filter(|m| !m.trim().is_empty())
    .unwrap_or_else(|| {
      let text = status.canonical_reason().unwrap_or(status.as_str());
      format!("Network response was not ok: {}", text)
    });

  Error::remote(Some(status.as_u16()), message)
}

/// Decode a success body, reporting an unreadable payload as a remote error
pub fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, Error> {
  serde_json::from_str(body).map_err(|e| {
    Error::remote(
      Some(status.as_u16()),
      format!("Unexpected response from store: {}", e),
    )
  })
}
