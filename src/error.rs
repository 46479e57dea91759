//! Error taxonomy shared by the connection store, gateway and order cache.

use crate::woo::types::OrderId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  /// Missing or invalid connection credential, raised before any network call
  #[error("{0}")]
  Config(String),

  /// The store answered with a non-success status or an unreadable body
  #[error("{message}")]
  Remote {
    status: Option<u16>,
    message: String,
  },

  /// The request never got a response (DNS, connect, timeout, ...)
  #[error("{0}")]
  Transport(String),

  /// Durable local storage failed
  #[error("{0}")]
  Storage(String),

  #[error("Order {0} is not loaded")]
  UnknownOrder(OrderId),

  #[error("Order #{number} already has a status update in progress")]
  UpdateInProgress { number: String },

  #[error("Failed to update status for order #{number}. {source}")]
  StatusChangeFailed {
    number: String,
    #[source]
    source: Box<Error>,
  },
}

impl Error {
  pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
    Error::Remote {
      status,
      message: message.into(),
    }
  }
}

impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self {
    match e.status() {
      Some(status) => Error::remote(Some(status.as_u16()), e.to_string()),
      None => Error::Transport(e.to_string()),
    }
  }
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self {
    Error::Storage(e.to_string())
  }
}
