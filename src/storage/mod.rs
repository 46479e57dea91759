//! Durable local key-value storage.
//!
//! Only the connection credential lives here; orders are never persisted.

mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::KeyValueStorage;
