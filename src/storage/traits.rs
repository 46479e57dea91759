use crate::error::Result;

/// String-keyed record storage.
///
/// Failures are returned to the caller; implementations never retry.
pub trait KeyValueStorage: Send + Sync {
  /// Read the value stored under `key`
  fn get(&self, key: &str) -> Result<Option<String>>;

  /// Insert or overwrite the value under `key`
  fn put(&self, key: &str, value: &str) -> Result<()>;

  /// Remove `key`; removing a missing key is not an error
  fn delete(&self, key: &str) -> Result<()>;
}
