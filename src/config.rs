use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::orders::SortOrder;
use crate::woo::gateway::{Pagination, DEFAULT_MAX_PAGES, PAGE_SIZE};

/// Application settings.
///
/// The store URL and token are not part of this file; they are managed by
/// the connection store (`ordash connect`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Header title, "ordash" if not set
  pub title: Option<String>,
  pub default_sort: SortOrder,
  /// Upper bound on pages fetched in one refresh
  pub max_pages: u32,
  pub request_timeout_secs: u64,
  /// Log filter used when ORDASH_LOG is not set
  pub log_level: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title: None,
      default_sort: SortOrder::Newest,
      max_pages: DEFAULT_MAX_PAGES,
      request_timeout_secs: 30,
      log_level: "info".to_string(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./ordash.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/ordash/config.yaml
  ///
  /// Without any file the defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("ordash.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("ordash").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    // An empty file deserializes to null, which is "all defaults".
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  pub fn pagination(&self) -> Pagination {
    Pagination {
      per_page: PAGE_SIZE,
      max_pages: self.max_pages.max(1),
    }
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs.max(1))
  }
}

/// Directory for the database and log files
pub fn data_dir() -> crate::error::Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| crate::error::Error::Storage("Could not determine data directory".to_string()))?;

  Ok(data_dir.join("ordash"))
}
