//! Configuration for talking to the archive.
//!
//! The defaults point at the public archive; a JSON file can override any subset of
//! the settings:
//!
//! ```json
//! { "base_url": "https://eprint.iacr.org", "timeout_secs": 60 }
//! ```

use std::time::Duration;

use super::*;

/// Where the public archive lives.
pub const DEFAULT_BASE_URL: &str = "https://eprint.iacr.org";

/// Settings shared by the transport and the full-text resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
  /// Root URL of the archive; its host is the only host full-text resolution accepts
  pub base_url:     Url,
  /// User agent sent with every request
  pub user_agent:   String,
  /// Request timeout in seconds, redirects included
  pub timeout_secs: u64,
}

impl Default for FetcherConfig {
  fn default() -> Self {
    Self {
      base_url:     Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
      user_agent:   concat!("eprint/", env!("CARGO_PKG_VERSION")).to_string(),
      timeout_secs: 30,
    }
  }
}

impl FetcherConfig {
  /// Reads a configuration file, filling missing settings with their defaults.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, EprintError> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let text = std::fs::read_to_string(path)
      .map_err(|source| EprintError::ConfigRead { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_str(&text)?)
  }

  /// Reads the configuration at [`FetcherConfig::default_path`] if it exists, and
  /// falls back to the defaults otherwise.
  pub fn load_or_default() -> Result<Self, EprintError> {
    let path = Self::default_path();
    if path.exists() {
      Self::load(path)
    } else {
      Ok(Self::default())
    }
  }

  /// Get default configuration path in user's config directory
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("eprint").join("config.json")
  }

  /// Returns a copy pointing at another archive root.
  pub fn with_base_url(mut self, base_url: &str) -> Result<Self, EprintError> {
    self.base_url = Url::parse(base_url).map_err(EprintError::InvalidBaseUrl)?;
    Ok(self)
  }

  /// The archive host, e.g. `eprint.iacr.org`.
  pub fn host(&self) -> &str { self.base_url.host_str().unwrap_or_default() }

  /// The request timeout.
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }

  /// Joins `path` onto the archive root, e.g. `2017/1118` → `https://eprint.iacr.org/2017/1118`.
  pub fn url_for(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path.trim_start_matches('/'))
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_defaults() {
    let config = FetcherConfig::default();
    assert_eq!(config.host(), "eprint.iacr.org");
    assert_eq!(config.url_for("2017/1118"), "https://eprint.iacr.org/2017/1118");
    assert_eq!(config.timeout(), Duration::from_secs(30));
  }

  #[test]
  fn test_load_partial_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "base_url": "http://127.0.0.1:8080/", "timeout_secs": 5 }"#)?;

    let config = FetcherConfig::load(&path)?;
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.user_agent, FetcherConfig::default().user_agent);
    assert_eq!(config.url_for("/1997/006"), "http://127.0.0.1:8080/1997/006");
    Ok(())
  }

  #[test]
  fn test_load_rejects_bad_files() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json")?;

    assert!(matches!(FetcherConfig::load(&path), Err(EprintError::Config(_))));

    let missing = FetcherConfig::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, EprintError::ConfigRead { .. }));
    assert_eq!(missing.kind(), ErrorKind::Configuration);
    assert!(missing.to_string().contains("missing.json"));
    Ok(())
  }

  #[test]
  fn test_bad_base_url_is_a_configuration_error() {
    let error = FetcherConfig::default().with_base_url("not a url").unwrap_err();
    assert!(matches!(error, EprintError::InvalidBaseUrl(_)));
    assert_eq!(error.kind(), ErrorKind::Configuration);
  }
}
