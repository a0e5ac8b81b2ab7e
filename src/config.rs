//! Configuration for the `blockless` command line tool.
//!
//! Values come from a JSON file named by `--config` (or `$CONFIG`). Missing fields fall back
//! to environment variables, then to hardcoded defaults:
//!
//! ```json
//! {
//!   "baseUrl": "https://pay.example.com/",
//!   "dataDir": ".blockless",
//!   "orderQueryKey": "id"
//! }
//! ```

use blockless_types::codec::OrderQueryKey;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use url::Url;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "blockless.json";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "config_defaults::default_base_url")]
    base_url: Url,
    #[serde(default = "config_defaults::default_data_dir")]
    data_dir: PathBuf,
    #[serde(default)]
    order_query_key: OrderQueryKey,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: config_defaults::default_base_url(),
            data_dir: config_defaults::default_data_dir(),
            order_query_key: OrderQueryKey::default(),
        }
    }
}

pub mod config_defaults {
    use std::env;
    use std::path::PathBuf;
    use url::Url;

    pub const DEFAULT_BASE_URL: &str = "http://localhost:5173/";
    pub const DEFAULT_DATA_DIR: &str = ".blockless";

    /// Returns the default base URL with fallback: $BASE_URL env var -> "http://localhost:5173/"
    pub fn default_base_url() -> Url {
        env::var("BASE_URL")
            .ok()
            .and_then(|s| Url::parse(&s).ok())
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"))
    }

    /// Returns the default data directory with fallback: $DATA_DIR env var -> ".blockless"
    pub fn default_data_dir() -> PathBuf {
        env::var("DATA_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("Failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("Base URL {0} cannot carry relative links")]
    BaseUrl(Url),
}

impl Config {
    /// Public origin that relative `/swap` and `/order` links are joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn order_query_key(&self) -> OrderQueryKey {
        self.order_query_key
    }

    /// Loads the configuration.
    ///
    /// With an explicit path the file must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
    /// read if present, otherwise defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => match Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH)) {
                Err(ConfigError::FileRead(_, e)) if e.kind() == ErrorKind::NotFound => {
                    Config::default()
                }
                other => other?,
            },
        };
        config.normalized()
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(path.to_path_buf(), e))?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Ensures the base URL ends with `/` so relative links keep its path.
    fn normalized(mut self) -> Result<Self, ConfigError> {
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::BaseUrl(self.base_url));
        }
        if !self.base_url.path().ends_with('/') {
            let path = format!("{}/", self.base_url.path());
            self.base_url.set_path(&path);
        }
        Ok(self)
    }

    /// Absolute URL for a relative link such as `/swap?dst=...`.
    pub fn absolute(&self, relative: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(relative.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config: Config = serde_json::from_str(
            r#"{"baseUrl":"https://pay.example.com/shop","dataDir":"/tmp/bl","orderQueryKey":"order"}"#,
        )
        .unwrap();
        let config = config.normalized().unwrap();
        assert_eq!(config.base_url().as_str(), "https://pay.example.com/shop/");
        assert_eq!(config.data_dir(), Path::new("/tmp/bl"));
        assert_eq!(config.order_query_key(), OrderQueryKey::Order);
        assert_eq!(
            config.absolute("/swap?dst=base:1:USDC:0x").unwrap().as_str(),
            "https://pay.example.com/shop/swap?dst=base:1:USDC:0x"
        );
    }

    #[test]
    fn test_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"baseUrl":"https://pay.example.com/"}}"#).unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url().as_str(), "https://pay.example.com/");
        assert_eq!(config.order_query_key(), OrderQueryKey::Id);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::FileRead(_, _))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::JsonParse(_))
        ));
    }

    #[test]
    fn test_non_base_url_rejected() {
        let config: Config =
            serde_json::from_str(r#"{"baseUrl":"mailto:pay@example.com"}"#).unwrap();
        assert!(matches!(config.normalized(), Err(ConfigError::BaseUrl(_))));
    }
}
