//! File-backed persistence under the configured data directory.
//!
//! Layout:
//! - `merchantConfig.json`: the merchant's currency and accepted chains/tokens;
//! - `order_<id>.json`: a session order blob, `<id>` being 10 random alphanumerics.
//!
//! Writes go to a `.tmp` sibling first and are renamed into place. There is no locking;
//! the last writer wins.

use blockless_types::codec::SerializedOrder;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const MERCHANT_CONFIG_FILE: &str = "merchantConfig.json";
const SESSION_ORDER_PREFIX: &str = "order_";
const SESSION_ID_LEN: usize = 10;

/// Currency used when the merchant has not chosen one.
pub const DEFAULT_FIAT_CURRENCY: &str = "USD";

/// The merchant's saved payment preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantConfig {
    pub fiat_currency: String,
    #[serde(default)]
    pub chains: Vec<MerchantChain>,
}

impl Default for MerchantConfig {
    fn default() -> Self {
        MerchantConfig {
            fiat_currency: DEFAULT_FIAT_CURRENCY.to_string(),
            chains: Vec::new(),
        }
    }
}

/// A chain the merchant accepts, with the recipient and token symbols to list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantChain {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl MerchantConfig {
    pub fn chain(&self, name: &str) -> Option<&MerchantChain> {
        self.chains.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Failed to parse {0}: {1}")]
    Json(PathBuf, serde_json::Error),
    #[error("Invalid session order id {0:?}")]
    InvalidSessionId(String),
    #[error("Session order {0} not found")]
    SessionNotFound(String),
}

/// Store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        FileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The saved merchant config, or the default one if nothing was saved yet.
    pub fn load_merchant_config(&self) -> Result<MerchantConfig, StoreError> {
        let config: MerchantConfig = self
            .read_json(&self.root.join(MERCHANT_CONFIG_FILE))?
            .unwrap_or_default();
        tracing::debug!(chains = config.chains.len(), "Merchant config loaded");
        Ok(config)
    }

    pub fn save_merchant_config(&self, config: &MerchantConfig) -> Result<(), StoreError> {
        self.write_json(&self.root.join(MERCHANT_CONFIG_FILE), config)?;
        tracing::info!(chains = config.chains.len(), "Merchant config saved");
        Ok(())
    }

    /// Saves an order blob under a fresh session id and returns the id.
    pub fn save_session_order(&self, order: &SerializedOrder) -> Result<String, StoreError> {
        let id: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_LEN)
            .map(char::from)
            .collect();
        self.write_json(&self.session_path(&id)?, order)?;
        tracing::info!(session = %id, "Session order saved");
        Ok(id)
    }

    /// Loads a session order by id. The `order_` prefix is optional.
    pub fn load_session_order(&self, id: &str) -> Result<SerializedOrder, StoreError> {
        let id = id.trim();
        let id = id.strip_prefix(SESSION_ORDER_PREFIX).unwrap_or(id);
        let order: SerializedOrder = self
            .read_json(&self.session_path(id)?)?
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))?;
        tracing::debug!(session = %id, "Session order loaded");
        Ok(order)
    }

    fn session_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = id.len() == SESSION_ID_LEN && id.bytes().all(|b| b.is_ascii_alphanumeric());
        if !valid {
            return Err(StoreError::InvalidSessionId(id.to_string()));
        }
        Ok(self.root.join(format!("{SESSION_ORDER_PREFIX}{id}.json")))
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, StoreError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(path.to_path_buf(), e)),
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| StoreError::Json(path.to_path_buf(), e))
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::Io(self.root.clone(), e))?;
        let data = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::Json(path.to_path_buf(), e))?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, data).map_err(|e| StoreError::Io(temp_path.clone(), e))?;
        fs::rename(&temp_path, path).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockless_types::codec::ORDER_BLOB_VERSION;
    use blockless_types::util::FiatAmount;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("data"));
        (store, temp_dir)
    }

    fn sample_order() -> SerializedOrder {
        SerializedOrder {
            version: ORDER_BLOB_VERSION,
            fiat_amount: FiatAmount::parse("9.99").unwrap(),
            fiat_currency: "EUR".into(),
            chains: vec![],
        }
    }

    #[test]
    fn test_missing_merchant_config_is_default() {
        let (store, _temp_dir) = create_test_store();
        let config = store.load_merchant_config().unwrap();
        assert_eq!(config, MerchantConfig::default());
        assert_eq!(config.fiat_currency, "USD");
    }

    #[test]
    fn test_merchant_config_roundtrip_and_layout() {
        let (store, _temp_dir) = create_test_store();
        let config = MerchantConfig {
            fiat_currency: "EUR".into(),
            chains: vec![MerchantChain {
                name: "base".into(),
                address: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into(),
                tokens: vec!["USDC".into(), "ETH".into()],
            }],
        };
        store.save_merchant_config(&config).unwrap();
        assert_eq!(store.load_merchant_config().unwrap(), config);

        let raw = fs::read_to_string(store.root().join("merchantConfig.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["fiatCurrency"], "EUR");
        assert_eq!(json["chains"][0]["tokens"][1], "ETH");
        assert!(!store.root().join("merchantConfig.tmp").exists());
    }

    #[test]
    fn test_session_order_roundtrip() {
        let (store, _temp_dir) = create_test_store();
        let order = sample_order();
        let id = store.save_session_order(&order).unwrap();
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(store.root().join(format!("order_{id}.json")).exists());
        assert_eq!(store.load_session_order(&id).unwrap(), order);
        assert_eq!(
            store.load_session_order(&format!("order_{id}")).unwrap(),
            order
        );
    }

    #[test]
    fn test_session_errors() {
        let (store, _temp_dir) = create_test_store();
        assert!(matches!(
            store.load_session_order("../../etc/passwd"),
            Err(StoreError::InvalidSessionId(_))
        ));
        assert!(matches!(
            store.load_session_order("abcdefghij"),
            Err(StoreError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_file() {
        let (store, _temp_dir) = create_test_store();
        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.root().join("merchantConfig.json"), "{oops").unwrap();
        assert!(matches!(
            store.load_merchant_config(),
            Err(StoreError::Json(_, _))
        ));
    }
}
