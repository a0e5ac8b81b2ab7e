//! Registry of blockchain networks a merchant can accept payments on.
//!
//! [`validate_blockchain_name`](crate::validation::validate_blockchain_name) only checks
//! the syntax of a chain name. Whether a name refers to a chain this application knows
//! how to pay on is answered here.
//!
//! Each [`NetworkInfo`] carries:
//! - the lowercase `name` used in `dst=` legs and order blobs (e.g. `"base"`),
//! - the numeric `chain_id` (EIP-155 id for EVM chains, aggregator id `501` for Solana),
//! - the [`NetworkKind`] that decides which address grammar and wallets apply,
//! - the SLIP-44 coin type some wallets use to address an asset,
//! - the native token symbol.
//!
//! # Examples
//!
//! ```
//! use blockless_types::networks::{network_by_chain_id, network_by_name};
//!
//! let base = network_by_name("Base").unwrap();
//! assert_eq!(base.chain_id, 8453);
//! assert!(base.is_evm());
//!
//! let solana = network_by_chain_id(501).unwrap();
//! assert!(!solana.is_evm());
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Address family and transfer model of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// EVM-compatible chain addressed by an EIP-155 chain id.
    Evm,
    /// Solana mainnet.
    Solana,
}

/// A known network definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// Lowercase network name (e.g., "ethereum", "base")
    pub name: &'static str,
    /// Human-readable name (e.g., "BNB Chain")
    pub display_name: &'static str,
    /// Numeric chain id (e.g., 1 for Ethereum, 8453 for Base)
    pub chain_id: u64,
    pub kind: NetworkKind,
    /// SLIP-44 coin type as used by Trust Wallet asset ids
    pub slip44: Option<u32>,
    /// Symbol of the gas token (e.g., "ETH", "POL")
    pub native_symbol: &'static str,
}

impl NetworkInfo {
    pub fn is_evm(&self) -> bool {
        self.kind == NetworkKind::Evm
    }
}

/// Chain id used for Solana by swap aggregators.
pub const SOLANA_CHAIN_ID: u64 = 501;

pub static KNOWN_NETWORKS: &[NetworkInfo] = &[
    NetworkInfo {
        name: "ethereum",
        display_name: "Ethereum",
        chain_id: 1,
        kind: NetworkKind::Evm,
        slip44: Some(60),
        native_symbol: "ETH",
    },
    NetworkInfo {
        name: "bsc",
        display_name: "BNB Chain",
        chain_id: 56,
        kind: NetworkKind::Evm,
        slip44: Some(20000714),
        native_symbol: "BNB",
    },
    NetworkInfo {
        name: "polygon",
        display_name: "Polygon",
        chain_id: 137,
        kind: NetworkKind::Evm,
        slip44: Some(966),
        native_symbol: "POL",
    },
    NetworkInfo {
        name: "arbitrum",
        display_name: "Arbitrum One",
        chain_id: 42161,
        kind: NetworkKind::Evm,
        slip44: Some(10042221),
        native_symbol: "ETH",
    },
    NetworkInfo {
        name: "optimism",
        display_name: "OP Mainnet",
        chain_id: 10,
        kind: NetworkKind::Evm,
        slip44: Some(10000070),
        native_symbol: "ETH",
    },
    NetworkInfo {
        name: "base",
        display_name: "Base",
        chain_id: 8453,
        kind: NetworkKind::Evm,
        slip44: Some(8453),
        native_symbol: "ETH",
    },
    NetworkInfo {
        name: "avalanche",
        display_name: "Avalanche C-Chain",
        chain_id: 43114,
        kind: NetworkKind::Evm,
        slip44: Some(10009000),
        native_symbol: "AVAX",
    },
    NetworkInfo {
        name: "gnosis",
        display_name: "Gnosis",
        chain_id: 100,
        kind: NetworkKind::Evm,
        slip44: Some(10000100),
        native_symbol: "XDAI",
    },
    NetworkInfo {
        name: "zksync",
        display_name: "zkSync Era",
        chain_id: 324,
        kind: NetworkKind::Evm,
        slip44: Some(10000324),
        native_symbol: "ETH",
    },
    NetworkInfo {
        name: "linea",
        display_name: "Linea",
        chain_id: 59144,
        kind: NetworkKind::Evm,
        slip44: None,
        native_symbol: "ETH",
    },
    NetworkInfo {
        name: "solana",
        display_name: "Solana",
        chain_id: SOLANA_CHAIN_ID,
        kind: NetworkKind::Solana,
        slip44: Some(501),
        native_symbol: "SOL",
    },
];

static NAME_TO_NETWORK: LazyLock<HashMap<&'static str, &'static NetworkInfo>> =
    LazyLock::new(|| KNOWN_NETWORKS.iter().map(|n| (n.name, n)).collect());

static CHAIN_ID_TO_NETWORK: LazyLock<HashMap<u64, &'static NetworkInfo>> =
    LazyLock::new(|| KNOWN_NETWORKS.iter().map(|n| (n.chain_id, n)).collect());

/// Looks up a network by name, ignoring ASCII case and surrounding whitespace.
pub fn network_by_name(name: &str) -> Option<&'static NetworkInfo> {
    let key = name.trim().to_ascii_lowercase();
    NAME_TO_NETWORK.get(key.as_str()).copied()
}

/// Looks up a network by its numeric chain id.
pub fn network_by_chain_id(chain_id: u64) -> Option<&'static NetworkInfo> {
    CHAIN_ID_TO_NETWORK.get(&chain_id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_and_chain_ids_are_unique() {
        let names: HashSet<_> = KNOWN_NETWORKS.iter().map(|n| n.name).collect();
        let ids: HashSet<_> = KNOWN_NETWORKS.iter().map(|n| n.chain_id).collect();
        assert_eq!(names.len(), KNOWN_NETWORKS.len());
        assert_eq!(ids.len(), KNOWN_NETWORKS.len());
    }

    #[test]
    fn test_names_pass_chain_name_grammar() {
        for network in KNOWN_NETWORKS {
            assert!(crate::validation::validate_blockchain_name(network.name).is_ok());
        }
    }

    #[test]
    fn test_lookup_by_name_is_case_insensitive() {
        assert_eq!(network_by_name("ETHEREUM").unwrap().chain_id, 1);
        assert_eq!(network_by_name(" polygon ").unwrap().chain_id, 137);
        assert!(network_by_name("dogechain").is_none());
    }

    #[test]
    fn test_lookup_by_chain_id() {
        assert_eq!(network_by_chain_id(42161).unwrap().name, "arbitrum");
        assert_eq!(network_by_chain_id(SOLANA_CHAIN_ID).unwrap().kind, NetworkKind::Solana);
        assert!(network_by_chain_id(999_999).is_none());
    }
}
