//! Token metadata, display categories and the static token registries.
//!
//! Order blobs only carry [`TokenInfo`] (`symbol`, `address`, `decimals`, `chainId`). When an
//! order is rehydrated, [`resolve_metadata`] rebuilds a full [`TokenMetadata`] record by
//! trying, in order:
//!
//! 1. the native token of the chain, matched by symbol, tagged `native`;
//! 2. a common stablecoin deployment, matched by chain id, address and symbol, tagged
//!    `PEG:stablecoin`;
//! 3. a synthesized record named after the symbol, with a best-effort logo URL and no tags.
//!
//! The tier that produced a record is kept in the returned [`ResolvedMetadata`] variant.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use crate::networks::{NetworkInfo, SOLANA_CHAIN_ID};
use crate::validation::is_evm_address;

/// Placeholder address for the gas token of EVM chains.
pub const EVM_NATIVE_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";
/// Wrapped SOL mint, used as the address of native SOL.
pub const SOLANA_NATIVE_ADDRESS: &str = "So11111111111111111111111111111111111111112";

pub const TAG_NATIVE: &str = "native";
pub const TAG_STABLECOIN: &str = "PEG:stablecoin";

const LOGO_BASE_URL: &str = "https://tokens.1inch.io";

/// Full token record as displayed to a payer.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub decimals: u8,
    pub chain_id: u64,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TokenMetadata {
    pub fn category(&self) -> TokenCategory {
        TokenCategory::from_tags(&self.tags)
    }

    /// Minimized projection carried in order blobs.
    pub fn info(&self) -> TokenInfo {
        TokenInfo {
            symbol: self.symbol.clone(),
            address: self.address.clone(),
            decimals: self.decimals,
            chain_id: self.chain_id,
        }
    }
}

/// The four token fields that survive serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub symbol: String,
    pub address: String,
    pub decimals: u8,
    pub chain_id: u64,
}

/// Display category of a token, ordered by how prominently it is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenCategory {
    Stablecoin = 0,
    Major = 1,
    Verified = 2,
    Warning = 3,
    HighRisk = 4,
}

impl TokenCategory {
    /// Classifies a token by its tags.
    ///
    /// High-risk tags override everything else. Tokens without any recognised tag are
    /// listed as [`TokenCategory::Warning`].
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let has = |predicate: fn(&str) -> bool| tags.iter().any(|t| predicate(t.as_ref()));
        if has(|t| matches!(t, "high-risk" | "scam" | "honeypot")) {
            TokenCategory::HighRisk
        } else if has(|t| t.starts_with("PEG:") || t == "stablecoin") {
            TokenCategory::Stablecoin
        } else if has(|t| matches!(t, "native" | "major")) {
            TokenCategory::Major
        } else if has(|t| matches!(t, "verified" | "tokens")) {
            TokenCategory::Verified
        } else {
            TokenCategory::Warning
        }
    }

    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

/// Which registry tier produced a token record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    Native,
    Stablecoin,
    Synthesized,
}

impl Display for MetadataSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MetadataSource::Native => "native",
            MetadataSource::Stablecoin => "stablecoin",
            MetadataSource::Synthesized => "synthesized",
        };
        f.write_str(s)
    }
}

/// A token record together with the registry tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMetadata {
    Native(TokenMetadata),
    Stablecoin(TokenMetadata),
    Synthesized(TokenMetadata),
}

impl ResolvedMetadata {
    pub fn source(&self) -> MetadataSource {
        match self {
            ResolvedMetadata::Native(_) => MetadataSource::Native,
            ResolvedMetadata::Stablecoin(_) => MetadataSource::Stablecoin,
            ResolvedMetadata::Synthesized(_) => MetadataSource::Synthesized,
        }
    }

    pub fn metadata(&self) -> &TokenMetadata {
        match self {
            ResolvedMetadata::Native(m)
            | ResolvedMetadata::Stablecoin(m)
            | ResolvedMetadata::Synthesized(m) => m,
        }
    }

    pub fn into_metadata(self) -> TokenMetadata {
        match self {
            ResolvedMetadata::Native(m)
            | ResolvedMetadata::Stablecoin(m)
            | ResolvedMetadata::Synthesized(m) => m,
        }
    }
}

/// A fixed registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryToken {
    pub chain_id: u64,
    pub symbol: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub decimals: u8,
}

impl RegistryToken {
    fn to_metadata(self, tag: &str) -> TokenMetadata {
        TokenMetadata {
            symbol: self.symbol.to_string(),
            name: self.name.to_string(),
            address: self.address.to_string(),
            decimals: self.decimals,
            chain_id: self.chain_id,
            logo_uri: logo_url(self.chain_id, self.address),
            tags: vec![tag.to_string()],
        }
    }
}

macro_rules! native {
    ($chain_id:expr, $symbol:expr, $name:expr) => {
        RegistryToken {
            chain_id: $chain_id,
            symbol: $symbol,
            name: $name,
            address: EVM_NATIVE_ADDRESS,
            decimals: 18,
        }
    };
}

pub static NATIVE_TOKENS: &[RegistryToken] = &[
    native!(1, "ETH", "Ether"),
    native!(56, "BNB", "BNB"),
    native!(137, "POL", "Polygon Ecosystem Token"),
    native!(42161, "ETH", "Ether"),
    native!(10, "ETH", "Ether"),
    native!(8453, "ETH", "Ether"),
    native!(43114, "AVAX", "Avalanche"),
    native!(100, "XDAI", "xDAI"),
    native!(324, "ETH", "Ether"),
    native!(59144, "ETH", "Ether"),
    RegistryToken {
        chain_id: SOLANA_CHAIN_ID,
        symbol: "SOL",
        name: "Solana",
        address: SOLANA_NATIVE_ADDRESS,
        decimals: 9,
    },
];

macro_rules! stable {
    ($chain_id:expr, $symbol:expr, $address:expr, $decimals:expr) => {
        RegistryToken {
            chain_id: $chain_id,
            symbol: $symbol,
            name: stablecoin_name($symbol),
            address: $address,
            decimals: $decimals,
        }
    };
}

const fn stablecoin_name(symbol: &str) -> &'static str {
    match symbol.as_bytes() {
        b"USDC" => "USD Coin",
        b"USDT" => "Tether USD",
        b"DAI" => "Dai Stablecoin",
        _ => "Stablecoin",
    }
}

pub static COMMON_STABLECOINS: &[RegistryToken] = &[
    // Ethereum
    stable!(1, "USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6),
    stable!(1, "USDT", "0xdAC17F958D2ee523a2206206994597C13D831ec7", 6),
    stable!(1, "DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F", 18),
    // BNB Chain
    stable!(56, "USDC", "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d", 18),
    stable!(56, "USDT", "0x55d398326f99059fF775485246999027B3197955", 18),
    // Polygon
    stable!(137, "USDC", "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359", 6),
    stable!(137, "USDT", "0xc2132D05D31c914a87C6611C10748AEb04B58e8F", 6),
    // Arbitrum
    stable!(42161, "USDC", "0xaf88d065e77c8cC2239327C5EDb3A432268e5831", 6),
    stable!(42161, "USDT", "0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9", 6),
    // Optimism
    stable!(10, "USDC", "0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85", 6),
    stable!(10, "USDT", "0x94b008aA00579c1307B0EF2c499aD98a8ce58e58", 6),
    // Base
    stable!(8453, "USDC", "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913", 6),
    // Avalanche
    stable!(43114, "USDC", "0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E", 6),
    stable!(43114, "USDT", "0x9702230A8Ea53601f5cD2dc00fDBc13d4dF4A8c7", 6),
    // Gnosis
    stable!(100, "USDC", "0xDDAfbb505ad214D7b80b1f830fcCc89B60fb7A83", 6),
    // Solana
    stable!(SOLANA_CHAIN_ID, "USDC", "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", 6),
    stable!(SOLANA_CHAIN_ID, "USDT", "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB", 6),
];

static NATIVE_BY_CHAIN: LazyLock<HashMap<u64, &'static RegistryToken>> =
    LazyLock::new(|| NATIVE_TOKENS.iter().map(|t| (t.chain_id, t)).collect());

static STABLECOIN_BY_ADDRESS: LazyLock<HashMap<(u64, String), &'static RegistryToken>> =
    LazyLock::new(|| {
        COMMON_STABLECOINS
            .iter()
            .map(|t| ((t.chain_id, normalize_address(t.address)), t))
            .collect()
    });

/// Canonical form of an address for lookups: lowercase for EVM hex, unchanged for base58.
pub fn normalize_address(address: &str) -> String {
    if is_evm_address(address) {
        address.to_ascii_lowercase()
    } else {
        address.to_string()
    }
}

/// Best-effort logo URL for a token.
///
/// EVM tokens follow the token-list CDN pattern `<base>/<lowercase address>.png`. Other
/// chains have no predictable logo location.
pub fn logo_url(chain_id: u64, address: &str) -> Option<String> {
    if chain_id != SOLANA_CHAIN_ID && is_evm_address(address) {
        Some(format!("{LOGO_BASE_URL}/{}.png", address.to_ascii_lowercase()))
    } else {
        None
    }
}

/// The native token registry entry of a chain.
pub fn native_token(chain_id: u64) -> Option<&'static RegistryToken> {
    NATIVE_BY_CHAIN.get(&chain_id).copied()
}

/// Reconstructs full token metadata from its minimized projection.
pub fn resolve_metadata(chain_id: u64, info: &TokenInfo) -> ResolvedMetadata {
    if let Some(native) = native_token(chain_id) {
        if native.symbol.eq_ignore_ascii_case(&info.symbol) {
            return ResolvedMetadata::Native(native.to_metadata(TAG_NATIVE));
        }
    }
    let key = (chain_id, normalize_address(&info.address));
    if let Some(stable) = STABLECOIN_BY_ADDRESS.get(&key) {
        if stable.symbol.eq_ignore_ascii_case(&info.symbol) {
            return ResolvedMetadata::Stablecoin(stable.to_metadata(TAG_STABLECOIN));
        }
    }
    ResolvedMetadata::Synthesized(TokenMetadata {
        symbol: info.symbol.clone(),
        name: info.symbol.clone(),
        address: info.address.clone(),
        decimals: info.decimals,
        chain_id,
        logo_uri: logo_url(chain_id, &info.address),
        tags: Vec::new(),
    })
}

/// Resolves a token symbol on a network from the static registries.
///
/// Only the native token and the common stablecoins are known by symbol; any other
/// token has to be described by address and decimals.
pub fn find_token(network: &NetworkInfo, symbol: &str) -> Option<ResolvedMetadata> {
    if let Some(native) = native_token(network.chain_id) {
        if native.symbol.eq_ignore_ascii_case(symbol) {
            return Some(ResolvedMetadata::Native(native.to_metadata(TAG_NATIVE)));
        }
    }
    COMMON_STABLECOINS
        .iter()
        .find(|t| t.chain_id == network.chain_id && t.symbol.eq_ignore_ascii_case(symbol))
        .map(|stable| ResolvedMetadata::Stablecoin(stable.to_metadata(TAG_STABLECOIN)))
}

/// Returns true if `token` is the gas token of `network`.
pub fn is_native(network: &NetworkInfo, token: &TokenMetadata) -> bool {
    native_token(network.chain_id)
        .map(|native| normalize_address(native.address) == normalize_address(&token.address))
        .unwrap_or(false)
}
