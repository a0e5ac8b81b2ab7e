#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Wallet deeplinks for Blockless Swap payment options.
//!
//! Given a resolved transfer (network, token, amount, recipient), each [`WalletProvider`]
//! either builds a URI its wallet app understands or returns `None` when it cannot express
//! the transfer. [`WalletRegistry::applicable_wallets`] asks every provider that supports
//! the network and keeps the URIs that came back.
//!
//! Everything here is string construction; no network access happens.
//!
//! # Example
//!
//! ```
//! use blockless_deeplink::{TransferRequest, WalletRegistry};
//! use blockless_types::networks::network_by_name;
//! use blockless_types::tokens::find_token;
//!
//! let base = network_by_name("base").unwrap();
//! let usdc = find_token(base, "USDC").unwrap().into_metadata();
//! let amount = "12.5".parse().unwrap();
//! let request = TransferRequest {
//!     network: base,
//!     token: &usdc,
//!     amount: &amount,
//!     recipient: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
//! };
//!
//! let links = WalletRegistry::default_wallets().applicable_wallets(&request);
//! assert!(links.iter().any(|l| l.wallet_id == "metamask"));
//! assert!(links.iter().all(|l| l.wallet_id != "phantom"));
//! ```

pub mod units;
pub mod wallets;

use alloy_primitives::U256;
use serde::Serialize;
use std::fmt::{Debug, Formatter};

use blockless_types::networks::{NetworkInfo, network_by_chain_id};
use blockless_types::order::PaymentOption;
use blockless_types::tokens::{TokenMetadata, is_native};
use blockless_types::validation::Amount;

use crate::units::to_base_units;
use crate::wallets::{Eip681, MetaMask, PhantomSolanaPay, TrustWallet};

/// A single transfer a wallet is asked to prefill.
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'a> {
    pub network: &'a NetworkInfo,
    pub token: &'a TokenMetadata,
    pub amount: &'a Amount,
    pub recipient: &'a str,
}

impl<'a> TransferRequest<'a> {
    /// Builds the request for an order payment option, if its chain is a known network.
    pub fn from_option(option: &'a PaymentOption<'_>) -> Option<Self> {
        let network = network_by_chain_id(option.chain.chain_id)?;
        Some(TransferRequest {
            network,
            token: &option.token.metadata,
            amount: &option.amount,
            recipient: &option.chain.address,
        })
    }

    pub fn is_native(&self) -> bool {
        is_native(self.network, self.token)
    }

    /// Amount in the token's smallest unit, or `None` if it floors to zero or overflows.
    pub fn base_units(&self) -> Option<U256> {
        let units = match to_base_units(self.amount, self.token.decimals) {
            Ok(units) => units,
            Err(_e) => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(error = %_e, "Deeplink skipped");
                return None;
            }
        };
        #[cfg(feature = "telemetry")]
        if units.truncated {
            tracing::warn!(
                amount = %self.amount,
                decimals = self.token.decimals,
                symbol = %self.token.symbol,
                "Amount has more fractional digits than the token, extra digits dropped"
            );
        }
        if units.value.is_zero() {
            return None;
        }
        Some(units.value)
    }
}

/// A wallet app that can be opened with a prefilled transfer.
pub trait WalletProvider: Send + Sync {
    /// Stable identifier, e.g. `"metamask"`.
    fn id(&self) -> &'static str;
    /// Display name, e.g. `"MetaMask"`.
    fn name(&self) -> &'static str;
    fn supports(&self, network: &NetworkInfo) -> bool;
    /// Builds the URI, or `None` if this wallet cannot express the transfer.
    fn generate_deeplink(&self, request: &TransferRequest<'_>) -> Option<String>;
}

/// A generated URI for one wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDeeplink {
    pub wallet_id: &'static str,
    pub name: &'static str,
    pub uri: String,
}

/// Ordered set of wallet providers.
#[derive(Default)]
pub struct WalletRegistry(Vec<Box<dyn WalletProvider>>);

impl Debug for WalletRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.0.iter().map(|w| w.id()).collect();
        f.debug_tuple("WalletRegistry").field(&ids).finish()
    }
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_wallets() -> Self {
        Self::new()
            .and_register(MetaMask)
            .and_register(TrustWallet)
            .and_register(Eip681)
            .and_register(PhantomSolanaPay)
    }

    pub fn and_register<W: WalletProvider + 'static>(mut self, wallet: W) -> Self {
        self.register(wallet);
        self
    }

    /// Adds a provider, replacing one with the same id in place.
    pub fn register<W: WalletProvider + 'static>(&mut self, wallet: W) {
        match self.0.iter_mut().find(|w| w.id() == wallet.id()) {
            Some(slot) => *slot = Box::new(wallet),
            None => self.0.push(Box::new(wallet)),
        }
    }

    pub fn by_id(&self, id: &str) -> Option<&dyn WalletProvider> {
        self.0.iter().find(|w| w.id() == id).map(|w| w.as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deeplinks from every provider that supports the network and can express the transfer.
    pub fn applicable_wallets(&self, request: &TransferRequest<'_>) -> Vec<WalletDeeplink> {
        self.0
            .iter()
            .filter(|w| w.supports(request.network))
            .filter_map(|w| {
                w.generate_deeplink(request).map(|uri| WalletDeeplink {
                    wallet_id: w.id(),
                    name: w.name(),
                    uri,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockless_types::networks::network_by_name;
    use blockless_types::tokens::find_token;

    const EVM_RECIPIENT: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
    const SOL_RECIPIENT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn ids(links: &[WalletDeeplink]) -> Vec<&'static str> {
        links.iter().map(|l| l.wallet_id).collect()
    }

    #[test]
    fn test_evm_wallets_skip_non_evm_networks() {
        let solana = network_by_name("solana").unwrap();
        let usdc = find_token(solana, "USDC").unwrap().into_metadata();
        let amount: Amount = "5".parse().unwrap();
        let request = TransferRequest {
            network: solana,
            token: &usdc,
            amount: &amount,
            recipient: SOL_RECIPIENT,
        };
        let registry = WalletRegistry::default_wallets();
        for id in ["metamask", "eip681"] {
            let wallet = registry.by_id(id).unwrap();
            assert!(!wallet.supports(solana));
            assert!(wallet.generate_deeplink(&request).is_none());
        }
        let links = registry.applicable_wallets(&request);
        assert_eq!(ids(&links), vec!["trust", "phantom"]);
    }

    #[test]
    fn test_evm_network_links() {
        let base = network_by_name("base").unwrap();
        let usdc = find_token(base, "USDC").unwrap().into_metadata();
        let amount: Amount = "12.5".parse().unwrap();
        let request = TransferRequest {
            network: base,
            token: &usdc,
            amount: &amount,
            recipient: EVM_RECIPIENT,
        };
        let links = WalletRegistry::default_wallets().applicable_wallets(&request);
        assert_eq!(ids(&links), vec!["metamask", "trust", "eip681"]);

        let json = serde_json::to_value(&links[0]).unwrap();
        assert_eq!(json["walletId"], "metamask");
        assert_eq!(json["name"], "MetaMask");
        assert!(json["uri"].as_str().unwrap().ends_with("uint256=12500000"));
    }

    #[test]
    fn test_zero_after_flooring_yields_nothing() {
        let base = network_by_name("base").unwrap();
        let usdc = find_token(base, "USDC").unwrap().into_metadata();
        let amount: Amount = "0.0000001".parse().unwrap();
        let request = TransferRequest {
            network: base,
            token: &usdc,
            amount: &amount,
            recipient: EVM_RECIPIENT,
        };
        assert!(request.base_units().is_none());
        assert!(WalletRegistry::default_wallets().applicable_wallets(&request).is_empty());
    }

    #[test]
    fn test_bad_recipient_yields_nothing() {
        let ethereum = network_by_name("ethereum").unwrap();
        let eth = find_token(ethereum, "ETH").unwrap().into_metadata();
        let amount: Amount = "1".parse().unwrap();
        let request = TransferRequest {
            network: ethereum,
            token: &eth,
            amount: &amount,
            recipient: SOL_RECIPIENT,
        };
        assert!(WalletRegistry::default_wallets().applicable_wallets(&request).is_empty());
    }

    struct Fixed(&'static str);

    impl WalletProvider for Fixed {
        fn id(&self) -> &'static str {
            "metamask"
        }
        fn name(&self) -> &'static str {
            "Fixed"
        }
        fn supports(&self, _network: &NetworkInfo) -> bool {
            true
        }
        fn generate_deeplink(&self, _request: &TransferRequest<'_>) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn test_register_replaces_same_id_in_place() {
        let registry = WalletRegistry::default_wallets().and_register(Fixed("fixed:uri"));
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.by_id("metamask").unwrap().name(), "Fixed");
        let solana = network_by_name("solana").unwrap();
        let sol = find_token(solana, "SOL").unwrap().into_metadata();
        let amount: Amount = "1".parse().unwrap();
        let request = TransferRequest {
            network: solana,
            token: &sol,
            amount: &amount,
            recipient: SOL_RECIPIENT,
        };
        let links = registry.applicable_wallets(&request);
        assert_eq!(links[0].uri, "fixed:uri");
    }

    #[test]
    fn test_from_payment_option() {
        use blockless_types::order::OrderBuilder;
        use blockless_types::util::FiatAmount;

        let order = OrderBuilder::new(FiatAmount::parse("3").unwrap(), "USD")
            .unwrap()
            .chain("arbitrum", EVM_RECIPIENT)
            .unwrap()
            .token("arbitrum", "USDT", "3")
            .unwrap()
            .build()
            .unwrap();
        let options = order.payment_options();
        let request = TransferRequest::from_option(&options[0]).unwrap();
        assert_eq!(request.network.chain_id, 42161);
        assert_eq!(request.base_units(), Some(U256::from(3_000_000u64)));
    }
}
