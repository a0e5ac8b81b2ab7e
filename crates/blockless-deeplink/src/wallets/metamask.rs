use blockless_types::networks::NetworkInfo;

use super::addresses_fit_network;
use super::eip681::transfer_target;
use crate::{TransferRequest, WalletProvider};

const METAMASK_LINK_BASE: &str = "https://metamask.app.link/send/";

/// MetaMask universal links. They carry an EIP-681 request without the scheme.
pub struct MetaMask;

impl WalletProvider for MetaMask {
    fn id(&self) -> &'static str {
        "metamask"
    }

    fn name(&self) -> &'static str {
        "MetaMask"
    }

    fn supports(&self, network: &NetworkInfo) -> bool {
        network.is_evm()
    }

    fn generate_deeplink(&self, request: &TransferRequest<'_>) -> Option<String> {
        if !self.supports(request.network) || !addresses_fit_network(request) {
            return None;
        }
        let units = request.base_units()?;
        Some(format!("{METAMASK_LINK_BASE}{}", transfer_target(request, units)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockless_types::networks::network_by_name;
    use blockless_types::tokens::{TokenMetadata, find_token};
    use blockless_types::validation::Amount;

    const RECIPIENT: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[test]
    fn test_erc20_link() {
        let base = network_by_name("base").unwrap();
        let usdc = find_token(base, "USDC").unwrap().into_metadata();
        let amount: Amount = "12.5".parse().unwrap();
        let request = TransferRequest {
            network: base,
            token: &usdc,
            amount: &amount,
            recipient: RECIPIENT,
        };
        assert_eq!(
            MetaMask.generate_deeplink(&request).unwrap(),
            "https://metamask.app.link/send/0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913@8453\
             /transfer?address=0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045&uint256=12500000"
        );
    }

    #[test]
    fn test_native_link() {
        let arbitrum = network_by_name("arbitrum").unwrap();
        let eth = find_token(arbitrum, "ETH").unwrap().into_metadata();
        let amount: Amount = "1".parse().unwrap();
        let request = TransferRequest {
            network: arbitrum,
            token: &eth,
            amount: &amount,
            recipient: RECIPIENT,
        };
        assert_eq!(
            MetaMask.generate_deeplink(&request).unwrap(),
            "https://metamask.app.link/send/0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045@42161\
             ?value=1000000000000000000"
        );
    }

    #[test]
    fn test_token_with_malformed_address() {
        let base = network_by_name("base").unwrap();
        let token = TokenMetadata {
            symbol: "ODD".into(),
            name: "ODD".into(),
            address: "not-an-address".into(),
            decimals: 18,
            chain_id: 8453,
            logo_uri: None,
            tags: vec![],
        };
        let amount: Amount = "1".parse().unwrap();
        let request = TransferRequest {
            network: base,
            token: &token,
            amount: &amount,
            recipient: RECIPIENT,
        };
        assert!(MetaMask.generate_deeplink(&request).is_none());
    }
}
