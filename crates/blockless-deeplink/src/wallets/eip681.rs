use alloy_primitives::U256;
use blockless_types::networks::NetworkInfo;

use super::addresses_fit_network;
use crate::{TransferRequest, WalletProvider};

/// `ethereum:` payment request URIs.
///
/// Native transfers use `ethereum:<recipient>@<chainId>?value=<wei>`; token transfers call
/// `transfer` on the token contract with the amount in base units.
pub struct Eip681;

/// The part of an EIP-681 request after the scheme, shared with MetaMask links.
pub(crate) fn transfer_target(request: &TransferRequest<'_>, units: U256) -> String {
    let chain_id = request.network.chain_id;
    if request.is_native() {
        format!("{}@{chain_id}?value={units}", request.recipient)
    } else {
        format!(
            "{}@{chain_id}/transfer?address={}&uint256={units}",
            request.token.address, request.recipient
        )
    }
}

impl WalletProvider for Eip681 {
    fn id(&self) -> &'static str {
        "eip681"
    }

    fn name(&self) -> &'static str {
        "Ethereum Wallet"
    }

    fn supports(&self, network: &NetworkInfo) -> bool {
        network.is_evm()
    }

    fn generate_deeplink(&self, request: &TransferRequest<'_>) -> Option<String> {
        if !self.supports(request.network) || !addresses_fit_network(request) {
            return None;
        }
        let units = request.base_units()?;
        Some(format!("ethereum:{}", transfer_target(request, units)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockless_types::networks::network_by_name;
    use blockless_types::tokens::find_token;
    use blockless_types::validation::Amount;

    const RECIPIENT: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[test]
    fn test_native_transfer() {
        let ethereum = network_by_name("ethereum").unwrap();
        let eth = find_token(ethereum, "ETH").unwrap().into_metadata();
        let amount: Amount = "0.5".parse().unwrap();
        let request = TransferRequest {
            network: ethereum,
            token: &eth,
            amount: &amount,
            recipient: RECIPIENT,
        };
        assert_eq!(
            Eip681.generate_deeplink(&request).unwrap(),
            "ethereum:0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045@1?value=500000000000000000"
        );
    }

    #[test]
    fn test_token_transfer() {
        let polygon = network_by_name("polygon").unwrap();
        let usdc = find_token(polygon, "USDC").unwrap().into_metadata();
        let amount: Amount = "2".parse().unwrap();
        let request = TransferRequest {
            network: polygon,
            token: &usdc,
            amount: &amount,
            recipient: RECIPIENT,
        };
        assert_eq!(
            Eip681.generate_deeplink(&request).unwrap(),
            "ethereum:0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359@137/transfer\
             ?address=0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045&uint256=2000000"
        );
    }
}
