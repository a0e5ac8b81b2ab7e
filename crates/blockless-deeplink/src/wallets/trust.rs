use blockless_types::networks::NetworkInfo;

use super::addresses_fit_network;
use crate::units::format_units;
use crate::{TransferRequest, WalletProvider};

const TRUST_LINK_BASE: &str = "https://link.trustwallet.com/send";

/// Trust Wallet send links.
///
/// Assets are addressed as `c<slip44>` for the native coin and `c<slip44>_t<token>` for
/// tokens. The amount stays human-readable, cut to the token's decimals.
pub struct TrustWallet;

impl WalletProvider for TrustWallet {
    fn id(&self) -> &'static str {
        "trust"
    }

    fn name(&self) -> &'static str {
        "Trust Wallet"
    }

    fn supports(&self, network: &NetworkInfo) -> bool {
        network.slip44.is_some()
    }

    fn generate_deeplink(&self, request: &TransferRequest<'_>) -> Option<String> {
        let slip44 = request.network.slip44?;
        if !addresses_fit_network(request) {
            return None;
        }
        let units = request.base_units()?;
        let amount = format_units(units, request.token.decimals);
        let asset = if request.is_native() {
            format!("c{slip44}")
        } else {
            format!("c{slip44}_t{}", request.token.address)
        };
        Some(format!(
            "{TRUST_LINK_BASE}?asset={asset}&address={}&amount={amount}",
            request.recipient
        ))
    }
}
