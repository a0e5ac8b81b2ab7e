use blockless_types::networks::{NetworkInfo, NetworkKind};

use super::addresses_fit_network;
use crate::units::format_units;
use crate::{TransferRequest, WalletProvider};

/// Solana Pay transfer requests, opened by Phantom and other Solana wallets.
///
/// `solana:<recipient>?amount=<decimal>` for SOL, plus `&spl-token=<mint>` for SPL tokens.
pub struct PhantomSolanaPay;

impl WalletProvider for PhantomSolanaPay {
    fn id(&self) -> &'static str {
        "phantom"
    }

    fn name(&self) -> &'static str {
        "Phantom"
    }

    fn supports(&self, network: &NetworkInfo) -> bool {
        network.kind == NetworkKind::Solana
    }

    fn generate_deeplink(&self, request: &TransferRequest<'_>) -> Option<String> {
        if !self.supports(request.network) || !addresses_fit_network(request) {
            return None;
        }
        let units = request.base_units()?;
        let amount = format_units(units, request.token.decimals);
        let mut uri = format!("solana:{}?amount={amount}", request.recipient);
        if !request.is_native() {
            uri.push_str("&spl-token=");
            uri.push_str(&request.token.address);
        }
        Some(uri)
    }
}
