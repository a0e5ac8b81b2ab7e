//! Built-in wallet providers.
//!
//! - [`MetaMask`] - MetaMask universal links, EVM networks only
//! - [`TrustWallet`] - Trust Wallet send links, any network with a SLIP-44 coin type
//! - [`Eip681`] - plain `ethereum:` payment URIs understood by most EVM wallets
//! - [`PhantomSolanaPay`] - Solana Pay `solana:` URIs, Solana only

pub mod eip681;
pub mod metamask;
pub mod solana_pay;
pub mod trust;

pub use eip681::Eip681;
pub use metamask::MetaMask;
pub use solana_pay::PhantomSolanaPay;
pub use trust::TrustWallet;

use blockless_types::order::is_valid_recipient;

use crate::TransferRequest;

/// Recipient and, for non-native tokens, token address both fit the network's address grammar.
pub(crate) fn addresses_fit_network(request: &TransferRequest<'_>) -> bool {
    is_valid_recipient(request.network, request.recipient)
        && (request.is_native() || is_valid_recipient(request.network, &request.token.address))
}
