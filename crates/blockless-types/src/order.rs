//! Multi-chain merchant orders.
//!
//! An [`Order`] asks for a fiat value and lists, per accepted chain, the recipient and the
//! token amounts the merchant will take. Orders are built from merchant input with
//! [`OrderBuilder`], projected to a [`SerializedOrder`] for links, and rebuilt from one with
//! [`Order::rehydrate`].
//!
//! Two things are derived and never read from the wire:
//! - the display order of tokens within a chain (see [`sort_tokens`]);
//! - the swap URL, a `/swap?dst=...` link with one leg per payable token.
//!
//! # Example
//!
//! ```
//! use blockless_types::order::{Order, OrderBuilder};
//! use blockless_types::util::FiatAmount;
//!
//! let order = OrderBuilder::new(FiatAmount::parse("25").unwrap(), "USD")
//!     .unwrap()
//!     .chain("base", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045")
//!     .unwrap()
//!     .token("base", "USDC", "25")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! assert!(order.swap_url.is_some());
//!
//! let again = Order::rehydrate(&order.to_serialized());
//! assert_eq!(again.chains[0].tokens[0].symbol, "USDC");
//! ```

use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::LazyLock;

use crate::codec::{
    ORDER_BLOB_VERSION, SerializedChain, SerializedOrder, SerializedToken, TokenAmount,
};
use crate::intent::{SwapIntent, SwapParams};
use crate::networks::{NetworkInfo, NetworkKind, network_by_name};
use crate::tokens::{
    MetadataSource, ResolvedMetadata, TokenInfo, TokenMetadata, find_token, resolve_metadata,
};
use crate::util::FiatAmount;
use crate::validation::{Amount, ValidationError, is_evm_address, is_solana_address, validate_amount};

static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3,5}$").expect("valid currency regex"));

/// A merchant payment request across one or more chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub fiat_amount: FiatAmount,
    pub fiat_currency: String,
    pub chains: Vec<ChainPayment>,
    /// Derived `/swap?dst=...` link; `None` when no token is payable.
    pub swap_url: Option<String>,
}

/// Recipient and accepted tokens on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainPayment {
    pub name: String,
    pub chain_id: u64,
    pub address: String,
    pub tokens: Vec<TokenPayment>,
}

/// A token the merchant accepts, with the amount owed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayment {
    pub symbol: String,
    pub amount: TokenAmount,
    #[serde(rename = "tokenMetadata")]
    pub metadata: TokenMetadata,
    /// Registry tier the metadata came from.
    pub source: MetadataSource,
}

impl TokenPayment {
    fn from_resolved(symbol: &str, amount: TokenAmount, resolved: ResolvedMetadata) -> Self {
        TokenPayment {
            symbol: symbol.to_string(),
            amount,
            source: resolved.source(),
            metadata: resolved.into_metadata(),
        }
    }
}

/// A payable `(chain, token)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOption<'a> {
    pub chain: &'a ChainPayment,
    pub token: &'a TokenPayment,
    pub amount: Amount,
}

/// Compares two tokens for display.
///
/// Positive amounts come before zero or unparseable ones, then lower category rank, then
/// symbol.
pub fn display_order(a: &TokenPayment, b: &TokenPayment) -> Ordering {
    let key = |t: &TokenPayment| (!t.amount.is_positive(), t.metadata.category().rank());
    key(a).cmp(&key(b)).then_with(|| a.symbol.cmp(&b.symbol))
}

/// Sorts tokens into display order.
pub fn sort_tokens(tokens: &mut [TokenPayment]) {
    tokens.sort_by(display_order);
}

/// Builds the `/swap` link for every payable token, or `None` if nothing is payable.
///
/// Legs whose chain name, symbol or recipient do not satisfy the swap link grammars are
/// left out.
pub fn derive_swap_url(chains: &[ChainPayment]) -> Option<String> {
    let mut dst = Vec::new();
    for chain in chains {
        for token in &chain.tokens {
            if !token.amount.is_positive() {
                continue;
            }
            match SwapIntent::new(&chain.name, token.amount.as_str(), &token.symbol, &chain.address)
            {
                Ok(leg) => dst.push(leg),
                Err(_e) => {
                    #[cfg(feature = "telemetry")]
                    tracing::debug!(chain = %chain.name, symbol = %token.symbol, error = %_e, "Swap leg skipped");
                }
            }
        }
    }
    if dst.is_empty() {
        return None;
    }
    Some(SwapParams { dst, src: None }.to_path())
}

impl Order {
    /// Minimized projection for links and session storage.
    pub fn to_serialized(&self) -> SerializedOrder {
        SerializedOrder {
            version: ORDER_BLOB_VERSION,
            fiat_amount: self.fiat_amount,
            fiat_currency: self.fiat_currency.clone(),
            chains: self
                .chains
                .iter()
                .map(|chain| SerializedChain {
                    name: chain.name.clone(),
                    chain_id: chain.chain_id,
                    address: chain.address.clone(),
                    tokens: chain
                        .tokens
                        .iter()
                        .map(|token| SerializedToken {
                            symbol: token.symbol.clone(),
                            amount: token.amount.clone(),
                            info: token.metadata.info(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Rebuilds a display-ready order from its minimized projection.
    ///
    /// Token metadata is regenerated from the registries, tokens are re-sorted and the swap
    /// URL is derived again. Nothing here fails: unknown tokens get synthesized metadata and
    /// unpayable tokens are simply left out of the swap URL.
    pub fn rehydrate(serialized: &SerializedOrder) -> Order {
        let chains: Vec<ChainPayment> = serialized
            .chains
            .iter()
            .map(|chain| {
                let mut tokens: Vec<TokenPayment> = chain
                    .tokens
                    .iter()
                    .map(|token| {
                        let resolved = resolve_metadata(chain.chain_id, &token.info);
                        #[cfg(feature = "telemetry")]
                        tracing::debug!(
                            chain = %chain.name,
                            symbol = %token.symbol,
                            source = %resolved.source(),
                            "Token metadata resolved"
                        );
                        TokenPayment::from_resolved(&token.symbol, token.amount.clone(), resolved)
                    })
                    .collect();
                sort_tokens(&mut tokens);
                ChainPayment {
                    name: chain.name.clone(),
                    chain_id: chain.chain_id,
                    address: chain.address.clone(),
                    tokens,
                }
            })
            .collect();
        let swap_url = derive_swap_url(&chains);
        #[cfg(feature = "telemetry")]
        tracing::info!(
            chains = chains.len(),
            tokens = chains.iter().map(|c| c.tokens.len()).sum::<usize>(),
            payable = swap_url.is_some(),
            "Order rehydrated"
        );
        Order {
            fiat_amount: serialized.fiat_amount,
            fiat_currency: serialized.fiat_currency.clone(),
            chains,
            swap_url,
        }
    }

    /// Every `(chain, token)` pair with a positive amount, in display order.
    pub fn payment_options(&self) -> Vec<PaymentOption<'_>> {
        self.chains
            .iter()
            .flat_map(|chain| {
                chain.tokens.iter().filter_map(move |token| {
                    token.amount.positive().map(|amount| PaymentOption {
                        chain,
                        token,
                        amount,
                    })
                })
            })
            .collect()
    }

    /// True when at least one token asks for a positive amount.
    pub fn is_payable(&self) -> bool {
        !self.payment_options().is_empty()
    }
}

impl From<&Order> for SerializedOrder {
    fn from(order: &Order) -> Self {
        order.to_serialized()
    }
}

/// Error returned when merchant input cannot form an order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid currency code {0:?}: expected 3 to 5 uppercase letters")]
    InvalidCurrency(String),
    #[error("Unknown network {0:?}")]
    UnknownNetwork(String),
    #[error("Invalid recipient address {address:?} for network {network}")]
    InvalidRecipient { network: String, address: String },
    #[error("Network {0} is already part of the order")]
    DuplicateChain(String),
    #[error("Network {0} has not been added to the order")]
    ChainNotAdded(String),
    #[error("Unknown token {symbol:?} on network {network}")]
    UnknownToken { network: String, symbol: String },
    #[error("Token {symbol} is already listed on network {network}")]
    DuplicateToken { network: String, symbol: String },
    #[error("Token {symbol} belongs to chain {token_chain_id}, not to network {network}")]
    WrongChain {
        network: String,
        symbol: String,
        token_chain_id: u64,
    },
    #[error("Invalid amount for {symbol}: {source}")]
    InvalidTokenAmount {
        symbol: String,
        #[source]
        source: ValidationError,
    },
    #[error("Order has no networks")]
    NoChains,
}

/// Validating builder for [`Order`].
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    fiat_amount: FiatAmount,
    fiat_currency: String,
    chains: Vec<ChainPayment>,
}

impl OrderBuilder {
    pub fn new(fiat_amount: FiatAmount, fiat_currency: &str) -> Result<Self, OrderError> {
        if !CURRENCY_RE.is_match(fiat_currency) {
            return Err(OrderError::InvalidCurrency(fiat_currency.to_string()));
        }
        Ok(OrderBuilder {
            fiat_amount,
            fiat_currency: fiat_currency.to_string(),
            chains: Vec::new(),
        })
    }

    /// Accepts payments on `network` to `recipient`.
    pub fn chain(mut self, network: &str, recipient: &str) -> Result<Self, OrderError> {
        let info =
            network_by_name(network).ok_or_else(|| OrderError::UnknownNetwork(network.to_string()))?;
        if self.chains.iter().any(|c| c.chain_id == info.chain_id) {
            return Err(OrderError::DuplicateChain(info.name.to_string()));
        }
        let recipient = recipient.trim();
        if !is_valid_recipient(info, recipient) {
            return Err(OrderError::InvalidRecipient {
                network: info.name.to_string(),
                address: recipient.to_string(),
            });
        }
        self.chains.push(ChainPayment {
            name: info.name.to_string(),
            chain_id: info.chain_id,
            address: recipient.to_string(),
            tokens: Vec::new(),
        });
        Ok(self)
    }

    /// Adds a registry token, looked up by symbol on an already added network.
    pub fn token(self, network: &str, symbol: &str, amount: &str) -> Result<Self, OrderError> {
        let info =
            network_by_name(network).ok_or_else(|| OrderError::UnknownNetwork(network.to_string()))?;
        let resolved = find_token(info, symbol).ok_or_else(|| OrderError::UnknownToken {
            network: info.name.to_string(),
            symbol: symbol.to_string(),
        })?;
        let symbol = resolved.metadata().symbol.clone();
        self.push_token(info, &symbol, amount, resolved)
    }

    /// Adds a token outside the registries, described by its minimized record.
    pub fn custom_token(self, network: &str, token: TokenInfo, amount: &str) -> Result<Self, OrderError> {
        let info =
            network_by_name(network).ok_or_else(|| OrderError::UnknownNetwork(network.to_string()))?;
        if token.chain_id != info.chain_id {
            return Err(OrderError::WrongChain {
                network: info.name.to_string(),
                symbol: token.symbol,
                token_chain_id: token.chain_id,
            });
        }
        let resolved = resolve_metadata(info.chain_id, &token);
        self.push_token(info, &token.symbol, amount, resolved)
    }

    fn push_token(
        mut self,
        network: &NetworkInfo,
        symbol: &str,
        amount: &str,
        resolved: ResolvedMetadata,
    ) -> Result<Self, OrderError> {
        let amount = checked_token_amount(symbol, amount)?;
        let chain = self
            .chains
            .iter_mut()
            .find(|c| c.chain_id == network.chain_id)
            .ok_or_else(|| OrderError::ChainNotAdded(network.name.to_string()))?;
        if chain.tokens.iter().any(|t| t.symbol.eq_ignore_ascii_case(symbol)) {
            return Err(OrderError::DuplicateToken {
                network: network.name.to_string(),
                symbol: symbol.to_string(),
            });
        }
        chain
            .tokens
            .push(TokenPayment::from_resolved(symbol, amount, resolved));
        Ok(self)
    }

    /// Sorts tokens, derives the swap URL and returns the order.
    pub fn build(mut self) -> Result<Order, OrderError> {
        if self.chains.is_empty() {
            return Err(OrderError::NoChains);
        }
        for chain in &mut self.chains {
            sort_tokens(&mut chain.tokens);
        }
        let swap_url = derive_swap_url(&self.chains);
        Ok(Order {
            fiat_amount: self.fiat_amount,
            fiat_currency: self.fiat_currency,
            chains: self.chains,
            swap_url,
        })
    }
}

/// Checks a recipient against the address grammar of the network kind.
pub fn is_valid_recipient(network: &NetworkInfo, address: &str) -> bool {
    match network.kind {
        NetworkKind::Evm => is_evm_address(address),
        NetworkKind::Solana => is_solana_address(address),
    }
}

/// Token amounts are positive decimals or zero; zero marks a token as listed but not payable.
fn checked_token_amount(symbol: &str, raw: &str) -> Result<TokenAmount, OrderError> {
    let raw = raw.trim();
    match validate_amount(raw) {
        Ok(_) | Err(ValidationError::NotPositive { .. }) => Ok(TokenAmount::new(raw)),
        Err(source) => Err(OrderError::InvalidTokenAmount {
            symbol: symbol.to_string(),
            source,
        }),
    }
}
