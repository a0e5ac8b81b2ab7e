//! Application state shared by all commands.
//!
//! [`AppState`] is loaded once at start and owns the configuration, the file store and the
//! merchant config. Mutating commands change the merchant config in memory and call
//! [`AppState::save`].

use blockless_types::codec::OrderDataError;
use blockless_types::intent::{SwapIntentError, SwapParamsError};
use blockless_types::networks::network_by_name;
use blockless_types::order::{Order, OrderBuilder, OrderError, is_valid_recipient};
use blockless_types::tokens::find_token;
use blockless_types::util::{FiatAmount, FiatAmountParseError};
use blockless_types::validation::ValidationError;
use std::str::FromStr;

use crate::config::Config;
use crate::store::{FileStore, MerchantChain, MerchantConfig, StoreError};

/// Errors surfaced by commands.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("Invalid fiat amount: {0}")]
    FiatAmount(#[from] FiatAmountParseError),
    #[error("Invalid payment {0:?}: expected <chain>:<symbol>:<amount>")]
    InvalidPayment(String),
    #[error("Network {0} is not configured; add it with `blockless merchant chain`")]
    ChainNotConfigured(String),
    #[error("Network {0} is not configured")]
    UnknownMerchantChain(String),
    #[error("Unknown network {0:?}")]
    UnknownNetwork(String),
    #[error("Invalid recipient address {address:?} for network {network}")]
    InvalidRecipient { network: String, address: String },
    #[error("Unknown token {symbol:?} on network {network}")]
    UnknownToken { network: String, symbol: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    SwapIntent(#[from] SwapIntentError),
    #[error(transparent)]
    SwapParams(#[from] SwapParamsError),
    #[error(transparent)]
    OrderData(#[from] OrderDataError),
    #[error("No wallet can open a {symbol} transfer on {network}")]
    NoDeeplinks { network: String, symbol: String },
    #[error("Failed to build link: {0}")]
    Link(#[from] url::ParseError),
    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// One `<chain>:<symbol>:<amount>` entry of `order create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSpec {
    pub chain: String,
    pub symbol: String,
    pub amount: String,
}

impl FromStr for PaymentSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [chain, symbol, amount] if !chain.is_empty() && !symbol.is_empty() => {
                Ok(PaymentSpec {
                    chain: chain.to_string(),
                    symbol: symbol.to_string(),
                    amount: amount.to_string(),
                })
            }
            _ => Err(AppError::InvalidPayment(s.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    config: Config,
    store: FileStore,
    merchant: MerchantConfig,
}

impl AppState {
    pub fn load(config: Config) -> Result<Self, AppError> {
        let store = FileStore::new(config.data_dir());
        let merchant = store.load_merchant_config()?;
        Ok(AppState {
            config,
            store,
            merchant,
        })
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.store.save_merchant_config(&self.merchant)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn merchant(&self) -> &MerchantConfig {
        &self.merchant
    }

    pub fn set_currency(&mut self, code: &str) -> Result<(), AppError> {
        let code = code.trim().to_ascii_uppercase();
        // Same rule the order builder applies.
        OrderBuilder::new(FiatAmount::parse("1")?, &code)?;
        self.merchant.fiat_currency = code;
        Ok(())
    }

    /// Adds or replaces an accepted chain after checking the recipient and token symbols.
    pub fn upsert_chain(
        &mut self,
        name: &str,
        address: &str,
        tokens: &[String],
    ) -> Result<(), AppError> {
        let network =
            network_by_name(name).ok_or_else(|| AppError::UnknownNetwork(name.to_string()))?;
        let address = address.trim();
        if !is_valid_recipient(network, address) {
            return Err(AppError::InvalidRecipient {
                network: network.name.to_string(),
                address: address.to_string(),
            });
        }
        let mut symbols: Vec<String> = Vec::with_capacity(tokens.len());
        for symbol in tokens {
            let resolved = find_token(network, symbol.trim()).ok_or_else(|| AppError::UnknownToken {
                network: network.name.to_string(),
                symbol: symbol.to_string(),
            })?;
            let symbol = resolved.into_metadata().symbol;
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
        let entry = MerchantChain {
            name: network.name.to_string(),
            address: address.to_string(),
            tokens: symbols,
        };
        match self.merchant.chains.iter_mut().find(|c| c.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.merchant.chains.push(entry),
        }
        Ok(())
    }

    pub fn remove_chain(&mut self, name: &str) -> Result<(), AppError> {
        let before = self.merchant.chains.len();
        self.merchant
            .chains
            .retain(|c| !c.name.eq_ignore_ascii_case(name.trim()));
        if self.merchant.chains.len() == before {
            return Err(AppError::UnknownMerchantChain(name.to_string()));
        }
        Ok(())
    }

    /// Builds an order from the merchant config.
    ///
    /// Every chain named by a payment is included with all its configured tokens; tokens
    /// without a payment are listed with a zero amount.
    pub fn build_order(
        &self,
        fiat_amount: FiatAmount,
        currency: Option<&str>,
        payments: &[PaymentSpec],
    ) -> Result<Order, AppError> {
        let currency = currency.unwrap_or(&self.merchant.fiat_currency);
        let mut builder = OrderBuilder::new(fiat_amount, currency)?;

        let mut chains: Vec<&MerchantChain> = Vec::new();
        for payment in payments {
            let chain = self
                .merchant
                .chain(&payment.chain)
                .ok_or_else(|| AppError::ChainNotConfigured(payment.chain.clone()))?;
            if !chains.iter().any(|c| c.name == chain.name) {
                chains.push(chain);
            }
        }

        for chain in chains {
            builder = builder.chain(&chain.name, &chain.address)?;
            let mut listed: Vec<String> = Vec::new();
            for payment in payments.iter().filter(|p| p.chain.eq_ignore_ascii_case(&chain.name)) {
                builder = builder.token(&chain.name, &payment.symbol, &payment.amount)?;
                listed.push(payment.symbol.to_ascii_uppercase());
            }
            for symbol in &chain.tokens {
                if !listed.contains(&symbol.to_ascii_uppercase()) {
                    builder = builder.token(&chain.name, symbol, "0")?;
                }
            }
        }
        Ok(builder.build()?)
    }
}
