//! Single-leg swap intents and the `/swap` query string.
//!
//! A swap intent says "pay `amount` of `token` on `blockchain` to `destination_address`".
//! In a URL it is one query value made of four colon-separated fields:
//!
//! ```text
//! /swap?dst=<chain>:<amount>:<token>:<address>[&dst=...][&src=<chain>:<amount>:<token>:<address>]
//! ```
//!
//! `dst` may repeat and at least one is required; `src` is optional.
//! None of the four field grammars admits a `:`, so splitting on it is unambiguous.
//!
//! # Example
//!
//! ```
//! use blockless_types::intent::{SwapIntent, SwapParams};
//!
//! let params = SwapParams::from_query(
//!     "dst=base:12.5:USDC:0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
//! ).unwrap();
//! assert_eq!(params.dst.len(), 1);
//! assert_eq!(params.dst[0].amount.as_str(), "12.5");
//!
//! let leg: SwapIntent = "base:1:ETH:0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse().unwrap();
//! assert_eq!(leg.blockchain.as_str(), "base");
//! ```

use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use url::form_urlencoded;

use crate::validation::{
    Amount, ChainName, EvmAddress, Field, TokenSymbol, ValidationError, validate_address,
    validate_amount, validate_blockchain_name, validate_token_symbol,
};

/// Path of the swap page the query string is appended to.
pub const SWAP_PATH: &str = "/swap";

/// Query key of a destination leg.
pub const DST_KEY: &str = "dst";
/// Query key of the optional source leg.
pub const SRC_KEY: &str = "src";

/// The token of a swap leg: a contract address or a ticker, never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenRef {
    Address(EvmAddress),
    Symbol(TokenSymbol),
}

impl TokenRef {
    /// Parses the token field: address grammar first, then symbol grammar.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if let Ok(address) = validate_address(raw) {
            return Ok(TokenRef::Address(address));
        }
        validate_token_symbol(raw)
            .map(TokenRef::Symbol)
            .map_err(|_| ValidationError::invalid_format(Field::Token, raw))
    }

    pub fn address(&self) -> Option<&EvmAddress> {
        match self {
            TokenRef::Address(address) => Some(address),
            TokenRef::Symbol(_) => None,
        }
    }

    pub fn symbol(&self) -> Option<&TokenSymbol> {
        match self {
            TokenRef::Symbol(symbol) => Some(symbol),
            TokenRef::Address(_) => None,
        }
    }
}

impl Display for TokenRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TokenRef::Address(address) => Display::fmt(address, f),
            TokenRef::Symbol(symbol) => Display::fmt(symbol, f),
        }
    }
}

impl Serialize for TokenRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// One validated leg of a payment request.
///
/// Instances only exist in a valid state: every constructor runs all four validators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapIntent {
    pub blockchain: ChainName,
    pub amount: Amount,
    pub token: TokenRef,
    pub destination_address: EvmAddress,
}

/// Error returned when a single `chain:amount:token:address` value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapIntentError {
    /// The value did not split into exactly four fields.
    #[error("Malformed swap intent {raw:?}: expected <chain>:<amount>:<token>:<address>")]
    Malformed { raw: String },
    /// The token field is neither an address nor a symbol.
    #[error("Invalid token in swap intent {raw:?}: {token:?} is neither an address nor a symbol")]
    InvalidToken { raw: String, token: String },
    /// A field failed its validator; the first failing field is reported.
    #[error("Invalid swap intent {raw:?}: {source}")]
    InvalidField {
        raw: String,
        field: Field,
        #[source]
        source: ValidationError,
    },
}

impl SwapIntentError {
    /// The full raw value that failed to parse.
    pub fn raw(&self) -> &str {
        match self {
            SwapIntentError::Malformed { raw } => raw,
            SwapIntentError::InvalidToken { raw, .. } => raw,
            SwapIntentError::InvalidField { raw, .. } => raw,
        }
    }
}

impl SwapIntent {
    /// Builds an intent from already split raw fields.
    ///
    /// Fields are validated in order: blockchain, amount, token, destination address.
    pub fn new(
        blockchain: &str,
        amount: &str,
        token: &str,
        destination_address: &str,
    ) -> Result<Self, ValidationError> {
        let blockchain = validate_blockchain_name(blockchain)?;
        let amount = validate_amount(amount)?;
        let token = TokenRef::parse(token)?;
        let destination_address =
            validate_address(destination_address).map_err(|e| e.for_field(Field::DestinationAddress))?;
        Ok(SwapIntent {
            blockchain,
            amount,
            token,
            destination_address,
        })
    }

    /// Parses one `chain:amount:token:address` value.
    pub fn parse(raw: &str) -> Result<Self, SwapIntentError> {
        let parts: Vec<&str> = raw.split(':').collect();
        let [blockchain, amount, token, address] = parts.as_slice() else {
            return Err(SwapIntentError::Malformed {
                raw: raw.to_string(),
            });
        };
        SwapIntent::new(blockchain, amount, token, address).map_err(|source| match source.field() {
            Field::Token => SwapIntentError::InvalidToken {
                raw: raw.to_string(),
                token: token.to_string(),
            },
            field => SwapIntentError::InvalidField {
                raw: raw.to_string(),
                field,
                source,
            },
        })
    }

    /// Query-string form of the intent, each field form-urlencoded.
    pub fn to_query_value(&self) -> String {
        let token = self.token.to_string();
        let destination = self.destination_address.to_string();
        [
            self.blockchain.as_str(),
            self.amount.as_str(),
            token.as_str(),
            destination.as_str(),
        ]
        .iter()
        .map(|part| form_urlencoded::byte_serialize(part.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
    }
}

impl Display for SwapIntent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.blockchain, self.amount, self.token, self.destination_address
        )
    }
}

impl FromStr for SwapIntent {
    type Err = SwapIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SwapIntent::parse(s)
    }
}

/// All legs of a `/swap` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapParams {
    pub dst: Vec<SwapIntent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<SwapIntent>,
}

/// Error returned when a `/swap` query cannot be turned into [`SwapParams`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapParamsError {
    #[error("Missing required 'dst' parameter")]
    MissingDst,
    #[error(transparent)]
    Intent(#[from] SwapIntentError),
}

impl SwapParams {
    /// Reads `dst` and `src` from decoded query pairs.
    ///
    /// Every `dst` is parsed in order and the first failure aborts. Only the first `src`
    /// is read.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SwapParamsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut dst = Vec::new();
        let mut src = None;
        for (key, value) in pairs {
            match key.as_ref() {
                DST_KEY => dst.push(SwapIntent::parse(value.as_ref())?),
                SRC_KEY if src.is_none() => src = Some(SwapIntent::parse(value.as_ref())?),
                _ => {}
            }
        }
        if dst.is_empty() {
            return Err(SwapParamsError::MissingDst);
        }
        Ok(SwapParams { dst, src })
    }

    /// Parses a raw query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Result<Self, SwapParamsError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        SwapParams::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    /// Encodes the legs back into a query string (without `?`).
    pub fn to_query(&self) -> String {
        let dst = self
            .dst
            .iter()
            .map(|leg| format!("{DST_KEY}={}", leg.to_query_value()));
        let src = self
            .src
            .iter()
            .map(|leg| format!("{SRC_KEY}={}", leg.to_query_value()));
        dst.chain(src).collect::<Vec<_>>().join("&")
    }

    /// Relative swap link, `/swap?dst=...`.
    pub fn to_path(&self) -> String {
        format!("{SWAP_PATH}?{}", self.to_query())
    }
}

/// Outcome of a parse that must not propagate an error, e.g. to render an error banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafeParse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T, E: Display> From<Result<T, E>> for SafeParse<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => SafeParse {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => SafeParse {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Parses a `/swap` query without returning an error.
pub fn safe_parse_swap_params(query: &str) -> SafeParse<SwapParams> {
    SwapParams::from_query(query).into()
}
