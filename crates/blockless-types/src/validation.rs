//! Format validators for the raw strings that make up a payment request.
//!
//! Each validator turns an untrusted string into a typed value or a
//! [`ValidationError`] naming the offending [`Field`] and the raw input.
//! Validators are purely syntactic: a [`ChainName`] that passes here may still be
//! unknown to the [network registry](crate::networks).
//!
//! | Validator | Grammar |
//! |-----------|---------|
//! | [`validate_address`] | `^0x[a-fA-F0-9]{40}$` |
//! | [`validate_token_symbol`] | `^[A-Z0-9]{2,15}$` |
//! | [`validate_amount`] | `^[0-9]+(\.[0-9]+)?$` and strictly positive |
//! | [`validate_blockchain_name`] | `^[a-zA-Z0-9 _-]{1,30}$` |
//!
//! # Example
//!
//! ```
//! use blockless_types::validation::{validate_amount, ValidationError, Field};
//!
//! let amount = validate_amount("1.50").unwrap();
//! assert_eq!(amount.as_str(), "1.50");
//!
//! let err = validate_amount("0").unwrap_err();
//! assert_eq!(err.field(), Field::Amount);
//! ```

use alloy_primitives::Address;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("valid address regex"));
static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{2,15}$").expect("valid symbol regex"));
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("valid amount regex"));
static CHAIN_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9 _-]{1,30}$").expect("valid chain name regex"));

/// The payment request field a validator was checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Blockchain,
    Amount,
    Token,
    TokenSymbol,
    Address,
    DestinationAddress,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Blockchain => "blockchain",
            Field::Amount => "amount",
            Field::Token => "token",
            Field::TokenSymbol => "tokenSymbol",
            Field::Address => "address",
            Field::DestinationAddress => "destinationAddress",
        };
        f.write_str(name)
    }
}

/// A rejected raw value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The value does not match the field grammar.
    #[error("Invalid {field} format: {raw:?}")]
    InvalidFormat { field: Field, raw: String },
    /// The value is well-formed but not strictly positive.
    #[error("Invalid {field}: {raw:?} must be greater than zero")]
    NotPositive { field: Field, raw: String },
}

impl ValidationError {
    pub fn invalid_format<S: Into<String>>(field: Field, raw: S) -> Self {
        ValidationError::InvalidFormat {
            field,
            raw: raw.into(),
        }
    }

    /// The field that failed validation.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::InvalidFormat { field, .. } => *field,
            ValidationError::NotPositive { field, .. } => *field,
        }
    }

    /// The raw input that was rejected.
    pub fn raw(&self) -> &str {
        match self {
            ValidationError::InvalidFormat { raw, .. } => raw,
            ValidationError::NotPositive { raw, .. } => raw,
        }
    }

    /// Re-labels the error with the field it was validated for.
    ///
    /// [`validate_address`] reports [`Field::Address`]; a recipient check re-labels it
    /// as [`Field::DestinationAddress`].
    pub fn for_field(self, field: Field) -> Self {
        match self {
            ValidationError::InvalidFormat { raw, .. } => ValidationError::InvalidFormat { field, raw },
            ValidationError::NotPositive { raw, .. } => ValidationError::NotPositive { field, raw },
        }
    }
}

/// An EVM address that passed the `0x` + 40 hex digits grammar.
///
/// Displays and serializes with EIP-55 checksum casing; equality ignores the casing
/// of the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvmAddress(pub Address);

impl EvmAddress {
    pub fn inner(&self) -> Address {
        self.0
    }

    /// Lowercase hex form, used for registry keys.
    pub fn to_lowercase_hex(&self) -> String {
        format!("{:#x}", self.0)
    }
}

impl Display for EvmAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_checksum(None))
    }
}

impl FromStr for EvmAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_address(s)
    }
}

impl From<Address> for EvmAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl Serialize for EvmAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EvmAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        validate_address(&s).map_err(serde::de::Error::custom)
    }
}

/// Declares a validated string newtype with `Display`, `FromStr` and serde support.
macro_rules! validated_string {
    ($(#[$meta:meta])* $name:ident, $validator:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $validator(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                $validator(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

validated_string!(
    /// An uppercase token ticker such as `USDC` or `ETH`.
    TokenSymbol,
    validate_token_symbol
);

validated_string!(
    /// A strictly positive decimal amount, kept exactly as typed.
    ///
    /// No floating point is involved: the digits are preserved so that
    /// [base-unit scaling](Amount::split) can be done exactly.
    Amount,
    validate_amount
);

validated_string!(
    /// A syntactically valid blockchain name such as `ethereum` or `base`.
    ChainName,
    validate_blockchain_name
);

impl Amount {
    /// Splits the amount into its integer and fractional digit strings.
    ///
    /// The fractional part is empty for whole numbers.
    pub fn split(&self) -> (&str, &str) {
        match self.0.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (self.0.as_str(), ""),
        }
    }
}

/// Validates an EVM address (`^0x[a-fA-F0-9]{40}$`).
pub fn validate_address(s: &str) -> Result<EvmAddress, ValidationError> {
    if !ADDRESS_RE.is_match(s) {
        return Err(ValidationError::invalid_format(Field::Address, s));
    }
    let address =
        Address::from_str(s).map_err(|_| ValidationError::invalid_format(Field::Address, s))?;
    Ok(EvmAddress(address))
}

/// Validates a token ticker (`^[A-Z0-9]{2,15}$`).
pub fn validate_token_symbol(s: &str) -> Result<TokenSymbol, ValidationError> {
    if SYMBOL_RE.is_match(s) {
        Ok(TokenSymbol(s.to_string()))
    } else {
        Err(ValidationError::invalid_format(Field::TokenSymbol, s))
    }
}

/// Validates a decimal amount (`^[0-9]+(\.[0-9]+)?$`) that must be greater than zero.
///
/// Only ASCII digits are accepted.
///
/// Scientific notation, signs and empty fractions are rejected. The number of
/// fractional digits is not bounded here.
pub fn validate_amount(s: &str) -> Result<Amount, ValidationError> {
    if !AMOUNT_RE.is_match(s) {
        return Err(ValidationError::invalid_format(Field::Amount, s));
    }
    if !s.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        return Err(ValidationError::NotPositive {
            field: Field::Amount,
            raw: s.to_string(),
        });
    }
    Ok(Amount(s.to_string()))
}

/// Validates a blockchain name (`^[a-zA-Z0-9 _-]{1,30}$`).
pub fn validate_blockchain_name(s: &str) -> Result<ChainName, ValidationError> {
    if CHAIN_NAME_RE.is_match(s) {
        Ok(ChainName(s.to_string()))
    } else {
        Err(ValidationError::invalid_format(Field::Blockchain, s))
    }
}

/// Returns true if `s` matches the EVM address grammar.
pub fn is_evm_address(s: &str) -> bool {
    ADDRESS_RE.is_match(s)
}

/// Returns true if `s` decodes from base58 to a 32-byte Solana public key.
pub fn is_solana_address(s: &str) -> bool {
    (32..=44).contains(&s.len())
        && bs58::decode(s)
            .into_vec()
            .map(|bytes| bytes.len() == 32)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[test]
    fn test_validate_address_ok() {
        let address = validate_address(ADDR).unwrap();
        assert_eq!(address.to_string(), ADDR);
    }

    #[test]
    fn test_validate_address_lowercase_equals_checksummed() {
        let lower = validate_address(&ADDR.to_lowercase()).unwrap();
        let mixed = validate_address(ADDR).unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(lower.to_lowercase_hex(), ADDR.to_lowercase());
    }

    #[test]
    fn test_validate_address_rejects_bad_input() {
        let too_long = format!("{ADDR}00");
        for input in [
            "",
            "0x",
            "d8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "0xZZ",
            too_long.as_str(),
        ] {
            let err = validate_address(input).unwrap_err();
            assert_eq!(err.field(), Field::Address);
            assert_eq!(err.raw(), input);
        }
    }

    #[test]
    fn test_validate_token_symbol() {
        assert!(validate_token_symbol("USDC").is_ok());
        assert!(validate_token_symbol("1INCH").is_ok());
        assert!(validate_token_symbol("E").is_err());
        assert!(validate_token_symbol("usdc").is_err());
        assert!(validate_token_symbol("ABCDEFGHIJKLMNOP").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount("10").unwrap().split(), ("10", ""));
        assert_eq!(validate_amount("0.000001").unwrap().split(), ("0", "000001"));
        assert!(matches!(
            validate_amount("-1"),
            Err(ValidationError::InvalidFormat { field: Field::Amount, .. })
        ));
        assert!(matches!(
            validate_amount("1e18"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_amount("1."),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_amount("0.000"),
            Err(ValidationError::NotPositive { field: Field::Amount, .. })
        ));
    }

    #[test]
    fn test_validate_amount_rejects_non_ascii_digits() {
        // ARABIC-INDIC DIGIT FIVE and ONE
        for input in ["1\u{0665}", "\u{0661}", "0.\u{0665}"] {
            assert!(matches!(
                validate_amount(input),
                Err(ValidationError::InvalidFormat { field: Field::Amount, .. })
            ));
        }
    }

    #[test]
    fn test_validate_amount_unbounded_precision() {
        let raw = "1.1234567890123456789012345678901234567890";
        assert_eq!(validate_amount(raw).unwrap().as_str(), raw);
    }

    #[test]
    fn test_validate_blockchain_name() {
        assert!(validate_blockchain_name("ethereum").is_ok());
        assert!(validate_blockchain_name("BNB Smart_Chain-1").is_ok());
        assert!(validate_blockchain_name("").is_err());
        assert!(validate_blockchain_name("eth:main").is_err());
        assert!(validate_blockchain_name(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_for_field_relabels() {
        let err = validate_address("nope").unwrap_err().for_field(Field::DestinationAddress);
        assert_eq!(err.field(), Field::DestinationAddress);
        assert_eq!(err.to_string(), "Invalid destinationAddress format: \"nope\"");
    }

    #[test]
    fn test_solana_address() {
        assert!(is_solana_address("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"));
        assert!(is_solana_address("So11111111111111111111111111111111111111112"));
        assert!(!is_solana_address(ADDR));
        assert!(!is_solana_address("0OIl"));
    }

    #[test]
    fn test_serde_roundtrip_rejects_invalid() {
        let symbol: TokenSymbol = serde_json::from_str("\"USDT\"").unwrap();
        assert_eq!(symbol.as_str(), "USDT");
        assert!(serde_json::from_str::<TokenSymbol>("\"usdt\"").is_err());
        let address: EvmAddress = serde_json::from_str(&format!("\"{}\"", ADDR.to_lowercase())).unwrap();
        assert_eq!(serde_json::to_string(&address).unwrap(), format!("\"{ADDR}\""));
    }
}
