use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

/// The fiat value of a merchant order, as typed by a merchant.
/// Accepts strings like "$25.00", "1,000", "€20", or raw numbers.
///
/// Kept to [`FIAT_DECIMALS`] fractional digits and serialized as a JSON number. With at most
/// 13 significant digits the number survives an `f64` round trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FiatAmount(pub Decimal);

impl FiatAmount {
    pub fn inner(&self) -> Decimal {
        self.0
    }
}

/// Fractional digits kept; finer input is rounded half away from zero.
pub const FIAT_DECIMALS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FiatAmountParseError {
    #[error("Invalid number format")]
    InvalidFormat,
    #[error(
        "Fiat amount must be between {} and {}",
        fiat_amount::MIN_STR,
        fiat_amount::MAX_STR
    )]
    OutOfRange,
    #[error("Negative value is not allowed")]
    Negative,
}

mod fiat_amount {
    use super::*;

    pub const MIN_STR: &str = "0.01";
    pub const MAX_STR: &str = "999999999";

    pub static MIN: LazyLock<Decimal> =
        LazyLock::new(|| Decimal::from_str(MIN_STR).expect("valid decimal"));
    pub static MAX: LazyLock<Decimal> =
        LazyLock::new(|| Decimal::from_str(MAX_STR).expect("valid decimal"));
}

static NOT_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]+").expect("valid regex"));

impl FiatAmount {
    pub fn parse(input: &str) -> Result<Self, FiatAmountParseError> {
        // Strip currency signs, grouping separators and whitespace
        let cleaned = NOT_NUMERIC.replace_all(input, "");
        let parsed =
            Decimal::from_str(&cleaned).map_err(|_| FiatAmountParseError::InvalidFormat)?;
        Self::checked(parsed)
    }

    fn checked(value: Decimal) -> Result<Self, FiatAmountParseError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(FiatAmountParseError::Negative);
        }
        let value =
            value.round_dp_with_strategy(FIAT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
        if value < *fiat_amount::MIN || value > *fiat_amount::MAX {
            return Err(FiatAmountParseError::OutOfRange);
        }
        Ok(FiatAmount(value))
    }
}

impl FromStr for FiatAmount {
    type Err = FiatAmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FiatAmount::parse(s)
    }
}

impl TryFrom<f64> for FiatAmount {
    type Error = FiatAmountParseError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(FiatAmountParseError::InvalidFormat);
        }
        // Display gives the shortest decimal that maps back to the same f64
        let decimal =
            Decimal::from_str(&value.to_string()).map_err(|_| FiatAmountParseError::OutOfRange)?;
        Self::checked(decimal)
    }
}

impl Display for FiatAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Serialize for FiatAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value: f64 = self
            .0
            .normalize()
            .to_string()
            .parse()
            .map_err(<S::Error as serde::ser::Error>::custom)?;
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for FiatAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        FiatAmount::try_from(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_decorated() {
        assert_eq!(FiatAmount::parse("25").unwrap().to_string(), "25");
        assert_eq!(FiatAmount::parse("$25.00").unwrap().to_string(), "25");
        assert_eq!(FiatAmount::parse("1,000").unwrap().to_string(), "1000");
        assert_eq!(FiatAmount::parse("€ 20.5").unwrap().to_string(), "20.5");
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(FiatAmount::parse("abc"), Err(FiatAmountParseError::InvalidFormat));
        assert_eq!(FiatAmount::parse("-5"), Err(FiatAmountParseError::Negative));
        assert_eq!(FiatAmount::parse("0"), Err(FiatAmountParseError::OutOfRange));
        assert_eq!(FiatAmount::parse("0.001"), Err(FiatAmountParseError::OutOfRange));
        assert_eq!(
            FiatAmount::parse("1000000000"),
            Err(FiatAmountParseError::OutOfRange)
        );
    }

    #[test]
    fn test_json_number() {
        let amount = FiatAmount::parse("19.99").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "19.99");
        let back: FiatAmount = serde_json::from_str("19.99").unwrap();
        assert_eq!(back, amount);
        assert!(serde_json::from_str::<FiatAmount>("-1").is_err());
    }

    #[test]
    fn test_precision_is_bounded() {
        let amount = FiatAmount::parse("123456789.123456789").unwrap();
        assert_eq!(amount.to_string(), "123456789.1235");
        assert_eq!(FiatAmount::parse("0.00995").unwrap().to_string(), "0.01");
    }

    #[test]
    fn test_json_number_is_exact() {
        for input in ["123456789.123456789", "98765432.1234", "0.07", "1234.5678"] {
            let amount = FiatAmount::parse(input).unwrap();
            let json = serde_json::to_string(&amount).unwrap();
            assert_eq!(json, amount.to_string());
            let back: FiatAmount = serde_json::from_str(&json).unwrap();
            assert_eq!(back, amount);
        }
    }

    #[test]
    fn test_try_from_f64() {
        assert_eq!(FiatAmount::try_from(12.5).unwrap().to_string(), "12.5");
        assert!(FiatAmount::try_from(f64::NAN).is_err());
    }
}
