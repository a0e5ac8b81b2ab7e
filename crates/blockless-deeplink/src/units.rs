//! Conversion between human-readable token amounts and on-chain integer units.

use alloy_primitives::U256;
use blockless_types::validation::Amount;

/// An amount scaled to a token's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseUnits {
    pub value: U256,
    /// Set when fractional digits beyond the token's decimals were dropped.
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    #[error("Amount {amount} does not fit into 256 bits with {decimals} decimals")]
    Overflow { amount: String, decimals: u8 },
}

/// Scales `amount` by `10^decimals`.
///
/// Works on the decimal digits directly. Fractional digits beyond `decimals` are floored
/// away and reported through [`BaseUnits::truncated`].
///
/// ```
/// use blockless_deeplink::units::to_base_units;
///
/// let amount = "10.50".parse().unwrap();
/// let units = to_base_units(&amount, 6).unwrap();
/// assert_eq!(units.value.to_string(), "10500000");
/// assert!(!units.truncated);
/// ```
pub fn to_base_units(amount: &Amount, decimals: u8) -> Result<BaseUnits, UnitsError> {
    let (integer, fraction) = amount.split();
    let decimals_len = decimals as usize;
    let (kept, dropped) = fraction.split_at(fraction.len().min(decimals_len));
    let truncated = dropped.bytes().any(|b| b != b'0');

    let mut digits = String::with_capacity(integer.len() + decimals_len);
    digits.push_str(integer);
    digits.push_str(kept);
    digits.extend(std::iter::repeat_n('0', decimals_len - kept.len()));

    // `Amount` only holds ASCII digits, so parsing can only fail by exceeding 256 bits.
    let value = U256::from_str_radix(&digits, 10).map_err(|_| UnitsError::Overflow {
        amount: amount.to_string(),
        decimals,
    })?;
    Ok(BaseUnits { value, truncated })
}

/// Formats integer units back into a decimal string without trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}
