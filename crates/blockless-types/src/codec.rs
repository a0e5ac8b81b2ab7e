//! Compact order blobs for shareable `/order` links.
//!
//! A [`SerializedOrder`] is JSON-stringified, then Base64-encoded, and carried in a single
//! query parameter:
//!
//! ```text
//! /order?id=<base64(JSON(SerializedOrder))>
//! /order?order=<base64(JSON(SerializedOrder))>
//! ```
//!
//! Both keys decode identically. This leg performs no lossy projection, so
//! `decode_from_url_param(&encode_to_url_param(&s)?)? == s` for every blob.
//!
//! Blobs carry a schema version under `v`. Blobs without it predate versioning and are
//! read as version 1; blobs from a newer schema are rejected instead of being decoded
//! into wrong fields.

use serde::{Deserialize, Deserializer, Serialize};
use url::form_urlencoded;

use crate::tokens::TokenInfo;
use crate::util::{Base64Bytes, FiatAmount};
use crate::validation::{Amount, validate_amount};

/// Path of the order page.
pub const ORDER_PATH: &str = "/order";

/// Schema version written into new blobs.
pub const ORDER_BLOB_VERSION: u32 = 1;

/// Query key that carries an order blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderQueryKey {
    #[default]
    Id,
    Order,
}

impl OrderQueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderQueryKey::Id => "id",
            OrderQueryKey::Order => "order",
        }
    }
}

/// A token amount inside an order: a decimal string that may be zero.
///
/// Accepts JSON strings and JSON numbers; always written back as a string. Amounts that do
/// not satisfy the positive amount grammar are carried as-is and treated as not payable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TokenAmount(String);

impl TokenAmount {
    pub fn new<S: Into<String>>(raw: S) -> Self {
        TokenAmount(raw.into())
    }

    pub fn zero() -> Self {
        TokenAmount("0".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The amount as a validated positive [`Amount`], if it is one.
    pub fn positive(&self) -> Option<Amount> {
        validate_amount(&self.0).ok()
    }

    pub fn is_positive(&self) -> bool {
        self.positive().is_some()
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum TokenAmountWire {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match TokenAmountWire::deserialize(deserializer)? {
            TokenAmountWire::Text(text) => TokenAmount(text),
            TokenAmountWire::Number(number) => TokenAmount(number.to_string()),
        })
    }
}

/// Minimized projection of an order, as carried in links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedOrder {
    #[serde(rename = "v", default = "legacy_version")]
    pub version: u32,
    pub fiat_amount: FiatAmount,
    pub fiat_currency: String,
    pub chains: Vec<SerializedChain>,
}

fn legacy_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedChain {
    pub name: String,
    pub chain_id: u64,
    pub address: String,
    pub tokens: Vec<SerializedToken>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedToken {
    pub symbol: String,
    pub amount: TokenAmount,
    pub info: TokenInfo,
}

/// Error returned when an order blob cannot be decoded.
///
/// Every variant reads as "Invalid order data in URL" to the payer.
#[derive(Debug, thiserror::Error)]
pub enum OrderDataError {
    #[error("Invalid order data in URL: not valid base64 ({0})")]
    Base64(#[from] base64::DecodeError),
    #[error("Invalid order data in URL: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid order data in URL: unsupported order version {0}")]
    UnsupportedVersion(u32),
    #[error("Invalid order data in URL: missing 'id' or 'order' parameter")]
    MissingParam,
}

/// JSON-stringifies and Base64-encodes an order blob.
pub fn encode_to_url_param(order: &SerializedOrder) -> Result<String, OrderDataError> {
    let json = serde_json::to_vec(order)?;
    Ok(Base64Bytes::encode(json).to_string())
}

/// Base64-decodes and JSON-parses an order blob.
///
/// A `+` that a query parser turned into a space is restored first.
pub fn decode_from_url_param(param: &str) -> Result<SerializedOrder, OrderDataError> {
    let restored = param.trim().replace(' ', "+");
    let json = Base64Bytes::from(restored.as_str()).decode()?;
    let order: SerializedOrder = serde_json::from_slice(&json)?;
    if order.version > ORDER_BLOB_VERSION {
        return Err(OrderDataError::UnsupportedVersion(order.version));
    }
    Ok(order)
}

/// Relative order link, `/order?<key>=<blob>`, with the blob percent-encoded.
pub fn order_link(order: &SerializedOrder, key: OrderQueryKey) -> Result<String, OrderDataError> {
    let blob = encode_to_url_param(order)?;
    let encoded: String = form_urlencoded::byte_serialize(blob.as_bytes()).collect();
    Ok(format!("{ORDER_PATH}?{}={encoded}", key.as_str()))
}

/// Extracts the order blob from a query string, preferring `id` over `order`.
pub fn order_param_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut fallback = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "id" => return Some(value.into_owned()),
            "order" if fallback.is_none() => fallback = Some(value.into_owned()),
            _ => {}
        }
    }
    fallback
}

/// Decodes the order blob found in a query string.
pub fn decode_order_query(query: &str) -> Result<SerializedOrder, OrderDataError> {
    let param = order_param_from_query(query).ok_or(OrderDataError::MissingParam)?;
    decode_from_url_param(&param)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SerializedOrder {
        SerializedOrder {
            version: ORDER_BLOB_VERSION,
            fiat_amount: FiatAmount::parse("25.5").unwrap(),
            fiat_currency: "USD".into(),
            chains: vec![SerializedChain {
                name: "base".into(),
                chain_id: 8453,
                address: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into(),
                tokens: vec![
                    SerializedToken {
                        symbol: "USDC".into(),
                        amount: TokenAmount::new("25.5"),
                        info: TokenInfo {
                            symbol: "USDC".into(),
                            address: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".into(),
                            decimals: 6,
                            chain_id: 8453,
                        },
                    },
                    SerializedToken {
                        symbol: "ETH".into(),
                        amount: TokenAmount::zero(),
                        info: TokenInfo {
                            symbol: "ETH".into(),
                            address: "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE".into(),
                            decimals: 18,
                            chain_id: 8453,
                        },
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_encode_decode_is_exact() {
        let order = sample();
        let param = encode_to_url_param(&order).unwrap();
        assert_eq!(decode_from_url_param(&param).unwrap(), order);
    }

    #[test]
    fn test_encode_decode_keeps_fiat_precision() {
        for fiat in ["123456789.123456789", "0.07", "98765432.1234"] {
            let mut order = sample();
            order.fiat_amount = FiatAmount::parse(fiat).unwrap();
            let param = encode_to_url_param(&order).unwrap();
            assert_eq!(decode_from_url_param(&param).unwrap(), order);
        }
    }

    #[test]
    fn test_blob_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["v"], 1);
        assert_eq!(json["fiatAmount"], 25.5);
        assert_eq!(json["chains"][0]["chainId"], 8453);
        assert_eq!(json["chains"][0]["tokens"][0]["amount"], "25.5");
        assert_eq!(json["chains"][0]["tokens"][0]["info"]["decimals"], 6);
        assert!(json["chains"][0]["tokens"][0]["info"].get("logoURI").is_none());
    }

    #[test]
    fn test_legacy_blob_without_version_and_numeric_amount() {
        let legacy = r#"{"fiatAmount":10,"fiatCurrency":"EUR","chains":[{"name":"polygon","chainId":137,"address":"0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045","tokens":[{"symbol":"POL","amount":12.75,"info":{"symbol":"POL","address":"0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE","decimals":18,"chainId":137}}]}]}"#;
        let param = Base64Bytes::encode(legacy).to_string();
        let order = decode_from_url_param(&param).unwrap();
        assert_eq!(order.version, 1);
        assert_eq!(order.chains[0].tokens[0].amount.as_str(), "12.75");
        assert!(order.chains[0].tokens[0].amount.is_positive());
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut order = sample();
        order.version = ORDER_BLOB_VERSION + 1;
        let param = encode_to_url_param(&order).unwrap();
        assert!(matches!(
            decode_from_url_param(&param),
            Err(OrderDataError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_invalid_data() {
        let err = decode_from_url_param("%%%").unwrap_err();
        assert!(matches!(err, OrderDataError::Base64(_)));
        assert!(err.to_string().starts_with("Invalid order data in URL"));

        let truncated = Base64Bytes::encode(r#"{"fiatAmount":10,"fiatCur"#).to_string();
        assert!(matches!(
            decode_from_url_param(&truncated),
            Err(OrderDataError::Json(_))
        ));

        let wrong_shape = Base64Bytes::encode(r#"{"hello":"world"}"#).to_string();
        assert!(matches!(
            decode_from_url_param(&wrong_shape),
            Err(OrderDataError::Json(_))
        ));
    }

    #[test]
    fn test_order_link_and_both_keys() {
        let order = sample();
        for key in [OrderQueryKey::Id, OrderQueryKey::Order] {
            let link = order_link(&order, key).unwrap();
            assert!(link.starts_with(&format!("/order?{}=", key.as_str())));
            let query = link.split_once('?').unwrap().1;
            assert_eq!(decode_order_query(query).unwrap(), order);
        }
    }

    #[test]
    fn test_plus_turned_into_space_is_restored() {
        let order = sample();
        let param = encode_to_url_param(&order).unwrap();
        let mangled = param.replace('+', " ");
        assert_eq!(decode_from_url_param(&mangled).unwrap(), order);
    }

    #[test]
    fn test_query_key_precedence() {
        assert_eq!(order_param_from_query("?order=b&id=a").as_deref(), Some("a"));
        assert_eq!(order_param_from_query("order=b").as_deref(), Some("b"));
        assert!(order_param_from_query("dst=x").is_none());
        assert!(matches!(
            decode_order_query("foo=bar"),
            Err(OrderDataError::MissingParam)
        ));
    }
}
