//! Base64 encoding and decoding for order blobs.
//!
//! Links travel through messengers, QR scanners and copy-paste, so decoding is lenient:
//! the standard and URL-safe alphabets are both accepted, with or without padding.
//! Encoding always produces the padded standard alphabet.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use std::borrow::Cow;
use std::fmt::Display;

/// Bytes holding base64 text.
///
/// # Example
///
/// ```rust
/// use blockless_types::util::Base64Bytes;
///
/// let encoded = Base64Bytes::encode(b"{\"v\":1}");
/// assert_eq!(encoded.to_string(), "eyJ2IjoxfQ==");
///
/// let unpadded = Base64Bytes::from("eyJ2IjoxfQ");
/// assert_eq!(unpadded.decode().unwrap(), b"{\"v\":1}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Bytes<'a>(pub Cow<'a, [u8]>);

impl Base64Bytes<'_> {
    /// Decodes the base64 text, trying the standard then the URL-safe alphabet.
    ///
    /// # Errors
    ///
    /// Returns the standard-alphabet error if no alphabet accepts the input.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let trimmed = self.0.trim_ascii();
        let is_url_safe = trimmed.iter().any(|b| matches!(b, b'-' | b'_'));
        let padded = trimmed.ends_with(b"=");
        let engine = match (is_url_safe, padded) {
            (false, true) => &STANDARD,
            (false, false) => &STANDARD_NO_PAD,
            (true, true) => &URL_SAFE,
            (true, false) => &URL_SAFE_NO_PAD,
        };
        engine.decode(trimmed)
    }

    /// Encodes raw bytes into padded standard base64.
    pub fn encode<T: AsRef<[u8]>>(input: T) -> Base64Bytes<'static> {
        let encoded = STANDARD.encode(input.as_ref());
        Base64Bytes(Cow::Owned(encoded.into_bytes()))
    }
}

impl AsRef<[u8]> for Base64Bytes<'_> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<'a> From<&'a [u8]> for Base64Bytes<'a> {
    fn from(slice: &'a [u8]) -> Self {
        Base64Bytes(Cow::Borrowed(slice))
    }
}

impl<'a> From<&'a str> for Base64Bytes<'a> {
    fn from(s: &'a str) -> Self {
        Base64Bytes(Cow::Borrowed(s.as_bytes()))
    }
}

impl Display for Base64Bytes<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.0.as_ref()))
    }
}
