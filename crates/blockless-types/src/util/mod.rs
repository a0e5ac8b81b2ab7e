//! Helper types used throughout the crate.
//!
//! - [`b64`] - Base64 encoding/decoding of order blobs
//! - [`fiat_amount`] - Human-typed fiat amount parsing

pub mod b64;
pub mod fiat_amount;

pub use b64::*;
pub use fiat_amount::*;
