#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for Blockless Swap payment requests.
//!
//! A payer opens a link; the link describes what to pay, on which chain, to whom. This crate
//! holds everything needed to turn such a link into validated values and back, without any
//! network access.
//!
//! # Modules
//!
//! - [`validation`] - Field grammars for chain names, amounts, token symbols and addresses
//! - [`intent`] - Single-leg swap intents and the `/swap?dst=...` query format
//! - [`networks`] - Registry of known blockchain networks
//! - [`tokens`] - Token metadata, display categories and the native/stablecoin registries
//! - [`order`] - Multi-chain merchant orders, their builder and display ordering
//! - [`codec`] - Base64 order blobs carried in `/order?id=...` links
//! - [`util`] - Helper types (base64, fiat amounts)
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for rehydration and dropped swap legs

pub mod codec;
pub mod intent;
pub mod networks;
pub mod order;
pub mod tokens;
pub mod util;
pub mod validation;
