//! Blockless Swap: shareable multi-chain payment links.
//!
//! This crate is the `blockless` command line tool. The link formats, order model and
//! registries live in [`blockless_types`]; wallet deeplinks in [`blockless_deeplink`].
//!
//! # Modules
//!
//! - [`cli`] - Command line arguments
//! - [`config`] - JSON configuration with environment fallbacks
//! - [`run`] - Command dispatch
//! - [`state`] - Merchant state loaded at start and saved after changes
//! - [`store`] - File-backed persistence of merchant config and session orders
//! - [`telemetry`] - Log subscriber setup

pub mod cli;
pub mod config;
pub mod run;
pub mod state;
pub mod store;
pub mod telemetry;
