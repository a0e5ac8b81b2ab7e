//! Blockless Swap command line entrypoint.
//!
//! Builds and reads payment links:
//! - `swap encode|decode`: `/swap?dst=<chain>:<amount>:<token>:<address>` links
//! - `order create|show`: multi-chain merchant orders in `/order?id=<blob>` links
//! - `merchant ...`: accepted chains, recipients and tokens
//! - `deeplinks`: wallet URIs for one transfer
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `CONFIG`, `BASE_URL`, `DATA_DIR` control configuration
//! - `RUST_LOG` controls log output on stderr

use std::process;

use blockless_swap::run::run;

fn main() {
    let result = run();
    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1)
    }
}
