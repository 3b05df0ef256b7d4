//! # Inventory Dashboard Entry Point
//!
//! ```text
//! inventory-dashboard [--config PATH] [--api-url URL] [--start PATH]
//! ```
//!
//! Reads commands from stdin and prints each screen as text. Logs go to
//! stderr; set `RUST_LOG` to change the level.

use clap::Parser;

use inventory_dashboard::Args;

#[tokio::main]
async fn main() {
    // Setup lives in lib.rs
    if let Err(err) = inventory_dashboard::run(Args::parse()).await {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
