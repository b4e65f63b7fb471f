//! Signet CLI Entry Point
//!
//! This binary provides the command-line interface for Signet.

use std::process;

fn main() {
    if let Err(e) = signet_interface::run_cli() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
