//! PMSL command-line compiler
//!
//! Checks, formats and generates code for PMSL workflow files.

use pmsl_core::cli;

fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
