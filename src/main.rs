//! Reqlock CLI - pin Python packages with hashes
//!
//! Entry point for the reqlock command-line application.

use clap::Parser;

use reqlock::cli::output::{display_error, init_tracing};
use reqlock::cli::{exit_code, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Run the command and handle errors
    if let Err(e) = cli.run().await {
        display_error(&e);
        std::process::exit(exit_code(&e));
    }
}
