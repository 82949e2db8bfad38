//! Mirrorsync CLI entry point.

use clap::Parser;
use std::process::ExitCode;

use mirrorsync::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match mirrorsync::cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            mirrorsync::cli::handle_error(&err);
            ExitCode::FAILURE
        }
    }
}
