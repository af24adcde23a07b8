// Author: Dustin Pilgrim
// License: MIT

mod app;
mod cli;
mod config;
mod core;
mod daemon;
mod log;
mod services;

use clap::Parser;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let args = cli::Args::parse();

    log::set_verbose(args.verbose);
    if args.no_color {
        log::set_use_colors(false);
    }

    match &args.command {
        Some(cli::Command::Run) | None => {}
        Some(cmd) => {
            return app::command::run(&args, cmd).map_err(|e| format!("{e:#}").into());
        }
    }

    let code = match app::run_mode::run(&args).await {
        Ok(()) => 0,
        Err(e) => {
            serror!("Idlestamp", "{:#}", e);
            1
        }
    };

    // the stdin reader may still be parked in a blocking read; don't wait on it
    std::process::exit(code);
}
