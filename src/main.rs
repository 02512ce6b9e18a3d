//! assetref - find where stylesheets, scripts, images, templates and
//! layouts of a Rails-style project are referenced
//!
//! assetref provides:
//! - One finder per asset kind, chosen from the target's path
//! - Helper call, HTML tag, CSS and render call recognition
//! - Implicit and explicit layout bindings
//! - Output as lines/files/count/total/jsonl/json/md

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod backends;
mod cli;
mod core;
mod finders;

use cli::ExitStatus;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let ansi = !cli.no_color && std::io::stderr().is_terminal();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_filter().into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(ansi)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli::run(cli) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
