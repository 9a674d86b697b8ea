//! # Resimix CLI
//!
//! One-shot `calc`, `export` and `presets` commands, plus a line-oriented
//! interactive session (the default when no subcommand is given).
//!
//! Logging goes to stderr through `tracing-subscriber`. `RUST_LOG` is
//! respected; `-v` raises the default level to debug.

mod cli;
mod commands;
mod render;
mod repl;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use calc_core::settings::CalcSettings;

use cli::{Cli, Commands};
use repl::Repl;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    debug!("resimix v{}", env!("CARGO_PKG_VERSION"));

    let settings = CalcSettings::load_or_default(cli.config.as_deref()).context("failed to load settings")?;
    let mut bench = commands::build_workbench(&cli.input, settings)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Calc { json } => commands::calc(&bench, json, &mut out)?,
        Commands::Export { output } => {
            let today = chrono::Local::now().date_naive();
            if let Some(path) = commands::export_pdf(&mut bench, output.as_deref(), today)? {
                writeln!(out, "wrote {}", path.display())?;
            }
        }
        Commands::Presets { json } => commands::presets(cli.input.tier, json, &mut out)?,
        Commands::Interactive => {
            let stdin = io::stdin();
            Repl::new(bench).run(stdin.lock(), &mut out)?;
        }
    }

    Ok(())
}
