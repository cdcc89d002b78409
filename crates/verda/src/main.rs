// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Verda - an energy-aware hybrid query router.
//!
//! This is the binary entry point for the Verda service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;
mod shell;
mod stack;

/// Verda - an energy-aware hybrid query router.
#[derive(Parser, Debug)]
#[command(name = "verda", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Verda HTTP service.
    Serve,
    /// Launch an interactive REPL session.
    Shell,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match verda_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            verda_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Shell) => shell::run_shell(config).await,
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("verda: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Print the resolved configuration as TOML.
fn print_config(config: &verda_config::VerdaConfig) -> Result<(), verda_core::VerdaError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| verda_core::VerdaError::Internal(format!("config render failed: {e}")))?;
    println!("{rendered}");
    Ok(())
}
