// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `verda shell` command implementation.
//!
//! Launches an interactive REPL with a colored prompt and readline history.
//! Every line routes through the same tier state machine and impact ledger
//! as the HTTP service; `stats` prints the impact report inline and the
//! final report is printed on exit.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use verda_config::VerdaConfig;
use verda_core::VerdaError;
use verda_impact::report;

use crate::stack::build_stack;

/// Runs the `verda shell` interactive REPL.
pub async fn run_shell(config: VerdaConfig) -> Result<(), VerdaError> {
    let stack = build_stack(&config).await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| VerdaError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "verda shell".bold().green());
    println!(
        "Type {} for the impact report, {} to exit.\n",
        "stats".yellow(),
        "quit".yellow()
    );

    let prompt = format!("{}> ", "verda".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "quit" || trimmed == "exit" {
                    break;
                }
                if trimmed == "stats" {
                    println!("{}", report::render(&stack.ledger.snapshot()));
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match stack.router.route(trimmed).await {
                    Ok(result) => {
                        println!("\n[{}] {}\n", result.tier, result.text);
                        if result.tokens_used > 0 {
                            let co2 = stack.ledger.co2_grams_for(result.tokens_used);
                            println!(
                                "{}",
                                format!("{co2:.4} g co2 | {} tokens", result.tokens_used).dimmed()
                            );
                        }
                    }
                    Err(e) => {
                        eprintln!("{}: {e}", "error".red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("\n{}", report::render(&stack.ledger.snapshot()));
    println!("{}", "goodbye".dimmed());
    Ok(())
}
