// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman: multi-agent coding orchestration.
//!
//! Commands: `init` scaffolds a config, `serve` runs the schedulers, `mcp`
//! serves the tool surface on stdio for an in-flight agent, `run-agent`
//! dispatches one task by hand.

mod commands;
mod exit_error;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "foreman", version, about = "Multi-agent coding orchestrator")]
struct Cli {
    /// Path to foreman.config.json (defaults to the working directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scaffold foreman.config.json and starter agent prompts.
    Init,

    /// Run the schedulers until interrupted.
    Serve,

    /// Serve the tool surface on stdio, optionally scoped to a task.
    Mcp {
        #[arg(long)]
        task_id: Option<String>,
        /// Store path override (falls back to $FOREMAN_DB, then config).
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// One-shot dispatch of a single task.
    RunAgent {
        #[arg(long)]
        task_id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{}", e.message);
        std::process::exit(e.code);
    }
}

async fn run(cli: Cli) -> Result<(), ExitError> {
    match cli.command {
        Command::Init => commands::init::run(&std::env::current_dir()?),
        Command::Serve => commands::serve::run(cli.config.as_deref()).await,
        Command::Mcp { task_id, db } => {
            commands::mcp::run(cli.config.as_deref(), task_id, db).await
        }
        Command::RunAgent { task_id } => {
            commands::run_agent::run(cli.config.as_deref(), &task_id).await
        }
    }
}
