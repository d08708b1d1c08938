// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod acquisition;
mod cli;
mod config;
mod extract;
mod registrar;
mod registry;
mod rest;

#[derive(Parser)]
#[command(
    name = "allot",
    about = "Allot — IPO share-allotment checker",
    version,
    after_help = "Run 'allot <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Port to listen on (defaults to $PORT, then 5000)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch the registrar bundle and list the live IPO issues
    Companies,
    /// Check allotment status for one applicant key
    Check {
        /// Issue code of the IPO (the company's clientId)
        #[arg(long)]
        issue_code: String,
        /// PAN, application number, or DP client id
        #[arg(long)]
        key: String,
        /// Key interpretation: pan, appno, or dpclient
        #[arg(long, name = "type", default_value = "pan")]
        query_type: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("ALLOT_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("ALLOT_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("ALLOT_VERBOSE", "1");
    }

    let result = match cli.command {
        Commands::Serve { port } => cli::serve::run(port).await,
        Commands::Companies => cli::companies_cmd::run().await,
        Commands::Check {
            issue_code,
            key,
            query_type,
        } => cli::check_cmd::run(&issue_code, &key, &query_type).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "allot", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
