mod anchor;
mod catalog;
mod commands;
mod config;
mod diagnostics;
mod document;
mod error;
mod matcher;
mod normalize;
mod source;
mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lintack",
    about = "Acknowledge static-analysis findings in a reviewable markdown catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report findings not covered by the catalog
    Check {
        /// Findings file (JSON Lines); stdin when omitted
        #[arg(long)]
        findings: Option<PathBuf>,
    },
    /// Rebuild the catalog from current findings
    Update {
        /// Attribution for newly acknowledged findings; $USER when omitted
        #[arg(long)]
        author: Option<String>,
        /// Findings file (JSON Lines); stdin when omitted
        #[arg(long)]
        findings: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { findings } => commands::check(findings.as_deref()),
        Commands::Update { author, findings } => {
            commands::update(findings.as_deref(), author.as_deref())
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
