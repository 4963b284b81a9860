//! dotup - Interactive NuGet dependency updater CLI
//!
//! Scans a directory for csproj files, shows which package references
//! have newer published versions on the configured feeds, and delegates
//! the chosen upgrades to `dotnet add package`.

use clap::Parser;
use colored::Colorize;
use dotup::cli::CliArgs;
use dotup::domain::RunSummary;
use dotup::dotnet::DotnetCli;
use dotup::orchestrator::{Orchestrator, UpdateOptions};
use dotup::prompt::ConsolePrompt;
use dotup::registry::{HttpClient, NugetFeed};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(summary) => {
            if summary.total_packages() > 0 {
                println!("{}", summary.to_string().dimmed());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            // A mutation tool failure leaves the workspace in an ambiguous
            // state; its captured output has already been printed
            eprintln!("{}", format!("Error: {:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<RunSummary> {
    let client = HttpClient::new()?;
    let options = UpdateOptions::from_cli(&args);

    let mut orchestrator = Orchestrator::new(
        options,
        NugetFeed::new(client),
        DotnetCli::new(),
        ConsolePrompt::new(),
    );

    orchestrator.run().await
}
