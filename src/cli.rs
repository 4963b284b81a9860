//! CLI argument parsing module for dotup

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Interactive NuGet dependency updater
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dotup",
    version,
    about = "Interactive NuGet dependency updater for .NET projects"
)]
pub struct CliArgs {
    /// A root directory to search (default: current directory)
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,

    /// A NuGet package to update (default: all)
    #[arg(short = 'p', long)]
    pub package: Option<String>,

    /// Include subdirectories when looking for csproj files
    #[arg(
        short = 'r',
        long,
        default_value_t = true,
        action = ArgAction::Set,
        value_name = "BOOL"
    )]
    pub recursive: bool,

    /// Include prerelease versions in suggested updates
    #[arg(
        short = 'i',
        long = "includeprerelease",
        default_value_t = true,
        action = ArgAction::Set,
        value_name = "BOOL"
    )]
    pub include_prerelease: bool,

    /// Allow prompting for feed credentials when a source rejects the request
    #[arg(
        long,
        default_value_t = false,
        action = ArgAction::Set,
        value_name = "BOOL"
    )]
    pub interactive: bool,
}

impl CliArgs {
    /// The root directory to scan
    ///
    /// An omitted or non-existent directory falls back to the current
    /// working directory.
    pub fn root_dir(&self) -> PathBuf {
        match &self.directory {
            Some(dir) if dir.is_dir() => dir.clone(),
            _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Check if a package id passes the `--package` filter
    ///
    /// The match is a case-insensitive exact comparison, as NuGet ids are
    /// case-insensitive.
    pub fn matches_package(&self, id: &str) -> bool {
        match &self.package {
            Some(filter) => filter.eq_ignore_ascii_case(id),
            None => true,
        }
    }
}
