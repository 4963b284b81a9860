//! Update orchestrator driving the whole workflow
//!
//! This module provides:
//! - Workflow coordination: locate → extract → query → classify → choose →
//!   invoke
//! - The per-manifest working source set, which only shrinks on
//!   authentication failure and is reseeded for each manifest
//! - Error containment: per-source and per-package problems are reported
//!   and skipped; only a mutation tool failure aborts the run
//!
//! Everything external is injected: the feed, the mutation tool and the
//! prompt are trait implementations chosen by the caller, so the state
//! machine runs in tests without a network, a terminal or a dotnet
//! installation.

use crate::cli::CliArgs;
use crate::domain::{PackageReference, PackageVersion, RunSummary, Source, UpdateOutcome};
use crate::dotnet::PackageMutator;
use crate::error::{FeedError, ToolError};
use crate::manifest::{
    locate_projects, parse_project, resolve_central_version, resolve_ignore_dirs, IGNORE_FILE,
};
use crate::progress::Progress;
use crate::prompt::{colored_version, Selection, UpdatePrompt};
use crate::registry::VersionFeed;
use crate::sources::load_sources;
use crate::update::classify;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Options resolved from the CLI surface
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Root directory to scan
    pub root: PathBuf,
    /// Restrict processing to one package id (case-insensitive)
    pub package: Option<String>,
    /// Include subdirectories when locating projects
    pub recursive: bool,
    /// Compute prerelease candidates
    pub include_prerelease: bool,
    /// Allow prompting for feed credentials on authentication failure
    pub interactive: bool,
    /// Show a spinner while feeds are queried
    pub show_progress: bool,
}

impl UpdateOptions {
    /// Build options from parsed CLI arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            root: args.root_dir(),
            package: args.package.clone(),
            recursive: args.recursive,
            include_prerelease: args.include_prerelease,
            interactive: args.interactive,
            show_progress: true,
        }
    }

    fn matches_package(&self, id: &str) -> bool {
        match &self.package {
            Some(filter) => filter.eq_ignore_ascii_case(id),
            None => true,
        }
    }
}

/// An upgrade candidate with the source that produced it
#[derive(Debug, Clone)]
struct Candidate {
    version: PackageVersion,
    source_url: String,
}

/// Orchestrator for the update workflow
pub struct Orchestrator<F, M, P> {
    options: UpdateOptions,
    feed: F,
    mutator: M,
    prompt: P,
}

impl<F: VersionFeed, M: PackageMutator, P: UpdatePrompt> Orchestrator<F, M, P> {
    /// Create a new orchestrator
    pub fn new(options: UpdateOptions, feed: F, mutator: M, prompt: P) -> Self {
        Self {
            options,
            feed,
            mutator,
            prompt,
        }
    }

    /// Run the update workflow over every project under the root
    ///
    /// Returns `Err` only when a mutation tool invocation failed, at which
    /// point the workspace state is ambiguous and the run stops.
    pub async fn run(&mut self) -> anyhow::Result<RunSummary> {
        let root = self.options.root.clone();
        let ignore_dirs = resolve_ignore_dirs(&root);
        if root.join(IGNORE_FILE).is_file() {
            println!(
                "Ignore directories in {}",
                root.join(IGNORE_FILE).display().to_string().dimmed()
            );
        }

        let projects = locate_projects(&root, self.options.recursive, &ignore_dirs);

        let mut summary = RunSummary::new();
        for project in projects {
            summary.projects += 1;
            self.process_project(&project, &root, &mut summary).await?;
        }

        Ok(summary)
    }

    /// Process one project file; a parse failure skips the project only
    async fn process_project(
        &mut self,
        project: &Path,
        root: &Path,
        summary: &mut RunSummary,
    ) -> anyhow::Result<()> {
        println!("Analyzing {}", project.display().to_string().dimmed());

        let references = match parse_project(project) {
            Ok(references) => references,
            Err(e) => {
                println!("{} {}", "Error".red(), e);
                return Ok(());
            }
        };
        if references.is_empty() {
            return Ok(());
        }

        let project_dir = project
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        // The working source set for this manifest; it only shrinks
        let mut sources = load_sources(&project_dir);

        for reference in &references {
            if !self.options.matches_package(&reference.id) {
                continue;
            }

            let outcome = self
                .process_package(reference, &project_dir, root, &mut sources)
                .await?;
            summary.record(outcome);

            if outcome == UpdateOutcome::SkipProject {
                break;
            }
        }

        Ok(())
    }

    /// Drive one package through query → classify → choose → invoke
    async fn process_package(
        &mut self,
        reference: &PackageReference,
        project_dir: &Path,
        root: &Path,
        sources: &mut Vec<Source>,
    ) -> anyhow::Result<UpdateOutcome> {
        let declared = match &reference.version {
            Some(version) => Some(version.clone()),
            None => resolve_central_version(&reference.id, project_dir, root),
        };

        let current = match declared.as_deref().map(PackageVersion::parse_spec) {
            Some(Ok(current)) => current,
            _ => {
                println!(
                    "{}",
                    format!("Skipping {} because of unknown version", reference.id).yellow()
                );
                return Ok(UpdateOutcome::UnknownVersion);
            }
        };

        let (candidates, removed_sources, source_errors) =
            self.query_sources(reference, &current, sources).await;

        for (name, error) in &source_errors {
            println!("{} {}: {}", "Error".red(), name, error);
        }
        for name in &removed_sources {
            println!(
                "{}",
                format!(
                    "Unauthenticated source '{}'. Skipping further requests on this source.",
                    name
                )
                .yellow()
            );
        }

        if candidates.is_empty() {
            println!("{} {}", reference.id, "up to date".green());
            return Ok(UpdateOutcome::UpToDate);
        }

        println!("{} {}", reference.id, "needs update".red());
        let menu: Vec<PackageVersion> = candidates.iter().map(|c| c.version.clone()).collect();
        let selection = self.prompt.select(&reference.id, &current, &menu)?;

        let chosen = match selection {
            Selection::KeepCurrent => return Ok(UpdateOutcome::SkippedByUser),
            Selection::SkipProject => return Ok(UpdateOutcome::SkipProject),
            Selection::Update(index) => &candidates[index],
        };

        let output = self
            .mutator
            .add_package(
                project_dir,
                &reference.id,
                &chosen.version.original,
                &chosen.source_url,
            )
            .await?;

        if !output.success() {
            // The manifest may or may not have been rewritten; stop rather
            // than risk compounding changes
            if !output.stdout.trim().is_empty() {
                println!("{}", output.stdout);
            }
            if !output.stderr.trim().is_empty() {
                eprintln!("{}", output.stderr.red());
            }
            return Err(ToolError::Failed {
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            }
            .into());
        }

        if let Some(line) = output.trailing_error_line() {
            println!("{}", line.red());
        }

        println!(
            "  {} {}",
            "updated to".green(),
            colored_version(&current, &chosen.version)
        );
        Ok(UpdateOutcome::Updated)
    }

    /// Query every source in the working set, accumulating candidates
    ///
    /// Authentication failures remove the source from the set, applied
    /// after the full attempt so the source is still tried for this
    /// package. Other errors are reported and skip the source for this
    /// package only.
    async fn query_sources(
        &mut self,
        reference: &PackageReference,
        current: &PackageVersion,
        sources: &mut Vec<Source>,
    ) -> (Vec<Candidate>, Vec<String>, Vec<(String, FeedError)>) {
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut to_remove: Vec<usize> = Vec::new();
        let mut errors: Vec<(String, FeedError)> = Vec::new();

        let mut progress = Progress::new(self.options.show_progress);
        progress.spinner(&format!("{}: checking sources", reference.id));

        for index in 0..sources.len() {
            progress.set_message(&format!("{} on {}", reference.id, sources[index].name));

            let mut result = self
                .feed
                .list_versions(&sources[index], &reference.id)
                .await;

            // One interactive credential attempt; fresh credentials stay on
            // the working-set entry for the rest of this manifest
            let rejected = matches!(&result, Err(e) if e.is_authentication());
            if rejected && self.options.interactive {
                progress.finish_and_clear();
                if let Ok(credentials) = self.prompt.request_credentials(&sources[index].name) {
                    sources[index].credentials = Some(credentials);
                    progress.spinner(&format!("{}: checking sources", reference.id));
                    result = self
                        .feed
                        .list_versions(&sources[index], &reference.id)
                        .await;
                }
            }

            match result {
                Ok(versions) => {
                    let newer: Vec<PackageVersion> =
                        versions.into_iter().filter(|v| v > current).collect();
                    for version in classify(current, &newer, self.options.include_prerelease) {
                        if !candidates.iter().any(|c| c.version == version) {
                            candidates.push(Candidate {
                                version,
                                source_url: sources[index].url.clone(),
                            });
                        }
                    }
                }
                Err(e) if e.is_authentication() => to_remove.push(index),
                Err(e) => errors.push((sources[index].name.clone(), e)),
            }
        }

        progress.finish_and_clear();

        let mut removed = Vec::new();
        for index in to_remove.into_iter().rev() {
            removed.push(sources.remove(index).name);
        }
        removed.reverse();

        candidates.sort_by(|a, b| a.version.cmp(&b.version));
        (candidates, removed, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn options_from(args: &[&str]) -> UpdateOptions {
        UpdateOptions::from_cli(&CliArgs::parse_from(args))
    }

    #[test]
    fn test_options_from_cli_defaults() {
        let options = options_from(&["dotup"]);
        assert!(options.package.is_none());
        assert!(options.recursive);
        assert!(options.include_prerelease);
        assert!(!options.interactive);
        assert!(options.show_progress);
    }

    #[test]
    fn test_options_from_cli_flags() {
        let options = options_from(&[
            "dotup",
            "-p",
            "Serilog",
            "-r",
            "false",
            "--includeprerelease",
            "false",
        ]);
        assert_eq!(options.package.as_deref(), Some("Serilog"));
        assert!(!options.recursive);
        assert!(!options.include_prerelease);
    }

    #[test]
    fn test_options_package_match_is_case_insensitive() {
        let options = options_from(&["dotup", "-p", "serilog"]);
        assert!(options.matches_package("Serilog"));
        assert!(!options.matches_package("Serilog.Sinks.Console"));

        let unfiltered = options_from(&["dotup"]);
        assert!(unfiltered.matches_package("Anything"));
    }
}
