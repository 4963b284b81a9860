//! Per-package outcome and run summary types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of processing a single package reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// No newer version was found on any source
    UpToDate,
    /// The mutation tool rewrote the project to a chosen version
    Updated,
    /// The user kept the current version
    SkippedByUser,
    /// The user chose to skip the rest of this project
    SkipProject,
    /// The declared version could not be resolved or parsed
    UnknownVersion,
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOutcome::UpToDate => write!(f, "up to date"),
            UpdateOutcome::Updated => write!(f, "updated"),
            UpdateOutcome::SkippedByUser => write!(f, "kept current version"),
            UpdateOutcome::SkipProject => write!(f, "project skipped"),
            UpdateOutcome::UnknownVersion => write!(f, "unknown version"),
        }
    }
}

/// Counters accumulated over a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Project files processed
    pub projects: usize,
    /// Packages updated via the mutation tool
    pub updated: usize,
    /// Packages already at their best version
    pub up_to_date: usize,
    /// Packages skipped (user choice, skipped project, unknown version)
    pub skipped: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one package
    pub fn record(&mut self, outcome: UpdateOutcome) {
        match outcome {
            UpdateOutcome::Updated => self.updated += 1,
            UpdateOutcome::UpToDate => self.up_to_date += 1,
            UpdateOutcome::SkippedByUser
            | UpdateOutcome::SkipProject
            | UpdateOutcome::UnknownVersion => self.skipped += 1,
        }
    }

    /// Total packages that reached an outcome
    pub fn total_packages(&self) -> usize {
        self.updated + self.up_to_date + self.skipped
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} project(s): {} updated, {} up to date, {} skipped",
            self.projects, self.updated, self.up_to_date, self.skipped
        )
    }
}
