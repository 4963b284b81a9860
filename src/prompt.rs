//! User interaction for version selection
//!
//! The orchestrator never talks to a terminal directly: it asks an
//! `UpdatePrompt` to pick one entry from a finite menu, which keeps the
//! state machine testable with a scripted implementation.

use crate::domain::{Credentials, PackageVersion};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// The user's choice for one package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Keep the current version, move to the next package
    KeepCurrent,
    /// Update to the candidate at this index (ascending order)
    Update(usize),
    /// Abandon the remaining packages of this project
    SkipProject,
}

/// Blocking selection and credential capability
pub trait UpdatePrompt {
    /// Choose between the current version, one of the ascending
    /// candidates, and skipping the project
    fn select(
        &mut self,
        package_id: &str,
        current: &PackageVersion,
        candidates: &[PackageVersion],
    ) -> io::Result<Selection>;

    /// Ask for credentials for a source that rejected the request
    fn request_credentials(&mut self, source_name: &str) -> io::Result<Credentials>;
}

/// Console implementation reading numbered choices from stdin
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> io::Result<String> {
        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

impl UpdatePrompt for ConsolePrompt {
    fn select(
        &mut self,
        _package_id: &str,
        current: &PackageVersion,
        candidates: &[PackageVersion],
    ) -> io::Result<Selection> {
        let skip_index = candidates.len() + 1;

        println!(
            "  [0] {} {}",
            current.to_string().white(),
            "(current)".dimmed()
        );
        for (i, candidate) in candidates.iter().enumerate() {
            println!("  [{}] {}", i + 1, colored_version(current, candidate));
        }
        println!("  [{}] {}", skip_index, "Skip project".dimmed());

        loop {
            print!("{}", format!("Select [0-{}]: ", skip_index).bold());
            io::stdout().flush()?;

            let input = self.read_line()?;
            if input.is_empty() {
                return Ok(Selection::KeepCurrent);
            }

            match input.parse::<usize>() {
                Ok(0) => return Ok(Selection::KeepCurrent),
                Ok(n) if n < skip_index => return Ok(Selection::Update(n - 1)),
                Ok(n) if n == skip_index => return Ok(Selection::SkipProject),
                _ => {
                    println!("{}", "Enter one of the listed numbers.".yellow());
                }
            }
        }
    }

    fn request_credentials(&mut self, source_name: &str) -> io::Result<Credentials> {
        print!("Username for '{}': ", source_name);
        io::stdout().flush()?;
        let username = self.read_line()?;

        print!("Password for '{}': ", source_name);
        io::stdout().flush()?;
        let password = self.read_line()?;

        Ok(Credentials::new(username, password))
    }
}

/// Color a candidate by its distance from the current version
///
/// Major bumps are red, minor bumps and prereleases yellow, patch and
/// revision bumps green.
pub fn colored_version(current: &PackageVersion, candidate: &PackageVersion) -> String {
    let text = candidate.to_string();
    if candidate.major != current.major {
        text.red().to_string()
    } else if candidate.minor != current.minor || candidate.is_prerelease() {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> PackageVersion {
        PackageVersion::parse(s).unwrap()
    }

    #[test]
    fn test_colored_version_by_distance() {
        colored::control::set_override(true);
        let current = v("1.2.3");

        // ANSI codes: 31 red, 33 yellow, 32 green
        assert!(colored_version(&current, &v("2.0.0")).contains("\x1b[31m"));
        assert!(colored_version(&current, &v("1.3.0")).contains("\x1b[33m"));
        assert!(colored_version(&current, &v("1.3.0-rc.1")).contains("\x1b[33m"));
        assert!(colored_version(&current, &v("1.2.4")).contains("\x1b[32m"));
        assert!(colored_version(&current, &v("1.2.3.9")).contains("\x1b[32m"));
        colored::control::unset_override();
    }

    #[test]
    fn test_selection_equality() {
        assert_eq!(Selection::Update(1), Selection::Update(1));
        assert_ne!(Selection::Update(1), Selection::Update(2));
        assert_ne!(Selection::KeepCurrent, Selection::SkipProject);
    }
}
