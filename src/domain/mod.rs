//! Core domain models for dotup
//!
//! This module contains the fundamental types used throughout the
//! application:
//! - Package references extracted from project files
//! - Parsed NuGet versions with four-part ordering
//! - Package sources (feeds) with optional credentials
//! - Per-package outcomes and the run summary

mod outcome;
mod package_ref;
mod source;
mod version;

pub use outcome::{RunSummary, UpdateOutcome};
pub use package_ref::PackageReference;
pub use source::{Credentials, Source};
pub use version::PackageVersion;
