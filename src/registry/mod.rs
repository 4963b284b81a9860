//! Package feed access
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - The `VersionFeed` trait the orchestrator queries through
//! - The NuGet V3 adapter (service index + flat container)

mod client;
mod nuget;

pub use client::HttpClient;
pub use nuget::NugetFeed;

use crate::domain::{PackageVersion, Source};
use crate::error::FeedError;
use async_trait::async_trait;

/// Trait for feed adapters
///
/// The orchestrator only ever asks one question of a feed: the full
/// published version list for a package id on a given source. Keeping the
/// seam this narrow makes the state machine testable without a network.
#[async_trait]
pub trait VersionFeed: Send + Sync {
    /// Fetch all published versions for a package from one source
    async fn list_versions(
        &self,
        source: &Source,
        package_id: &str,
    ) -> Result<Vec<PackageVersion>, FeedError>;
}
