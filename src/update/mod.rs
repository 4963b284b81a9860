//! Upgrade candidate classification
//!
//! Reduces a package's published versions into the small menu shown to the
//! user. For each stability tier (stable, and prerelease when enabled)
//! four groups are computed independently and unioned:
//! - highest version per major line above the current major
//! - highest minor within the current major
//! - highest patch within the current major.minor
//! - highest revision within the current major.minor.patch
//!
//! Each of the latter three contributes at most one candidate; the major
//! group contributes one per distinct higher major. The result is
//! deduplicated and ordered ascending, guaranteeing the best available
//! version at every distance from current without listing every release.

use crate::domain::PackageVersion;
use std::collections::BTreeMap;

/// Compute the upgrade candidate menu for one source's published versions
///
/// Only versions strictly greater than `current` are considered; every
/// returned candidate is strictly greater than `current`.
pub fn classify(
    current: &PackageVersion,
    published: &[PackageVersion],
    include_prerelease: bool,
) -> Vec<PackageVersion> {
    let newer: Vec<&PackageVersion> = published.iter().filter(|v| *v > current).collect();

    let stable: Vec<&PackageVersion> = newer
        .iter()
        .copied()
        .filter(|v| !v.is_prerelease())
        .collect();
    let mut candidates = candidate_tier(current, &stable);

    if include_prerelease {
        let prerelease: Vec<&PackageVersion> = newer
            .iter()
            .copied()
            .filter(|v| v.is_prerelease())
            .collect();
        candidates.extend(candidate_tier(current, &prerelease));
    }

    candidates.sort();
    candidates.dedup();
    candidates
}

fn candidate_tier(current: &PackageVersion, versions: &[&PackageVersion]) -> Vec<PackageVersion> {
    let mut tier = highest_per_major(current, versions);
    tier.extend(highest_minor(current, versions));
    tier.extend(highest_patch(current, versions));
    tier.extend(highest_revision(current, versions));
    tier
}

/// One representative (the highest) per major line above the current major
fn highest_per_major(
    current: &PackageVersion,
    versions: &[&PackageVersion],
) -> Vec<PackageVersion> {
    let mut per_major: BTreeMap<u64, &PackageVersion> = BTreeMap::new();
    for version in versions.iter().copied().filter(|v| v.major > current.major) {
        per_major
            .entry(version.major)
            .and_modify(|best| {
                if version > *best {
                    *best = version;
                }
            })
            .or_insert(version);
    }
    per_major.into_values().cloned().collect()
}

/// The highest minor bump within the current major
fn highest_minor(
    current: &PackageVersion,
    versions: &[&PackageVersion],
) -> Option<PackageVersion> {
    versions
        .iter()
        .filter(|v| v.major == current.major && v.minor > current.minor)
        .max()
        .map(|v| (*v).clone())
}

/// The highest patch bump within the current major.minor
fn highest_patch(
    current: &PackageVersion,
    versions: &[&PackageVersion],
) -> Option<PackageVersion> {
    versions
        .iter()
        .filter(|v| {
            v.major == current.major && v.minor == current.minor && v.patch > current.patch
        })
        .max()
        .map(|v| (*v).clone())
}

/// The highest revision bump within the current major.minor.patch
fn highest_revision(
    current: &PackageVersion,
    versions: &[&PackageVersion],
) -> Option<PackageVersion> {
    versions
        .iter()
        .filter(|v| {
            v.major == current.major
                && v.minor == current.minor
                && v.patch == current.patch
                && v.revision > current.revision
        })
        .max()
        .map(|v| (*v).clone())
}
