//! NuGet package version parsing and ordering
//!
//! Handles the version shapes found in csproj files:
//! - Exact versions: `1.2.3`, `1.2.3.4`, `1.0.0-beta.2`
//! - Range notation: `[1.2.3]`, `[1.0.0, 2.0.0)`, `(1.0,)` (lower bound wins)
//! - Floating versions: `1.2.*`, `*`
//!
//! NuGet versions carry a fourth `revision` component, so the ordering is
//! implemented here instead of on top of a three-part semver type.

use crate::error::VersionError;
use std::cmp::Ordering;
use std::fmt;

/// A parsed NuGet package version
///
/// Equality and ordering use the numeric tuple and the prerelease label
/// only; `original` preserves the spelling for display and for handing
/// back to `dotnet add package`.
#[derive(Debug, Clone)]
pub struct PackageVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub revision: u64,
    /// Prerelease label without the leading dash (e.g. `beta.2`)
    pub prerelease: Option<String>,
    /// The version string as published/declared
    pub original: String,
}

impl PackageVersion {
    /// Parse an exact version string
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(VersionError::unparsable(value));
        }

        // Build metadata never participates in ordering
        let without_metadata = value.split('+').next().unwrap_or(value);

        let (numeric, prerelease) = match without_metadata.split_once('-') {
            Some((n, pre)) if !pre.is_empty() => (n, Some(pre.to_string())),
            Some((n, _)) => (n, None),
            None => (without_metadata, None),
        };

        let mut parts = [0u64; 4];
        let mut count = 0;
        for piece in numeric.split('.') {
            if count == 4 {
                return Err(VersionError::unparsable(value));
            }
            parts[count] = piece
                .parse::<u64>()
                .map_err(|_| VersionError::unparsable(value))?;
            count += 1;
        }
        if count == 0 {
            return Err(VersionError::unparsable(value));
        }

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            revision: parts[3],
            prerelease,
            original: value.to_string(),
        })
    }

    /// Parse a declared version specification into the effective current version
    ///
    /// Range notation resolves to the range's minimum bound and floating
    /// versions to their zero-filled floor, mirroring how the declared
    /// version is interpreted when deciding what counts as "newer".
    pub fn parse_spec(value: &str) -> Result<Self, VersionError> {
        let trimmed = value.trim();

        if trimmed.starts_with('[') || trimmed.starts_with('(') {
            return Self::parse_range_minimum(trimmed);
        }

        if trimmed.contains('*') {
            return Self::parse_floating(trimmed);
        }

        Self::parse(trimmed)
    }

    fn parse_range_minimum(value: &str) -> Result<Self, VersionError> {
        let inner = value
            .strip_prefix(['[', '('])
            .and_then(|v| v.strip_suffix([']', ')']))
            .ok_or_else(|| VersionError::unparsable(value))?;

        let lower = match inner.split_once(',') {
            Some((lower, _)) => lower.trim(),
            None => inner.trim(),
        };

        if lower.is_empty() {
            return Err(VersionError::unbounded(value));
        }

        Self::parse(lower)
    }

    fn parse_floating(value: &str) -> Result<Self, VersionError> {
        let fixed = value.split('*').next().unwrap_or("");
        let fixed = fixed.trim_end_matches(['.', '-']);
        if fixed.is_empty() {
            return Self::parse("0.0.0");
        }
        Self::parse(fixed)
    }

    /// Whether this is a prerelease version
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    fn numeric_tuple(&self) -> (u64, u64, u64, u64) {
        (self.major, self.minor, self.patch, self.revision)
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageVersion {}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeric_tuple()
            .cmp(&other.numeric_tuple())
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                // A prerelease sorts below the release with the same tuple
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => compare_prerelease(a, b),
            })
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare prerelease labels by dot-separated identifiers
///
/// Numeric identifiers compare numerically and sort below alphanumeric
/// ones; alphanumeric identifiers compare case-insensitively.
fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(ln), Ok(rn)) => ln.cmp(&rn),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => {
                        l.to_ascii_lowercase().cmp(&r.to_ascii_lowercase())
                    }
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> PackageVersion {
        PackageVersion::parse(s).unwrap()
    }

    #[test]
    fn test_parse_three_part() {
        let version = v("1.2.3");
        assert_eq!(version.major, 1);
        assert_eq!(version.minor, 2);
        assert_eq!(version.patch, 3);
        assert_eq!(version.revision, 0);
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_parse_four_part() {
        let version = v("1.2.3.4");
        assert_eq!(version.revision, 4);
    }

    #[test]
    fn test_parse_short_versions() {
        assert_eq!(v("1").numeric_tuple(), (1, 0, 0, 0));
        assert_eq!(v("1.5").numeric_tuple(), (1, 5, 0, 0));
    }

    #[test]
    fn test_parse_prerelease() {
        let version = v("2.0.0-beta.2");
        assert!(version.is_prerelease());
        assert_eq!(version.prerelease.as_deref(), Some("beta.2"));
        assert_eq!(version.numeric_tuple(), (2, 0, 0, 0));
    }

    #[test]
    fn test_parse_strips_build_metadata() {
        let version = v("1.0.0+sha.abc123");
        assert!(!version.is_prerelease());
        assert_eq!(version, v("1.0.0"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PackageVersion::parse("").is_err());
        assert!(PackageVersion::parse("abc").is_err());
        assert!(PackageVersion::parse("1.2.x").is_err());
        assert!(PackageVersion::parse("1.2.3.4.5").is_err());
    }

    #[test]
    fn test_display_preserves_original() {
        assert_eq!(v("1.02.3").to_string(), "1.02.3");
    }

    #[test]
    fn test_ordering_numeric() {
        assert!(v("1.9.0") < v("1.10.0"));
        assert!(v("2.0.0") > v("1.99.99"));
        assert!(v("1.2.3.1") > v("1.2.3"));
    }

    #[test]
    fn test_ordering_prerelease_below_release() {
        assert!(v("1.0.0-rc.1") < v("1.0.0"));
        assert!(v("1.0.0-rc.1") > v("0.9.9"));
    }

    #[test]
    fn test_ordering_between_prereleases() {
        assert!(v("1.0.0-alpha") < v("1.0.0-beta"));
        assert!(v("1.0.0-beta.2") < v("1.0.0-beta.11"));
        assert!(v("1.0.0-alpha") < v("1.0.0-alpha.1"));
        assert!(v("1.0.0-1") < v("1.0.0-alpha"));
    }

    #[test]
    fn test_equality_ignores_spelling() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1.0.0-RC.1"), v("1.0.0-rc.1"));
    }

    #[test]
    fn test_parse_spec_exact() {
        let version = PackageVersion::parse_spec("1.2.3").unwrap();
        assert_eq!(version, v("1.2.3"));
    }

    #[test]
    fn test_parse_spec_bracket_ranges() {
        assert_eq!(PackageVersion::parse_spec("[1.2.3]").unwrap(), v("1.2.3"));
        assert_eq!(
            PackageVersion::parse_spec("[1.0.0, 2.0.0)").unwrap(),
            v("1.0.0")
        );
        assert_eq!(PackageVersion::parse_spec("(1.5, )").unwrap(), v("1.5"));
    }

    #[test]
    fn test_parse_spec_range_without_lower_bound() {
        assert!(PackageVersion::parse_spec("(, 2.0.0]").is_err());
    }

    #[test]
    fn test_parse_spec_floating() {
        assert_eq!(PackageVersion::parse_spec("1.2.*").unwrap(), v("1.2.0"));
        assert_eq!(PackageVersion::parse_spec("1.*").unwrap(), v("1.0.0"));
        assert_eq!(PackageVersion::parse_spec("*").unwrap(), v("0.0.0"));
    }

    #[test]
    fn test_sorting() {
        let mut versions = vec![
            v("2.0.0"),
            v("1.0.0-beta"),
            v("1.0.0"),
            v("1.0.0.2"),
            v("1.2.0"),
        ];
        versions.sort();
        let ordered: Vec<String> = versions.into_iter().map(|v| v.original).collect();
        assert_eq!(
            ordered,
            vec!["1.0.0-beta", "1.0.0", "1.0.0.2", "1.2.0", "2.0.0"]
        );
    }
}
