//! Semantic versioning utilities.
//!
//! Wraps the `semver` crate with the strict parse, compare, and bump
//! operations used by impact classification and capability resolution.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A parsed semantic version.
pub type Version = semver::Version;

/// The version bump a set of changes calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    /// Internal-only changes.
    Patch,
    /// Additive, backwards-compatible changes.
    Minor,
    /// Breaking changes.
    Major,
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpType::Patch => write!(f, "patch"),
            BumpType::Minor => write!(f, "minor"),
            BumpType::Major => write!(f, "major"),
        }
    }
}

/// Parse a version string like "1.2.3" using the strict semver grammar.
pub fn parse_version(s: &str) -> Result<Version> {
    Version::parse(s).map_err(|e| CoreError::InvalidVersion {
        input: s.to_string(),
        reason: e.to_string(),
    })
}

/// Compare two version strings by semver precedence.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    Ok(parse_version(a)?.cmp(&parse_version(b)?))
}

/// Pick the bump type for a spec from the kinds of change it saw.
///
/// Any breaking change forces a major bump regardless of the rest.
pub fn determine_bump_type(has_breaking: bool, has_non_breaking: bool) -> BumpType {
    if has_breaking {
        BumpType::Major
    } else if has_non_breaking {
        BumpType::Minor
    } else {
        BumpType::Patch
    }
}

/// Compute the next version given the current version and the bump type.
///
/// Pre-release and build metadata are dropped. Fails with
/// [`CoreError::VersionOverflow`] when the bumped component is `u64::MAX`.
pub fn bump(current: &Version, kind: BumpType) -> Result<Version> {
    let overflow = |component| CoreError::VersionOverflow {
        input: current.to_string(),
        component,
    };
    Ok(match kind {
        BumpType::Patch => {
            let patch = current.patch.checked_add(1).ok_or_else(|| overflow("patch"))?;
            Version::new(current.major, current.minor, patch)
        }
        BumpType::Minor => {
            let minor = current.minor.checked_add(1).ok_or_else(|| overflow("minor"))?;
            Version::new(current.major, minor, 0)
        }
        BumpType::Major => {
            let major = current.major.checked_add(1).ok_or_else(|| overflow("major"))?;
            Version::new(major, 0, 0)
        }
    })
}

/// Parse `current`, bump it, and render the result.
pub fn bump_version(current: &str, kind: BumpType) -> Result<String> {
    let version = parse_version(current)?;
    Ok(bump(&version, kind)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_compare_versions() {
        let v1 = parse_version("1.0.0").unwrap();
        let v2 = parse_version("1.2.3").unwrap();
        let v3 = parse_version("2.0.0").unwrap();
        assert!(v1 < v2);
        assert!(v2 < v3);
        assert_eq!(compare_versions("1.10.0", "1.9.0").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("1.0.0", "1.0.0").unwrap(), Ordering::Equal);
    }

    #[test]
    fn strict_grammar_rejects_partial_versions() {
        for bad in ["1", "1.0", "v1.0.0", "", "1.0.0.0", "latest"] {
            let err = parse_version(bad).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidVersion { ref input, .. } if input == bad),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn compare_propagates_parse_failure() {
        assert!(compare_versions("1.0.0", "nope").is_err());
    }

    #[test]
    fn bump_type_truth_table() {
        assert_eq!(determine_bump_type(true, true), BumpType::Major);
        assert_eq!(determine_bump_type(true, false), BumpType::Major);
        assert_eq!(determine_bump_type(false, true), BumpType::Minor);
        assert_eq!(determine_bump_type(false, false), BumpType::Patch);
    }

    #[test]
    fn version_bump() {
        let v = parse_version("1.2.3").unwrap();
        assert_eq!(bump(&v, BumpType::Patch).unwrap(), parse_version("1.2.4").unwrap());
        assert_eq!(bump(&v, BumpType::Minor).unwrap(), parse_version("1.3.0").unwrap());
        assert_eq!(bump(&v, BumpType::Major).unwrap(), parse_version("2.0.0").unwrap());
    }

    #[test]
    fn bump_at_u64_max_is_an_error() {
        let max = u64::MAX;
        let cases = [
            (format!("1.2.{max}"), BumpType::Patch, "patch"),
            (format!("1.{max}.0"), BumpType::Minor, "minor"),
            (format!("{max}.0.0"), BumpType::Major, "major"),
        ];
        for (input, kind, expected) in cases {
            let err = bump_version(&input, kind).unwrap_err();
            assert!(
                matches!(err, CoreError::VersionOverflow { component, .. } if component == expected),
                "{input} {kind}"
            );
        }
        // Only the bumped component matters.
        assert_eq!(bump_version(&format!("1.2.{max}"), BumpType::Minor).unwrap(), "1.3.0");
    }

    #[test]
    fn bump_drops_prerelease() {
        assert_eq!(bump_version("1.0.0-beta.1", BumpType::Patch).unwrap(), "1.0.1");
        assert_eq!(bump_version("0.3.7+build.5", BumpType::Minor).unwrap(), "0.4.0");
    }

    #[test]
    fn bump_version_rejects_garbage() {
        assert!(bump_version("1.x", BumpType::Major).is_err());
    }

    #[test]
    fn bump_type_labels() {
        assert_eq!(BumpType::Patch.to_string(), "patch");
        assert_eq!(BumpType::Minor.to_string(), "minor");
        assert_eq!(BumpType::Major.to_string(), "major");
        assert_eq!(serde_json::to_string(&BumpType::Major).unwrap(), "\"major\"");
        assert!(BumpType::Major > BumpType::Minor);
    }
}
