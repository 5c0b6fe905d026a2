//! Server release versions.
//!
//! A [`Version`] is an ordered `(major, minor, patch)` triple. Parsing is
//! lenient about decorations servers add around the numeric part, e.g.
//! `5.7.44-log` or `10.11.6-MariaDB-0+deb12u1`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A server release version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major component.
    pub major: u16,
    /// Minor component.
    pub minor: u16,
    /// Patch component.
    pub patch: u16,
}

/// Error returned when one or more numeric components of a version string
/// could not be parsed.
///
/// The error is informational: [`best_effort`](Self::best_effort) returns the
/// version with every failed component left at zero, so lenient callers can
/// carry on with conservative defaults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version string {input:?}: unparseable component(s) {failed_components:?}")]
pub struct ParseVersionError {
    /// The original input.
    pub input: String,
    /// Version assembled from the components that did parse.
    pub partial: Version,
    /// Zero-based indexes (0 = major) of every component that failed.
    pub failed_components: Vec<usize>,
}

impl ParseVersionError {
    /// Returns the partially parsed version.
    #[must_use]
    pub const fn best_effort(&self) -> Version {
        self.partial
    }
}

impl Version {
    /// The zero version, used for unknown flavors.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Builds a version from 1 to 3 leading components; missing
    /// components are zero.
    #[must_use]
    pub fn from_parts(parts: &[u16]) -> Self {
        let get = |i: usize| parts.get(i).copied().unwrap_or(0);
        Self::new(get(0), get(1), get(2))
    }

    /// Parses a version string.
    ///
    /// A non-digit prefix before the major component and a non-digit suffix
    /// after the last component are discarded. Up to three dot-separated
    /// components are read.
    pub fn parse(input: &str) -> Result<Self, ParseVersionError> {
        let trimmed = input.trim_start_matches(|c: char| !c.is_ascii_digit());
        let mut components = [0u16; 3];
        let mut failed = Vec::new();
        let pieces: Vec<&str> = trimmed.splitn(3, '.').collect();
        for (n, piece) in pieces.iter().enumerate() {
            let digits = if n == pieces.len() - 1 {
                leading_digits(piece)
            } else {
                piece
            };
            match digits.parse::<u16>() {
                Ok(value) => components[n] = value,
                Err(_) => failed.push(n),
            }
        }
        let version = Self::new(components[0], components[1], components[2]);
        if failed.is_empty() {
            Ok(version)
        } else {
            Err(ParseVersionError {
                input: input.to_string(),
                partial: version,
                failed_components: failed,
            })
        }
    }

    /// Packed comparison key.
    #[must_use]
    pub const fn pack(self) -> u64 {
        ((self.major as u64) << 32) | ((self.minor as u64) << 16) | self.patch as u64
    }

    /// Returns `true` if this version is at least the one described by
    /// `parts` (1 to 3 components, missing ones treated as zero).
    #[must_use]
    pub fn at_least(self, parts: &[u16]) -> bool {
        self >= Self::from_parts(parts)
    }

    /// Returns `true` if each supplied component equals the corresponding
    /// component of this version. Omitted trailing components match anything.
    #[must_use]
    pub fn is(self, parts: &[u16]) -> bool {
        let mine = [self.major, self.minor, self.patch];
        parts.iter().zip(mine.iter()).all(|(want, have)| want == have)
    }

    /// Returns a copy with the patch component set to zero.
    #[must_use]
    pub const fn family(self) -> Self {
        Self::new(self.major, self.minor, 0)
    }
}

/// Returns the leading run of ASCII digits of `s`.
fn leading_digits(s: &str) -> &str {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pack().cmp(&other.pack())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A `name:major.minor.patch-label` identifier, e.g. `mysql:8.0.36-debian`.
///
/// Both the version and the label are optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionedIdentifier {
    /// Portion before the first colon.
    pub name: String,
    /// Parsed version, zero if absent or unparseable.
    pub version: Version,
    /// Portion after the first hyphen following the version.
    pub label: String,
}

impl VersionedIdentifier {
    /// Splits an identifier into name, version and label.
    ///
    /// Never fails outright: a version problem is reported alongside the
    /// best-effort identifier.
    #[must_use]
    pub fn parse(input: &str) -> (Self, Option<ParseVersionError>) {
        let (name, rest) = match input.split_once(':') {
            Some((name, rest)) => (name, rest),
            None => (input, ""),
        };
        let (version_text, label) = match rest.split_once('-') {
            Some((v, l)) => (v, l),
            None => (rest, ""),
        };
        let (version, problem) = if version_text.is_empty() {
            (Version::ZERO, None)
        } else {
            match Version::parse(version_text) {
                Ok(v) => (v, None),
                Err(e) => (e.best_effort(), Some(e)),
            }
        };
        (
            Self {
                name: name.to_string(),
                version,
                label: label.to_string(),
            },
            problem,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trip() {
        for s in ["5.7.44", "8.0.0", "10.11.6", "0.0.0", "9.1.0"] {
            let v = Version::parse(s).unwrap();
            assert_eq!(v.to_string(), s);
        }
    }

    #[test]
    fn parse_strips_decorations() {
        assert_eq!(
            Version::parse("5.7.44-log").unwrap(),
            Version::new(5, 7, 44)
        );
        assert_eq!(
            Version::parse("10.11.6-MariaDB-0+deb12u1").unwrap(),
            Version::new(10, 11, 6)
        );
        assert_eq!(
            Version::parse("v8.0.36").unwrap(),
            Version::new(8, 0, 36)
        );
        assert_eq!(Version::parse("8.0").unwrap(), Version::new(8, 0, 0));
    }

    #[test]
    fn parse_reports_every_failed_component() {
        let err = Version::parse("8.x.y").unwrap_err();
        assert_eq!(err.failed_components, vec![1, 2]);
        assert_eq!(err.best_effort(), Version::new(8, 0, 0));

        let err = Version::parse("").unwrap_err();
        assert_eq!(err.failed_components, vec![0]);
        assert_eq!(err.best_effort(), Version::ZERO);
    }

    #[test]
    fn ordering_uses_packed_key() {
        assert!(Version::new(8, 0, 19) > Version::new(8, 0, 18));
        assert!(Version::new(10, 2, 0) > Version::new(8, 4, 999));
        assert!(Version::new(5, 7, 44) < Version::new(5, 10, 0));
    }

    #[test]
    fn partial_comparisons() {
        let v = Version::new(8, 0, 29);
        assert!(v.at_least(&[8]));
        assert!(v.at_least(&[8, 0, 29]));
        assert!(!v.at_least(&[8, 0, 30]));
        assert!(!v.at_least(&[8, 1]));

        assert!(v.is(&[8]));
        assert!(v.is(&[8, 0]));
        assert!(v.is(&[8, 0, 29]));
        assert!(!v.is(&[8, 0, 30]));
        assert!(!v.is(&[5]));
    }

    #[test]
    fn family_zeroes_patch() {
        assert_eq!(Version::new(8, 0, 36).family(), Version::new(8, 0, 0));
    }

    #[test]
    fn versioned_identifier_parts() {
        let (id, err) = VersionedIdentifier::parse("mysql:8.0.36-debian");
        assert!(err.is_none());
        assert_eq!(id.name, "mysql");
        assert_eq!(id.version, Version::new(8, 0, 36));
        assert_eq!(id.label, "debian");

        let (id, err) = VersionedIdentifier::parse("percona");
        assert!(err.is_none());
        assert_eq!(id.name, "percona");
        assert_eq!(id.version, Version::ZERO);
        assert_eq!(id.label, "");

        let (id, err) = VersionedIdentifier::parse("mariadb:10.x");
        assert!(err.is_some());
        assert_eq!(id.version, Version::new(10, 0, 0));
    }
}
