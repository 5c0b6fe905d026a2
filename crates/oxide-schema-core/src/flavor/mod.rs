//! Database server flavors.
//!
//! A [`Flavor`] identifies the vendor, release and variant patch-sets of a
//! server, and answers capability questions that drive DDL rendering. All
//! values here are `Copy` and immutable: helpers such as [`Flavor::family`]
//! return new values rather than mutating.

mod support;
mod thresholds;
mod version;

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use support::SupportLevel;
pub use thresholds::PointReleaseThresholds;
pub use version::{ParseVersionError, Version, VersionedIdentifier};

use thresholds::{MARIADB_ALWAYS_SHOW_COLLATE, MARIADB_COMPRESSION_MARKER};

// ================================================================
// Vendor
// ================================================================

/// A top-level, independently versioned database codebase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Vendor could not be determined.
    #[default]
    Unknown,
    /// Oracle MySQL.
    MySql,
    /// MariaDB.
    MariaDb,
}

/// Canonical lowercase names, used for both parsing and formatting.
const VENDOR_NAMES: &[(Vendor, &str)] = &[
    (Vendor::Unknown, "unknown"),
    (Vendor::MySql, "mysql"),
    (Vendor::MariaDb, "mariadb"),
];

impl Vendor {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        VENDOR_NAMES
            .iter()
            .find(|(v, _)| *v == self)
            .map_or("unknown", |(_, name)| *name)
    }

    /// Looks up a vendor by its canonical name. `"unknown"` is not
    /// accepted as input.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        VENDOR_NAMES
            .iter()
            .find(|(v, n)| *v != Self::Unknown && *n == name)
            .map(|(v, _)| *v)
    }

    /// Returns the vendor's marketing name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::MySql => "MySQL",
            Self::MariaDb => "MariaDB",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ================================================================
// Variant
// ================================================================

bitflags! {
    /// Patch-sets that track a vendor's codebase and versioning.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Variant: u32 {
        /// Percona Server.
        const PERCONA = 0b01;
        /// Amazon Aurora.
        const AURORA  = 0b10;
    }
}

/// Canonical names in display order.
const VARIANT_NAMES: &[(Variant, &str)] = &[
    (Variant::PERCONA, "percona"),
    (Variant::AURORA, "aurora"),
];

impl Variant {
    /// Parses a dash-joined list such as `percona` or `percona-aurora`.
    /// Returns `None` if any element is unknown or the list is empty.
    #[must_use]
    pub fn from_names(list: &str) -> Option<Self> {
        if list.is_empty() {
            return None;
        }
        list.split('-').try_fold(Self::empty(), |acc, part| {
            VARIANT_NAMES
                .iter()
                .find(|(_, name)| *name == part)
                .map(|(flag, _)| acc | *flag)
        })
    }

    /// Dash-joined canonical names; empty for no variants.
    #[must_use]
    pub fn names(self) -> String {
        VARIANT_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join("-")
    }
}

// ================================================================
// Flavor
// ================================================================

/// Error returned by [`Flavor::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFlavorError {
    /// The base name is neither a vendor nor a list of variants.
    #[error("unknown flavor base {0:?}")]
    UnknownBase(String),
    /// No version followed the base name.
    #[error("flavor {0:?} is missing a version")]
    MissingVersion(String),
    /// The version portion could not be fully parsed.
    #[error("flavor {flavor} has an invalid version: {source}")]
    InvalidVersion {
        /// Best-effort flavor.
        flavor: Flavor,
        /// Underlying version error.
        source: ParseVersionError,
    },
}

/// A `(vendor, version, variants)` triple identifying a server dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flavor {
    /// Vendor.
    pub vendor: Vendor,
    /// Release.
    pub version: Version,
    /// Variant patch-sets.
    pub variants: Variant,
}

impl Flavor {
    /// The unknown flavor.
    pub const UNKNOWN: Self = Self {
        vendor: Vendor::Unknown,
        version: Version::ZERO,
        variants: Variant::empty(),
    };

    /// Creates a flavor with no variants.
    #[must_use]
    pub const fn new(vendor: Vendor, major: u16, minor: u16, patch: u16) -> Self {
        Self {
            vendor,
            version: Version::new(major, minor, patch),
            variants: Variant::empty(),
        }
    }

    /// Parses a flavor string, returning [`Flavor::UNKNOWN`] if the base
    /// is unrecognized and a best-effort flavor if only the version is
    /// malformed.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s.parse() {
            Ok(fl) => fl,
            Err(ParseFlavorError::InvalidVersion { flavor, source }) => {
                tracing::warn!(input = s, error = %source, "using best-effort flavor version");
                flavor
            }
            Err(e) => {
                tracing::warn!(input = s, error = %e, "unrecognized flavor");
                Self::UNKNOWN
            }
        }
    }

    /// Identifies a flavor from the server's `version` and
    /// `version_comment` variables.
    #[must_use]
    pub fn identify(version_string: &str, version_comment: &str) -> Self {
        let lower_version = version_string.to_lowercase();
        let lower_comment = version_comment.to_lowercase();
        let mentions =
            |needle: &str| lower_version.contains(needle) || lower_comment.contains(needle);

        // Old MariaDB releases prefix the real version with a fake 5.5.5.
        let numeric = match version_string.strip_prefix("5.5.5-") {
            Some(rest) if mentions("mariadb") => rest,
            _ => version_string,
        };
        let version = Version::parse(numeric).unwrap_or_else(|e| e.best_effort());

        let mut flavor = Self {
            vendor: Vendor::Unknown,
            version,
            variants: Variant::empty(),
        };
        if mentions("percona") {
            flavor.vendor = Vendor::MySql;
            flavor.variants = Variant::PERCONA;
        } else if mentions("mariadb") {
            flavor.vendor = Vendor::MariaDb;
        } else if mentions("mysql") {
            flavor.vendor = Vendor::MySql;
        }
        if flavor.vendor == Vendor::Unknown && matches!(version.major, 5 | 8 | 9) {
            flavor.vendor = Vendor::MySql;
        }
        flavor
    }

    /// Returns `true` if the vendor is known.
    #[must_use]
    pub fn known(self) -> bool {
        self.vendor != Vendor::Unknown
    }

    /// Same vendor, major and minor; patch compared only when `other`'s
    /// patch is nonzero; `self`'s variants must include all of `other`'s.
    #[must_use]
    pub fn matches(self, other: Self) -> bool {
        self.vendor == other.vendor
            && self.version.major == other.version.major
            && self.version.minor == other.version.minor
            && (other.version.patch == 0 || self.version.patch == other.version.patch)
            && self.variants.contains(other.variants)
    }

    /// Vendor matches and version is at least `parts` (missing parts are zero).
    #[must_use]
    pub fn min(self, vendor: Vendor, parts: &[u16]) -> bool {
        self.vendor == vendor && self.version.at_least(parts)
    }

    /// Vendor matches and each supplied version component matches.
    #[must_use]
    pub fn is_exact(self, vendor: Vendor, parts: &[u16]) -> bool {
        self.vendor == vendor && self.version.is(parts)
    }

    /// `variant` is present and [`is_exact`](Self::is_exact) holds.
    #[must_use]
    pub fn is_variant_of(self, variant: Variant, vendor: Vendor, parts: &[u16]) -> bool {
        self.variants.contains(variant) && self.is_exact(vendor, parts)
    }

    /// MySQL (any variant) at least `parts`.
    #[must_use]
    pub fn min_mysql(self, parts: &[u16]) -> bool {
        self.min(Vendor::MySql, parts)
    }

    /// MariaDB at least `parts`.
    #[must_use]
    pub fn min_mariadb(self, parts: &[u16]) -> bool {
        self.min(Vendor::MariaDb, parts)
    }

    /// MySQL whose version matches `parts`; any MySQL for empty `parts`.
    #[must_use]
    pub fn is_mysql(self, parts: &[u16]) -> bool {
        self.is_exact(Vendor::MySql, parts)
    }

    /// MariaDB whose version matches `parts`; any MariaDB for empty `parts`.
    #[must_use]
    pub fn is_mariadb(self, parts: &[u16]) -> bool {
        self.is_exact(Vendor::MariaDb, parts)
    }

    /// Percona Server whose version matches `parts`.
    #[must_use]
    pub fn is_percona(self, parts: &[u16]) -> bool {
        self.is_variant_of(Variant::PERCONA, Vendor::MySql, parts)
    }

    /// Aurora whose version matches `parts`.
    #[must_use]
    pub fn is_aurora(self, parts: &[u16]) -> bool {
        self.is_variant_of(Variant::AURORA, Vendor::MySql, parts)
    }

    /// Copy with the patch component zeroed.
    #[must_use]
    pub const fn family(self) -> Self {
        Self {
            vendor: self.vendor,
            version: self.version.family(),
            variants: self.variants,
        }
    }

    /// Copy with no variants.
    #[must_use]
    pub const fn without_variants(self) -> Self {
        Self {
            vendor: self.vendor,
            version: self.version,
            variants: Variant::empty(),
        }
    }

    /// Copy with `variant` added.
    #[must_use]
    pub fn with_variant(self, variant: Variant) -> Self {
        Self {
            variants: self.variants | variant,
            ..self
        }
    }

    /// Support status of this flavor.
    #[must_use]
    pub fn supported(self) -> SupportLevel {
        support::classify(self)
    }

    /// Human-readable explanation of [`supported`](Self::supported).
    #[must_use]
    pub fn support_explanation(self) -> String {
        self.supported().explanation(self)
    }

    // ------------------------------------------------------------
    // Capabilities
    // ------------------------------------------------------------

    /// Native generated column syntax. MariaDB 10.1's borrowed syntax does
    /// not count.
    #[must_use]
    pub fn generated_columns(self) -> bool {
        self.min_mysql(&[5, 7]) || self.min_mariadb(&[10, 2])
    }

    /// SHOW CREATE TABLE lists foreign keys alphabetically.
    #[must_use]
    pub fn sorted_foreign_keys(self) -> bool {
        !(self.is_mysql(&[5, 5]) || self.min_mysql(&[8, 0, 19]))
    }

    /// Integer display widths are omitted from SHOW CREATE TABLE.
    #[must_use]
    pub fn omit_int_display_width(self) -> bool {
        self.min_mysql(&[8, 0, 19])
    }

    /// CHECK constraints are enforced and shown.
    #[must_use]
    pub fn has_check_constraints(self) -> bool {
        self.min_mysql(&[8, 0, 16])
            || self.min_mariadb(&[10, 3, 10])
            || (self.is_mariadb(&[10, 2]) && self.version.patch >= 22)
    }

    /// COLLATE is always shown alongside CHARACTER SET.
    #[must_use]
    pub fn always_show_collate(self) -> bool {
        self.is_mariadb(&[]) && MARIADB_ALWAYS_SHOW_COLLATE.satisfied_by(self.version)
    }

    /// Opening of the version-gated comment wrapping a MariaDB column
    /// compression clause.
    #[must_use]
    pub fn compression_comment_marker(self) -> &'static str {
        if self.is_mariadb(&[]) && MARIADB_COMPRESSION_MARKER.satisfied_by(self.version) {
            "/*M!100301"
        } else {
            "/*!100301"
        }
    }

    /// Server accepts modern TLS cipher suites. Unknown flavors get the
    /// restrictive answer.
    #[must_use]
    pub fn modern_cipher_suites(self) -> bool {
        self.min_mysql(&[5, 7]) || self.min_mariadb(&[10, 2])
    }

    /// Server accepts TLS 1.2 connections.
    #[must_use]
    pub fn supports_tls12(self) -> bool {
        self.min_mysql(&[5, 7, 28])
            || self.min_mariadb(&[10, 2])
            || (self.variants.contains(Variant::PERCONA) && self.min_mysql(&[5, 6]))
    }

    /// Server has a transactional data dictionary.
    #[must_use]
    pub fn has_data_dictionary(self) -> bool {
        self.min_mysql(&[8])
    }

    /// Invisible columns are supported.
    #[must_use]
    pub fn has_invisible_columns(self) -> bool {
        self.min_mysql(&[8, 0, 23]) || self.min_mariadb(&[10, 3, 3])
    }

    /// Invisible (MySQL) or ignored (MariaDB) indexes are supported.
    #[must_use]
    pub fn has_invisible_indexes(self) -> bool {
        self.min_mysql(&[8]) || self.min_mariadb(&[10, 6])
    }

    /// Column-level compression is supported.
    #[must_use]
    pub fn has_column_compression(self) -> bool {
        self.min_mariadb(&[10, 3, 1])
            || (self.variants.contains(Variant::PERCONA) && self.min_mysql(&[5, 6, 33]))
    }

    /// Default collation of `utf8mb4`.
    #[must_use]
    pub fn default_utf8mb4_collation(self) -> &'static str {
        if self.min_mysql(&[8]) {
            "utf8mb4_0900_ai_ci"
        } else if self.min_mariadb(&[11, 8]) {
            "utf8mb4_uca1400_ai_ci"
        } else {
            "utf8mb4_general_ci"
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variants.is_empty() {
            f.write_str(self.vendor.name())?;
        } else {
            f.write_str(&self.variants.names())?;
        }
        write!(f, ":{}.{}", self.version.major, self.version.minor)?;
        if self.version.patch > 0 {
            write!(f, ".{}", self.version.patch)?;
        }
        Ok(())
    }
}

impl FromStr for Flavor {
    type Err = ParseFlavorError;

    /// Parses `name:major.minor[.patch][-label]`. The label is discarded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, problem) = VersionedIdentifier::parse(s);
        let (vendor, variants) = if let Some(vendor) = Vendor::from_name(&id.name) {
            (vendor, Variant::empty())
        } else if let Some(variants) = Variant::from_names(&id.name) {
            (Vendor::MySql, variants)
        } else {
            return Err(ParseFlavorError::UnknownBase(id.name));
        };
        if !s.contains(':') {
            return Err(ParseFlavorError::MissingVersion(s.to_string()));
        }
        let flavor = Self {
            vendor,
            version: id.version,
            variants,
        };
        match problem {
            Some(source) => Err(ParseFlavorError::InvalidVersion { flavor, source }),
            None => Ok(flavor),
        }
    }
}
