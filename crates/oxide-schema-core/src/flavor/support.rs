//! Support-status classification of flavors.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Flavor, Vendor};

/// How well a flavor is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportLevel {
    /// Older than anything this library has ever handled, or an unknown vendor.
    NeverSupported,
    /// Handled by earlier releases but no longer.
    Dropped,
    /// Still handled, scheduled for removal.
    Deprecated,
    /// Fully current.
    Supported,
    /// Newer than the latest release known here.
    TooNew,
}

impl SupportLevel {
    /// Returns `true` for [`Deprecated`](Self::Deprecated),
    /// [`Supported`](Self::Supported) and [`TooNew`](Self::TooNew).
    #[must_use]
    pub const fn is_usable(self) -> bool {
        matches!(self, Self::Deprecated | Self::Supported | Self::TooNew)
    }

    /// Explains this level for `flavor`, naming its `major.minor` branch.
    #[must_use]
    pub fn explanation(self, flavor: Flavor) -> String {
        explain(flavor, self)
    }
}

/// Per-vendor `major.minor` thresholds.
#[derive(Debug, Clone, Copy)]
struct SupportWindow {
    oldest_ever: (u16, u16),
    oldest_current: (u16, u16),
    newest_deprecated: (u16, u16),
    latest_known: (u16, u16),
}

const MYSQL_WINDOW: SupportWindow = SupportWindow {
    oldest_ever: (5, 5),
    oldest_current: (5, 7),
    newest_deprecated: (5, 7),
    latest_known: (9, 1),
};

const MARIADB_WINDOW: SupportWindow = SupportWindow {
    oldest_ever: (10, 1),
    oldest_current: (10, 4),
    newest_deprecated: (10, 5),
    latest_known: (11, 8),
};

const fn window(vendor: Vendor) -> Option<SupportWindow> {
    match vendor {
        Vendor::MySql => Some(MYSQL_WINDOW),
        Vendor::MariaDb => Some(MARIADB_WINDOW),
        Vendor::Unknown => None,
    }
}

/// Classifies `flavor` against its vendor's support window.
pub(crate) fn classify(flavor: Flavor) -> SupportLevel {
    let Some(w) = window(flavor.vendor) else {
        return SupportLevel::NeverSupported;
    };
    let branch = (flavor.version.major, flavor.version.minor);
    if branch < w.oldest_ever {
        SupportLevel::NeverSupported
    } else if branch < w.oldest_current {
        SupportLevel::Dropped
    } else if branch <= w.newest_deprecated {
        SupportLevel::Deprecated
    } else if branch <= w.latest_known {
        SupportLevel::Supported
    } else {
        SupportLevel::TooNew
    }
}

/// Human-readable explanation of `level` for `flavor`.
fn explain(flavor: Flavor, level: SupportLevel) -> String {
    let name = DisplayBranch(flavor);
    match level {
        SupportLevel::NeverSupported if flavor.vendor == Vendor::Unknown => {
            "database vendor could not be determined and is not supported".to_string()
        }
        SupportLevel::NeverSupported => format!("{name} is not supported"),
        SupportLevel::Dropped => format!(
            "{name} is no longer supported; support was removed after it reached end of life"
        ),
        SupportLevel::Deprecated => format!(
            "{name} is deprecated; support will be removed in a future release"
        ),
        SupportLevel::Supported => format!("{name} is supported"),
        SupportLevel::TooNew => {
            let (major, minor) = window(flavor.vendor).map_or((0, 0), |w| w.latest_known);
            format!(
                "{name} is newer than the latest known release {} {major}.{minor}; \
                 it has not been tested and may not work correctly",
                flavor.vendor.display_name()
            )
        }
    }
}

struct DisplayBranch(Flavor);

impl fmt::Display for DisplayBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{}",
            self.0.vendor.display_name(),
            self.0.version.major,
            self.0.version.minor
        )
    }
}
