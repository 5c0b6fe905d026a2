//! Point-release threshold maps.
//!
//! Some behaviors change in the same quarterly release train across several
//! maintained branches at once (say 10.5.18, 10.6.11 and 10.11.1). A
//! [`PointReleaseThresholds`] records the first patch of each branch that
//! carries the change.

use super::version::Version;

/// Sorted `(major, minor, min_patch)` thresholds.
///
/// - below the lowest registered `major.minor`: `false`
/// - at or above the highest registered `major.minor`: `true`
/// - a registered `major.minor`: `patch >= min_patch`
/// - an unregistered `major.minor` in between: `false`
#[derive(Debug, Clone, Copy)]
pub struct PointReleaseThresholds {
    entries: &'static [(u16, u16, u16)],
}

impl PointReleaseThresholds {
    /// Wraps a threshold list. Entries must be sorted ascending by
    /// `(major, minor)` with no duplicate branch.
    #[must_use]
    pub const fn new(entries: &'static [(u16, u16, u16)]) -> Self {
        Self { entries }
    }

    /// Returns whether `version` carries the change.
    #[must_use]
    pub fn satisfied_by(&self, version: Version) -> bool {
        let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) else {
            return false;
        };
        let branch = (version.major, version.minor);
        if branch < (first.0, first.1) {
            return false;
        }
        if branch >= (last.0, last.1) {
            return true;
        }
        match self
            .entries
            .binary_search_by_key(&branch, |&(major, minor, _)| (major, minor))
        {
            Ok(idx) => version.patch >= self.entries[idx].2,
            Err(_) => false,
        }
    }
}

/// MariaDB branches that always show `COLLATE` next to `CHARACTER SET` in
/// SHOW CREATE TABLE.
pub(crate) const MARIADB_ALWAYS_SHOW_COLLATE: PointReleaseThresholds =
    PointReleaseThresholds::new(&[
        (10, 3, 37),
        (10, 4, 27),
        (10, 5, 18),
        (10, 6, 11),
        (10, 7, 7),
        (10, 8, 6),
        (10, 9, 4),
        (10, 10, 2),
        (10, 11, 0),
    ]);

/// MariaDB branches that wrap column compression in `/*M!100301 ...*/`
/// instead of `/*!100301 ...*/`.
pub(crate) const MARIADB_COMPRESSION_MARKER: PointReleaseThresholds =
    PointReleaseThresholds::new(&[
        (10, 3, 35),
        (10, 4, 25),
        (10, 5, 16),
        (10, 6, 8),
        (10, 7, 4),
        (10, 8, 3),
    ]);
