//! Statement generation settings.

use serde::{Deserialize, Serialize};

use crate::flavor::Flavor;

/// When to emit `AUTO_INCREMENT = n` for a changed counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAutoIncMode {
    /// Never.
    #[default]
    Ignore,
    /// Only when the new value is higher.
    IfIncreased,
    /// Only when the table already had an explicit value above 1.
    IfAlready,
    /// Always.
    Always,
}

/// How to treat a desired state without partitioning when the current
/// table is partitioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitioningMode {
    /// Leave existing partitioning in place.
    #[default]
    Keep,
    /// Remove it, and create new tables unpartitioned.
    Remove,
}

/// Settings that shape the DDL produced from a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementModifiers {
    /// Permit changes that can lose data.
    pub allow_unsafe: bool,
    /// Ignore column position changes.
    pub lax_column_order: bool,
    /// AUTO_INCREMENT handling.
    pub next_auto_inc: NextAutoIncMode,
    /// Partitioning removal handling.
    pub partitioning: PartitioningMode,
    /// Produce no statement for unsupported objects instead of failing.
    pub skip_unsupported: bool,
    /// Target server flavor for rendering.
    pub flavor: Flavor,
}

impl StatementModifiers {
    /// Default settings for `flavor`.
    #[must_use]
    pub fn for_flavor(flavor: Flavor) -> Self {
        Self {
            flavor,
            ..Self::default()
        }
    }
}
