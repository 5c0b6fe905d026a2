//! Routine diffs.

use crate::model::{ObjectKey, Routine};

use super::DiffType;

/// Difference of one stored routine between two schemas. Routines have no
/// in-place ALTER for their body, so a change is a drop followed by a
/// re-create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineDiff {
    /// Create, drop or alter.
    pub diff_type: DiffType,
    /// Routine before; `None` for creates.
    pub from: Option<Routine>,
    /// Routine after; `None` for drops.
    pub to: Option<Routine>,
}

impl RoutineDiff {
    /// A new routine.
    #[must_use]
    pub const fn create(routine: Routine) -> Self {
        Self {
            diff_type: DiffType::Create,
            from: None,
            to: Some(routine),
        }
    }

    /// A removed routine.
    #[must_use]
    pub const fn drop(routine: Routine) -> Self {
        Self {
            diff_type: DiffType::Drop,
            from: Some(routine),
            to: None,
        }
    }

    /// A changed routine, or `None` if identical.
    #[must_use]
    pub fn alter(from: &Routine, to: &Routine) -> Option<Self> {
        (from != to).then(|| Self {
            diff_type: DiffType::Alter,
            from: Some(from.clone()),
            to: Some(to.clone()),
        })
    }

    /// Identity of the routine.
    #[must_use]
    pub fn key(&self) -> Option<ObjectKey> {
        self.to.as_ref().or(self.from.as_ref()).map(Routine::key)
    }

    /// DDL statements in execution order.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        let drop = self.from.as_ref().map(Routine::drop_statement);
        let create = self.to.as_ref().map(Routine::definition);
        drop.into_iter().chain(create).collect()
    }
}
