//! Error types for statement generation.

use crate::model::ObjectKey;

/// Errors raised while turning a diff into DDL statements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The diff contains a change that can lose data and unsafe changes
    /// were not allowed.
    #[error("{key}: {reason}; unsafe changes are not allowed")]
    Unsafe {
        /// Object the change applies to.
        key: ObjectKey,
        /// What makes the change unsafe.
        reason: String,
    },

    /// The object uses DDL features that cannot be diffed and unsupported
    /// objects were not skipped.
    #[error("{key} uses DDL features that cannot be expressed as ALTER clauses")]
    Unsupported {
        /// Object that could not be diffed.
        key: ObjectKey,
    },
}

/// Result type for statement generation.
pub type Result<T> = std::result::Result<T, DiffError>;
