//! Table-level check constraints.

use serde::{Deserialize, Serialize};

use crate::flavor::Flavor;

use super::escape::quote_identifier;

/// A named CHECK constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Constraint name.
    pub name: String,
    /// Check expression as shown, without the outer parentheses.
    pub clause: String,
    /// Whether the constraint is enforced. Only MySQL can disable this.
    #[serde(default = "enforced_default")]
    pub enforced: bool,
}

const fn enforced_default() -> bool {
    true
}

impl Check {
    /// An enforced check.
    pub fn new(name: impl Into<String>, clause: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clause: clause.into(),
            enforced: true,
        }
    }

    /// Constraint definition as it appears inside CREATE TABLE.
    #[must_use]
    pub fn definition(&self, flavor: Flavor) -> String {
        let mut def = format!("CONSTRAINT {} CHECK ({})", quote_identifier(&self.name), self.clause);
        if !self.enforced && flavor.is_mysql(&[]) {
            def.push_str(" /*!80016 NOT ENFORCED */");
        }
        def
    }
}
