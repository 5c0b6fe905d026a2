//! Foreign key constraints.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::escape::quote_identifier;

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferentialAction {
    /// `RESTRICT`, the implicit default.
    #[default]
    Restrict,
    /// `CASCADE`.
    Cascade,
    /// `SET NULL`.
    SetNull,
    /// `NO ACTION`.
    NoAction,
    /// `SET DEFAULT`.
    SetDefault,
}

impl ReferentialAction {
    /// SQL keyword(s).
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A foreign key constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Local columns in order.
    pub columns: Vec<String>,
    /// Referenced schema; empty when it is the table's own schema.
    pub referenced_schema: String,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced columns in order.
    pub referenced_columns: Vec<String>,
    /// ON DELETE action.
    pub delete_rule: ReferentialAction,
    /// ON UPDATE action.
    pub update_rule: ReferentialAction,
}

fn column_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ForeignKey {
    /// Constraint definition as it appears inside CREATE TABLE.
    #[must_use]
    pub fn definition(&self) -> String {
        let referenced = if self.referenced_schema.is_empty() {
            quote_identifier(&self.referenced_table)
        } else {
            format!(
                "{}.{}",
                quote_identifier(&self.referenced_schema),
                quote_identifier(&self.referenced_table)
            )
        };
        let mut def = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            quote_identifier(&self.name),
            column_list(&self.columns),
            referenced,
            column_list(&self.referenced_columns)
        );
        if self.delete_rule != ReferentialAction::Restrict {
            def.push_str(&format!(" ON DELETE {}", self.delete_rule));
        }
        if self.update_rule != ReferentialAction::Restrict {
            def.push_str(&format!(" ON UPDATE {}", self.update_rule));
        }
        def
    }
}
