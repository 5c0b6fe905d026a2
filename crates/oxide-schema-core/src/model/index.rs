//! Indexes and their parts.

use serde::{Deserialize, Serialize};

use crate::flavor::Flavor;

use super::escape::{escape_value_for_create_table, quote_identifier};

/// One column or expression of an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexPart {
    /// Column name; empty for a functional part.
    pub column: String,
    /// Key prefix length, 0 for the whole column.
    pub prefix_length: u16,
    /// Descending order.
    pub descending: bool,
    /// Expression of a functional part.
    pub expression: Option<String>,
}

impl IndexPart {
    /// A whole-column ascending part.
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            column: name.into(),
            ..Self::default()
        }
    }

    /// Part as rendered inside the index column list.
    #[must_use]
    pub fn definition(&self) -> String {
        let mut def = match &self.expression {
            Some(expr) => format!("({expr})"),
            None => quote_identifier(&self.column),
        };
        if self.prefix_length > 0 {
            def.push_str(&format!("({})", self.prefix_length));
        }
        if self.descending {
            def.push_str(" DESC");
        }
        def
    }
}

/// A primary, unique or secondary index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Index {
    /// Index name; `PRIMARY` for the primary key.
    pub name: String,
    /// Parts in order.
    pub parts: Vec<IndexPart>,
    /// Primary key.
    pub primary_key: bool,
    /// Unique index.
    pub unique: bool,
    /// Index method: `BTREE`, `HASH`, `FULLTEXT` or `SPATIAL`.
    pub index_type: String,
    /// Invisible (MySQL) or ignored (MariaDB).
    pub invisible: bool,
    /// Index comment, unescaped.
    pub comment: String,
}

impl Index {
    /// Primary key over `columns`.
    pub fn primary<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: "PRIMARY".to_string(),
            parts: columns.into_iter().map(IndexPart::column).collect(),
            primary_key: true,
            unique: true,
            index_type: "BTREE".to_string(),
            ..Self::default()
        }
    }

    /// Secondary BTREE index over `columns`.
    pub fn secondary<I, S>(name: impl Into<String>, columns: I, unique: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            parts: columns.into_iter().map(IndexPart::column).collect(),
            unique,
            index_type: "BTREE".to_string(),
            ..Self::default()
        }
    }

    /// Index definition as it appears inside CREATE TABLE.
    #[must_use]
    pub fn definition(&self, flavor: Flavor) -> String {
        let mut def = if self.primary_key {
            "PRIMARY KEY".to_string()
        } else {
            let kind = if self.unique {
                "UNIQUE KEY"
            } else {
                match self.index_type.as_str() {
                    "FULLTEXT" => "FULLTEXT KEY",
                    "SPATIAL" => "SPATIAL KEY",
                    _ => "KEY",
                }
            };
            format!("{kind} {}", quote_identifier(&self.name))
        };
        let parts: Vec<String> = self.parts.iter().map(IndexPart::definition).collect();
        def.push_str(&format!(" ({})", parts.join(",")));
        if self.index_type == "HASH" {
            def.push_str(" USING HASH");
        }
        if !self.comment.is_empty() {
            def.push_str(&format!(
                " COMMENT '{}'",
                escape_value_for_create_table(&self.comment)
            ));
        }
        if self.invisible {
            def.push_str(if flavor.is_mariadb(&[]) {
                " IGNORED"
            } else {
                " /*!80000 INVISIBLE */"
            });
        }
        def
    }

    /// Equality ignoring visibility, which can be altered in place.
    #[must_use]
    pub fn equals_ignoring_visibility(&self, other: &Self) -> bool {
        self.name == other.name
            && self.parts == other.parts
            && self.primary_key == other.primary_key
            && self.unique == other.unique
            && self.index_type == other.index_type
            && self.comment == other.comment
    }
}
