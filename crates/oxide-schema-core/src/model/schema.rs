//! Whole-database snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::flavor::Flavor;

use super::escape::quote_identifier;
use super::object::{ObjectKey, ObjectPattern, ObjectType};
use super::routine::{Routine, RoutineType};
use super::table::Table;

/// A database and the objects it contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    /// Database name.
    pub name: String,
    /// Default character set.
    pub charset: String,
    /// Default collation.
    pub collation: String,
    /// Tables in order.
    pub tables: Vec<Table>,
    /// Routines in order.
    pub routines: Vec<Routine>,
}

/// Borrowed view of one object in a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaObject<'a> {
    /// A table.
    Table(&'a Table),
    /// A procedure or function.
    Routine(&'a Routine),
}

impl Schema {
    /// Identity of the database itself.
    #[must_use]
    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(ObjectType::Database, self.name.clone())
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Looks up a routine by name and type.
    #[must_use]
    pub fn routine(&self, name: &str, routine_type: RoutineType) -> Option<&Routine> {
        self.routines
            .iter()
            .find(|r| r.name == name && r.routine_type == routine_type)
    }

    /// Every table and routine keyed by identity.
    #[must_use]
    pub fn objects(&self) -> BTreeMap<ObjectKey, SchemaObject<'_>> {
        let tables = self.tables.iter().map(|t| (t.key(), SchemaObject::Table(t)));
        let routines = self
            .routines
            .iter()
            .map(|r| (r.key(), SchemaObject::Routine(r)));
        tables.chain(routines).collect()
    }

    /// Removes every table and routine whose key matches any of
    /// `patterns`. Returns how many objects were removed.
    pub fn strip_matches(&mut self, patterns: &[ObjectPattern]) -> usize {
        let matched = |key: &ObjectKey| patterns.iter().any(|p| p.matches(key));
        let before = self.tables.len() + self.routines.len();
        self.tables.retain(|t| !matched(&t.key()));
        self.routines.retain(|r| !matched(&r.key()));
        before - (self.tables.len() + self.routines.len())
    }

    /// Strips partitioning from every partitioned table.
    pub fn strip_table_partitioning(&mut self, flavor: Flavor) {
        for table in &mut self.tables {
            table.strip_partitioning(flavor);
        }
    }

    /// Strips integer display widths from every table. Returns whether
    /// any table changed.
    pub fn strip_int_display_widths(&mut self, flavor: Flavor) -> bool {
        self.tables
            .iter_mut()
            .fold(false, |changed, t| t.strip_int_display_widths(flavor) || changed)
    }

    /// CREATE DATABASE statement.
    #[must_use]
    pub fn create_statement(&self) -> String {
        let mut stmt = format!("CREATE DATABASE {}", quote_identifier(&self.name));
        if !self.charset.is_empty() {
            stmt.push_str(" CHARACTER SET ");
            stmt.push_str(&self.charset);
        }
        if !self.collation.is_empty() {
            stmt.push_str(" COLLATE ");
            stmt.push_str(&self.collation);
        }
        stmt
    }
}
