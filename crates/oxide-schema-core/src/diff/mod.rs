//! Schema diff engine.
//!
//! Compares a "from" (current) and a "to" (desired) [`Schema`] and
//! produces per-object diffs keyed by [`ObjectKey`]. Table diffs are lists
//! of [`TableAlterClause`]s, rendered into DDL under a set of
//! [`StatementModifiers`]. A table using DDL the engine cannot express
//! makes its diff unsupported instead of producing a partial clause list.
//!
//! Renames are not detected: a renamed table is a drop plus a create.

mod clause;
mod modifiers;
mod routine;
mod table;

use std::collections::HashSet;
use std::fmt;

use crate::error::Result;
use crate::model::{
    normalize_charset, normalize_collation, quote_identifier, ObjectKey, ObjectType, Routine,
    Schema,
};

pub use clause::{ColumnPosition, TableAlterClause};
pub use modifiers::{NextAutoIncMode, PartitioningMode, StatementModifiers};
pub use routine::RoutineDiff;
pub use table::TableDiff;

/// Kind of object change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffType {
    /// Object exists only in "to".
    Create,
    /// Object exists only in "from".
    Drop,
    /// Object exists in both and differs.
    Alter,
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::Alter => "ALTER",
        })
    }
}

/// Change of database-level defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseDiff {
    /// Database name.
    pub name: String,
    /// New default character set.
    pub charset: String,
    /// New default collation.
    pub collation: String,
}

impl DatabaseDiff {
    /// Diff of the defaults of `from` and `to`, or `None` if equivalent.
    #[must_use]
    pub fn new(from: &Schema, to: &Schema) -> Option<Self> {
        let same = normalize_charset(&from.charset) == normalize_charset(&to.charset)
            && normalize_collation(&from.collation) == normalize_collation(&to.collation);
        (!same).then(|| Self {
            name: to.name.clone(),
            charset: to.charset.clone(),
            collation: to.collation.clone(),
        })
    }

    /// ALTER DATABASE statement.
    #[must_use]
    pub fn statement(&self) -> String {
        format!(
            "ALTER DATABASE {} CHARACTER SET {} COLLATE {}",
            quote_identifier(&self.name),
            self.charset,
            self.collation
        )
    }
}

/// One object's difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectDiff {
    /// Database defaults.
    Database(DatabaseDiff),
    /// A table.
    Table(TableDiff),
    /// A procedure or function.
    Routine(RoutineDiff),
}

impl ObjectDiff {
    /// Identity of the changed object.
    #[must_use]
    pub fn key(&self) -> ObjectKey {
        match self {
            Self::Database(d) => ObjectKey::new(ObjectType::Database, d.name.clone()),
            Self::Table(t) => t.key(),
            Self::Routine(r) => r
                .key()
                .unwrap_or_else(|| ObjectKey::new(ObjectType::Procedure, String::new())),
        }
    }

    /// Kind of change.
    #[must_use]
    pub const fn diff_type(&self) -> DiffType {
        match self {
            Self::Database(_) => DiffType::Alter,
            Self::Table(t) => t.diff_type,
            Self::Routine(r) => r.diff_type,
        }
    }

    /// DDL statements for this object under `mods`.
    pub fn statements(&self, mods: &StatementModifiers) -> Result<Vec<String>> {
        match self {
            Self::Database(d) => Ok(vec![d.statement()]),
            Self::Table(t) => t.statements(mods),
            Self::Routine(r) => Ok(r.statements()),
        }
    }
}

/// Every object difference between two schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    /// Diffs in execution order: database defaults, tables (creates,
    /// alters, drops), then routines in the same pattern.
    pub object_diffs: Vec<ObjectDiff>,
}

impl SchemaDiff {
    /// Compares `from` against `to`.
    #[must_use]
    pub fn new(from: &Schema, to: &Schema) -> Self {
        let mut object_diffs = Vec::new();
        object_diffs.extend(DatabaseDiff::new(from, to).map(ObjectDiff::Database));

        let from_tables: HashSet<&str> = from.tables.iter().map(|t| t.name.as_str()).collect();
        let to_tables: HashSet<&str> = to.tables.iter().map(|t| t.name.as_str()).collect();
        object_diffs.extend(
            to.tables
                .iter()
                .filter(|t| !from_tables.contains(t.name.as_str()))
                .map(|t| ObjectDiff::Table(TableDiff::create(t.clone()))),
        );
        object_diffs.extend(to.tables.iter().filter_map(|t| {
            from.table(&t.name)
                .and_then(|old| TableDiff::alter(old, t))
                .map(ObjectDiff::Table)
        }));
        object_diffs.extend(
            from.tables
                .iter()
                .filter(|t| !to_tables.contains(t.name.as_str()))
                .map(|t| ObjectDiff::Table(TableDiff::drop(t.clone()))),
        );

        let from_routines: HashSet<ObjectKey> = from.routines.iter().map(Routine::key).collect();
        let to_routines: HashSet<ObjectKey> = to.routines.iter().map(Routine::key).collect();
        object_diffs.extend(
            to.routines
                .iter()
                .filter(|r| !from_routines.contains(&r.key()))
                .map(|r| ObjectDiff::Routine(RoutineDiff::create(r.clone()))),
        );
        object_diffs.extend(to.routines.iter().filter_map(|r| {
            from.routine(&r.name, r.routine_type)
                .and_then(|old| RoutineDiff::alter(old, r))
                .map(ObjectDiff::Routine)
        }));
        object_diffs.extend(
            from.routines
                .iter()
                .filter(|r| !to_routines.contains(&r.key()))
                .map(|r| ObjectDiff::Routine(RoutineDiff::drop(r.clone()))),
        );

        tracing::debug!(
            from = %from.name,
            to = %to.name,
            objects = object_diffs.len(),
            "computed schema diff"
        );
        Self { object_diffs }
    }

    /// Returns `true` if the schemas do not differ.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.object_diffs.is_empty()
    }

    /// Number of changed objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.object_diffs.len()
    }

    /// Table diffs only.
    pub fn table_diffs(&self) -> impl Iterator<Item = &TableDiff> {
        self.object_diffs.iter().filter_map(|d| match d {
            ObjectDiff::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Keys of tables whose diff is unsupported.
    #[must_use]
    pub fn unsupported_keys(&self) -> Vec<ObjectKey> {
        self.table_diffs()
            .filter(|t| !t.supported)
            .map(TableDiff::key)
            .collect()
    }

    /// Every DDL statement, in order. Fails on the first object whose
    /// statements cannot be produced under `mods`.
    pub fn statements(&self, mods: &StatementModifiers) -> Result<Vec<String>> {
        let mut all = Vec::new();
        for diff in &self.object_diffs {
            all.extend(diff.statements(mods)?);
        }
        Ok(all)
    }
}

impl Schema {
    /// Diff from this schema to `to`.
    #[must_use]
    pub fn diff(&self, to: &Self) -> SchemaDiff {
        SchemaDiff::new(self, to)
    }
}
