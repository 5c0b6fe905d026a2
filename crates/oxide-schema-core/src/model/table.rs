//! Tables and CREATE TABLE generation.

use serde::{Deserialize, Serialize};

use crate::charset::{CharsetCatalog, CharsetView};
use crate::flavor::Flavor;

use super::check::Check;
use super::column::{strip_display_width, Column};
use super::escape::{escape_value_for_create_table, quote_identifier};
use super::foreign_key::ForeignKey;
use super::index::Index;
use super::object::{ObjectKey, ObjectType};
use super::partition::TablePartitioning;

/// A table snapshot as introspected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Storage engine.
    pub engine: String,
    /// Default character set.
    pub charset: String,
    /// Default collation.
    pub collation: String,
    /// `COLLATE=` must be shown even when default. Recovered from
    /// introspection.
    pub show_collation: bool,
    /// Columns in order.
    pub columns: Vec<Column>,
    /// Primary key.
    pub primary_key: Option<Index>,
    /// Secondary indexes in SHOW CREATE order.
    pub secondary_indexes: Vec<Index>,
    /// Foreign keys.
    pub foreign_keys: Vec<ForeignKey>,
    /// Table-level check constraints.
    pub checks: Vec<Check>,
    /// Partitioning, if any.
    pub partitioning: Option<TablePartitioning>,
    /// Next AUTO_INCREMENT value; shown only when greater than 1.
    pub next_auto_increment: u64,
    /// Create options exactly as shown, e.g. `ROW_FORMAT=COMPRESSED`.
    pub create_options: String,
    /// Table comment, unescaped.
    pub comment: String,
    /// Raw SHOW CREATE TABLE text; empty when not introspected.
    pub create_statement: String,
    /// The table uses DDL that cannot be diffed.
    pub unsupported_ddl: bool,
}

impl Table {
    /// Identity of this table.
    #[must_use]
    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(ObjectType::Table, self.name.clone())
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks up a secondary index by name.
    #[must_use]
    pub fn secondary_index(&self, name: &str) -> Option<&Index> {
        self.secondary_indexes.iter().find(|i| i.name == name)
    }

    /// Looks up a foreign key by name.
    #[must_use]
    pub fn foreign_key(&self, name: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.name == name)
    }

    /// Looks up a check constraint by name.
    #[must_use]
    pub fn check(&self, name: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// CREATE TABLE text the server would show for this table, using the
    /// process-wide charset catalog.
    #[must_use]
    pub fn generated_create_statement(&self, flavor: Flavor) -> String {
        let view = CharsetCatalog::global().view(flavor);
        self.generated_create_statement_in(flavor, &view)
    }

    /// CREATE TABLE text the server would show for this table, resolving
    /// default collations through `charsets`.
    #[must_use]
    pub fn generated_create_statement_in(&self, flavor: Flavor, charsets: &CharsetView) -> String {
        let mut defs: Vec<String> = self
            .columns
            .iter()
            .map(|c| c.definition(flavor, self))
            .collect();
        defs.extend(self.primary_key.iter().map(|pk| pk.definition(flavor)));
        defs.extend(self.secondary_indexes.iter().map(|i| i.definition(flavor)));

        let mut fks: Vec<&ForeignKey> = self.foreign_keys.iter().collect();
        if flavor.sorted_foreign_keys() {
            fks.sort_by(|a, b| a.name.cmp(&b.name));
        }
        defs.extend(fks.into_iter().map(ForeignKey::definition));
        defs.extend(self.checks.iter().map(|c| c.definition(flavor)));

        let mut stmt = format!(
            "CREATE TABLE {} (\n  {}\n) ENGINE={}",
            quote_identifier(&self.name),
            defs.join(",\n  "),
            self.engine
        );
        if self.next_auto_increment > 1 {
            stmt.push_str(&format!(" AUTO_INCREMENT={}", self.next_auto_increment));
        }
        stmt.push_str(" DEFAULT CHARSET=");
        stmt.push_str(&self.charset);
        if flavor.always_show_collate()
            || self.show_collation
            || !charsets.is_default_collation(&self.charset, &self.collation)
        {
            stmt.push_str(" COLLATE=");
            stmt.push_str(&self.collation);
        }
        if !self.create_options.is_empty() {
            stmt.push(' ');
            stmt.push_str(&self.create_options);
        }
        if !self.comment.is_empty() {
            stmt.push_str(&format!(
                " COMMENT='{}'",
                escape_value_for_create_table(&self.comment)
            ));
        }
        if let Some(p) = &self.partitioning {
            stmt.push_str(&p.definition(flavor));
        }
        stmt
    }

    /// The raw CREATE text if introspected, otherwise the generated one.
    #[must_use]
    pub fn create_statement_or_generated(&self, flavor: Flavor) -> String {
        if self.create_statement.is_empty() {
            self.generated_create_statement(flavor)
        } else {
            self.create_statement.clone()
        }
    }

    /// DROP TABLE statement.
    #[must_use]
    pub fn drop_statement(&self) -> String {
        format!("DROP TABLE {}", quote_identifier(&self.name))
    }

    /// Whether this table uses DDL that cannot be diffed: RANGE or LIST
    /// partitioning with HASH or KEY sub-partitioning, or raw CREATE text
    /// that the generator does not reproduce. Uses the process-wide
    /// charset catalog.
    #[must_use]
    pub fn compute_unsupported_ddl(&self, flavor: Flavor) -> bool {
        let view = CharsetCatalog::global().view(flavor);
        self.compute_unsupported_ddl_in(flavor, &view)
    }

    /// [`compute_unsupported_ddl`](Self::compute_unsupported_ddl) with
    /// default collations resolved through `charsets`.
    #[must_use]
    pub fn compute_unsupported_ddl_in(&self, flavor: Flavor, charsets: &CharsetView) -> bool {
        if self
            .partitioning
            .as_ref()
            .is_some_and(TablePartitioning::has_hash_subpartitioning)
        {
            return true;
        }
        !self.create_statement.is_empty()
            && self.create_statement != self.generated_create_statement_in(flavor, charsets)
    }

    /// Recomputes [`unsupported_ddl`](Self::unsupported_ddl).
    pub fn refresh_unsupported_ddl(&mut self, flavor: Flavor) {
        let view = CharsetCatalog::global().view(flavor);
        self.refresh_unsupported_ddl_in(flavor, &view);
    }

    /// Recomputes [`unsupported_ddl`](Self::unsupported_ddl) against
    /// `charsets`.
    pub fn refresh_unsupported_ddl_in(&mut self, flavor: Flavor, charsets: &CharsetView) {
        self.unsupported_ddl = self.compute_unsupported_ddl_in(flavor, charsets);
        if self.unsupported_ddl {
            tracing::warn!(table = %self.name, %flavor, "table uses unsupported DDL");
        }
    }

    /// CREATE text with the partitioning clause removed. The raw text is
    /// trimmed when it ends with the expected clause; otherwise the
    /// statement is regenerated.
    #[must_use]
    pub fn unpartitioned_create_statement(&self, flavor: Flavor) -> String {
        let Some(p) = &self.partitioning else {
            return self.create_statement_or_generated(flavor);
        };
        if let Some(base) = self.create_statement.strip_suffix(&p.definition(flavor)) {
            return base.to_string();
        }
        let mut copy = self.clone();
        copy.partitioning = None;
        copy.generated_create_statement(flavor)
    }

    /// Rewrites this table as if it were unpartitioned.
    pub fn strip_partitioning(&mut self, flavor: Flavor) {
        if self.partitioning.is_none() {
            return;
        }
        self.create_statement = self.unpartitioned_create_statement(flavor);
        self.partitioning = None;
        self.refresh_unsupported_ddl(flavor);
    }

    /// Removes integer display widths from every column. Idempotent.
    /// Returns whether anything changed.
    pub fn strip_int_display_widths(&mut self, flavor: Flavor) -> bool {
        let mut replaced = Vec::new();
        for col in &mut self.columns {
            let (stripped, changed) = strip_display_width(&col.type_in_db);
            if changed {
                let before = col.definition_in(flavor, &self.collation);
                col.type_in_db = stripped;
                replaced.push((before, col.definition_in(flavor, &self.collation)));
            }
        }
        if replaced.is_empty() {
            return false;
        }
        if !self.create_statement.is_empty() {
            if self.unsupported_ddl {
                for (before, after) in &replaced {
                    self.create_statement = self.create_statement.replace(before, after);
                }
            } else {
                self.create_statement = self.generated_create_statement(flavor);
            }
            self.refresh_unsupported_ddl(flavor);
        }
        true
    }
}
