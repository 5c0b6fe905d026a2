//! Table diffs.

use std::collections::HashSet;

use crate::error::{DiffError, Result};
use crate::model::{
    normalize_charset, normalize_collation, quote_identifier, ObjectKey, Table,
    TablePartitioning,
};

use super::clause::{ColumnPosition, TableAlterClause};
use super::modifiers::{PartitioningMode, StatementModifiers};
use super::DiffType;

// ================================================================
// Facet helpers
// ================================================================

/// Names in the longest common subsequence of `a` and `b`. Columns outside
/// it are the ones that moved.
fn longest_common_subsequence<'a>(a: &[&'a str], b: &[&str]) -> HashSet<&'a str> {
    let (n, m) = (a.len(), b.len());
    let mut lengths = vec![vec![0_usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i][j] = if a[i] == b[j] {
                lengths[i + 1][j + 1] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
        }
    }
    let mut common = HashSet::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            common.insert(a[i]);
            i += 1;
            j += 1;
        } else if lengths[i + 1][j] >= lengths[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    common
}

fn diff_columns(from: &Table, to: &Table, clauses: &mut Vec<TableAlterClause>) {
    for col in &from.columns {
        if to.column(&col.name).is_none() {
            clauses.push(TableAlterClause::DropColumn {
                column: col.clone(),
            });
        }
    }

    let old_order: Vec<&str> = from
        .columns
        .iter()
        .filter(|c| to.column(&c.name).is_some())
        .map(|c| c.name.as_str())
        .collect();
    let new_order: Vec<&str> = to
        .columns
        .iter()
        .filter(|c| from.column(&c.name).is_some())
        .map(|c| c.name.as_str())
        .collect();
    let stable = longest_common_subsequence(&old_order, &new_order);

    for (i, col) in to.columns.iter().enumerate() {
        let position = match i.checked_sub(1) {
            None => ColumnPosition::First,
            Some(prev) => ColumnPosition::After(to.columns[prev].name.clone()),
        };
        match from.column(&col.name) {
            None => clauses.push(TableAlterClause::AddColumn {
                column: col.clone(),
                table_collation: to.collation.clone(),
                position: (i + 1 < to.columns.len()).then_some(position),
            }),
            Some(old) => {
                let moved = !stable.contains(col.name.as_str());
                if moved || !old.equivalent(col) {
                    clauses.push(TableAlterClause::ModifyColumn {
                        old: old.clone(),
                        new: col.clone(),
                        table_collation: to.collation.clone(),
                        position: moved.then_some(position),
                    });
                }
            }
        }
    }
}

fn diff_indexes(from: &Table, to: &Table, clauses: &mut Vec<TableAlterClause>) {
    let mut drops = Vec::new();
    let mut adds = Vec::new();
    let mut visibility = Vec::new();

    match (&from.primary_key, &to.primary_key) {
        (Some(old), Some(new)) if old != new => {
            drops.push(TableAlterClause::DropIndex { index: old.clone() });
            adds.push(TableAlterClause::AddIndex { index: new.clone() });
        }
        (Some(old), None) => drops.push(TableAlterClause::DropIndex { index: old.clone() }),
        (None, Some(new)) => adds.push(TableAlterClause::AddIndex { index: new.clone() }),
        _ => {}
    }

    for old in &from.secondary_indexes {
        match to.secondary_index(&old.name) {
            Some(new) if old.equals_ignoring_visibility(new) => {
                if old.invisible != new.invisible {
                    visibility.push(TableAlterClause::AlterIndexVisibility {
                        name: new.name.clone(),
                        invisible: new.invisible,
                    });
                }
            }
            _ => drops.push(TableAlterClause::DropIndex { index: old.clone() }),
        }
    }
    for new in &to.secondary_indexes {
        let unchanged = from
            .secondary_index(&new.name)
            .is_some_and(|old| old.equals_ignoring_visibility(new));
        if !unchanged {
            adds.push(TableAlterClause::AddIndex { index: new.clone() });
        }
    }

    clauses.extend(drops);
    clauses.extend(adds);
    clauses.extend(visibility);
}

fn diff_foreign_keys(from: &Table, to: &Table, clauses: &mut Vec<TableAlterClause>) {
    for old in &from.foreign_keys {
        if to.foreign_key(&old.name) != Some(old) {
            clauses.push(TableAlterClause::DropForeignKey {
                name: old.name.clone(),
            });
        }
    }
    for new in &to.foreign_keys {
        if from.foreign_key(&new.name) != Some(new) {
            clauses.push(TableAlterClause::AddForeignKey {
                foreign_key: new.clone(),
            });
        }
    }
}

fn diff_checks(from: &Table, to: &Table, clauses: &mut Vec<TableAlterClause>) {
    for old in &from.checks {
        if to.check(&old.name) != Some(old) {
            clauses.push(TableAlterClause::DropCheck {
                name: old.name.clone(),
            });
        }
    }
    for new in &to.checks {
        if from.check(&new.name) != Some(new) {
            clauses.push(TableAlterClause::AddCheck { check: new.clone() });
        }
    }
}

fn same_scheme(a: &TablePartitioning, b: &TablePartitioning) -> bool {
    a.method == b.method
        && a.expression == b.expression
        && a.sub_method == b.sub_method
        && a.sub_expression == b.sub_expression
        && a.sub_partition_count == b.sub_partition_count
}

fn diff_partitioning(from: &Table, to: &Table) -> Option<TableAlterClause> {
    match (&from.partitioning, &to.partitioning) {
        (None, None) => None,
        (None, Some(new)) => Some(TableAlterClause::PartitionBy {
            partitioning: new.clone(),
        }),
        (Some(_), None) => Some(TableAlterClause::RemovePartitioning),
        (Some(old), Some(new)) if old == new => None,
        (Some(old), Some(new)) => {
            if same_scheme(old, new) && old.is_range_or_list() {
                if new.partitions.starts_with(&old.partitions) {
                    return Some(TableAlterClause::ModifyPartitions {
                        partitioning: new.clone(),
                        add: new.partitions[old.partitions.len()..].to_vec(),
                        drop: Vec::new(),
                    });
                }
                let mut remaining = old.partitions.iter();
                let kept_in_order = new
                    .partitions
                    .iter()
                    .all(|p| remaining.any(|candidate| candidate == p));
                if kept_in_order {
                    let drop = old
                        .partitions
                        .iter()
                        .filter(|p| !new.partitions.iter().any(|n| n.name == p.name))
                        .map(|p| p.name.clone())
                        .collect();
                    return Some(TableAlterClause::ModifyPartitions {
                        partitioning: new.clone(),
                        add: Vec::new(),
                        drop,
                    });
                }
            }
            Some(TableAlterClause::PartitionBy {
                partitioning: new.clone(),
            })
        }
    }
}

impl Table {
    fn blocks_diff(&self) -> bool {
        self.unsupported_ddl
            || self
                .partitioning
                .as_ref()
                .is_some_and(TablePartitioning::has_hash_subpartitioning)
    }

    /// ALTER clauses that turn `self` into `to`, and whether the diff is
    /// supported. Unsupported diffs return no clauses. A side counts as
    /// unsupported when flagged or when its partitioning cannot be diffed,
    /// whether or not the flag was refreshed.
    ///
    /// Clause order is engine, default charset, columns, indexes, foreign
    /// keys, checks, auto-increment, comment, create options, partitioning.
    #[must_use]
    pub fn diff(&self, to: &Self) -> (Vec<TableAlterClause>, bool) {
        if self.blocks_diff() || to.blocks_diff() {
            tracing::debug!(table = %to.name, "skipping diff of unsupported table");
            return (Vec::new(), false);
        }
        let mut clauses = Vec::new();

        if self.engine != to.engine {
            clauses.push(TableAlterClause::ChangeStorageEngine {
                old: self.engine.clone(),
                new: to.engine.clone(),
            });
        }
        if normalize_charset(&self.charset) != normalize_charset(&to.charset)
            || normalize_collation(&self.collation) != normalize_collation(&to.collation)
        {
            clauses.push(TableAlterClause::ChangeCharSet {
                charset: to.charset.clone(),
                collation: to.collation.clone(),
            });
        }

        diff_columns(self, to, &mut clauses);
        diff_indexes(self, to, &mut clauses);
        diff_foreign_keys(self, to, &mut clauses);
        diff_checks(self, to, &mut clauses);

        if self.next_auto_increment != to.next_auto_increment {
            clauses.push(TableAlterClause::ChangeAutoIncrement {
                old: self.next_auto_increment,
                new: to.next_auto_increment,
            });
        }
        if self.comment != to.comment {
            clauses.push(TableAlterClause::ChangeComment {
                comment: to.comment.clone(),
            });
        }
        if self.create_options != to.create_options {
            clauses.push(TableAlterClause::ChangeCreateOptions {
                old: self.create_options.clone(),
                new: to.create_options.clone(),
            });
        }
        clauses.extend(diff_partitioning(self, to));

        (clauses, true)
    }
}

// ================================================================
// TableDiff
// ================================================================

/// Difference of one table between two schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDiff {
    /// Create, drop or alter.
    pub diff_type: DiffType,
    /// Table before; `None` for creates.
    pub from: Option<Table>,
    /// Table after; `None` for drops.
    pub to: Option<Table>,
    /// ALTER clauses; empty for creates and drops.
    pub clauses: Vec<TableAlterClause>,
    /// `false` if either side uses unsupported DDL.
    pub supported: bool,
}

impl TableDiff {
    /// A new table.
    #[must_use]
    pub fn create(table: Table) -> Self {
        Self {
            diff_type: DiffType::Create,
            from: None,
            to: Some(table),
            clauses: Vec::new(),
            supported: true,
        }
    }

    /// A removed table.
    #[must_use]
    pub fn drop(table: Table) -> Self {
        Self {
            diff_type: DiffType::Drop,
            from: Some(table),
            to: None,
            clauses: Vec::new(),
            supported: true,
        }
    }

    /// A changed table, or `None` if nothing changed.
    #[must_use]
    pub fn alter(from: &Table, to: &Table) -> Option<Self> {
        let (clauses, supported) = from.diff(to);
        if (supported && clauses.is_empty()) || (!supported && from == to) {
            return None;
        }
        Some(Self {
            diff_type: DiffType::Alter,
            from: Some(from.clone()),
            to: Some(to.clone()),
            clauses,
            supported,
        })
    }

    fn table(&self) -> Option<&Table> {
        self.to.as_ref().or(self.from.as_ref())
    }

    /// Identity of the table.
    #[must_use]
    pub fn key(&self) -> ObjectKey {
        self.table().map(Table::key).unwrap_or_else(|| {
            ObjectKey::new(crate::model::ObjectType::Table, String::new())
        })
    }

    fn alter_statement<'a>(
        &self,
        mods: &StatementModifiers,
        clauses: impl Iterator<Item = &'a TableAlterClause>,
    ) -> Result<String> {
        let mut regular = Vec::new();
        let mut partitioning = Vec::new();
        for clause in clauses {
            let sql = clause.clause(mods);
            if sql.is_empty() {
                continue;
            }
            if !mods.allow_unsafe {
                if let Some(reason) = clause.unsafe_reason() {
                    return Err(DiffError::Unsafe {
                        key: self.key(),
                        reason,
                    });
                }
            }
            if clause.is_partition_clause() {
                partitioning.push(sql);
            } else {
                regular.push(sql);
            }
        }
        if regular.is_empty() && partitioning.is_empty() {
            return Ok(String::new());
        }
        let name = self.table().map(|t| t.name.as_str()).unwrap_or_default();
        let mut stmt = format!("ALTER TABLE {}", quote_identifier(name));
        if !regular.is_empty() {
            stmt.push(' ');
            stmt.push_str(&regular.join(", "));
        }
        for clause in partitioning {
            stmt.push(' ');
            stmt.push_str(&clause);
        }
        Ok(stmt)
    }

    /// Single DDL statement for this diff; empty if `mods` suppress every
    /// clause.
    pub fn statement(&self, mods: &StatementModifiers) -> Result<String> {
        if !self.supported {
            return if mods.skip_unsupported {
                Ok(String::new())
            } else {
                Err(DiffError::Unsupported { key: self.key() })
            };
        }
        match (self.diff_type, &self.from, &self.to) {
            (DiffType::Create, _, Some(to)) => {
                if mods.partitioning == PartitioningMode::Remove && to.partitioning.is_some() {
                    Ok(to.unpartitioned_create_statement(mods.flavor))
                } else {
                    Ok(to.create_statement_or_generated(mods.flavor))
                }
            }
            (DiffType::Drop, Some(from), _) => {
                if mods.allow_unsafe {
                    Ok(from.drop_statement())
                } else {
                    Err(DiffError::Unsafe {
                        key: self.key(),
                        reason: "drops table".to_string(),
                    })
                }
            }
            _ => self.alter_statement(mods, self.clauses.iter()),
        }
    }

    /// DDL statements for this diff. A foreign key dropped and re-added
    /// under the same name is re-added by a second ALTER TABLE, since the
    /// server rejects both in one statement.
    pub fn statements(&self, mods: &StatementModifiers) -> Result<Vec<String>> {
        if self.diff_type != DiffType::Alter || !self.supported {
            let stmt = self.statement(mods)?;
            return Ok(if stmt.is_empty() { Vec::new() } else { vec![stmt] });
        }
        let dropped: HashSet<&str> = self
            .clauses
            .iter()
            .filter_map(|c| match c {
                TableAlterClause::DropForeignKey { name } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        let deferred = |c: &TableAlterClause| {
            matches!(c, TableAlterClause::AddForeignKey { foreign_key }
                if dropped.contains(foreign_key.name.as_str()))
        };
        let first = self.alter_statement(mods, self.clauses.iter().filter(|&c| !deferred(c)))?;
        let second = self.alter_statement(mods, self.clauses.iter().filter(|&c| deferred(c)))?;
        Ok([first, second]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavor::Flavor;
    use crate::model::{Column, ForeignKey, Index, Partition};

    fn mods() -> StatementModifiers {
        StatementModifiers::for_flavor(Flavor::new(crate::flavor::Vendor::MySql, 8, 0, 36))
    }

    fn col(name: &str) -> Column {
        Column::new(name, "int")
    }

    fn table(columns: &[&str]) -> Table {
        Table {
            name: "t".into(),
            engine: "InnoDB".into(),
            charset: "utf8mb4".into(),
            collation: "utf8mb4_0900_ai_ci".into(),
            columns: columns.iter().map(|c| col(c)).collect(),
            primary_key: Some(Index::primary([columns[0]])),
            ..Table::default()
        }
    }

    fn rendered(from: &Table, to: &Table) -> Vec<String> {
        let (clauses, supported) = from.diff(to);
        assert!(supported);
        clauses.iter().map(|c| c.clause(&mods())).collect()
    }

    // ============================================================
    // Columns
    // ============================================================

    #[test]
    fn self_diff_is_empty() {
        let t = table(&["id", "a", "b"]);
        assert_eq!(t.diff(&t), (vec![], true));
    }

    #[test]
    fn drops_then_adds_in_order() {
        let from = table(&["id", "a", "b"]);
        let to = table(&["id", "x", "b", "y"]);
        assert_eq!(
            rendered(&from, &to),
            [
                "DROP COLUMN `a`",
                "ADD COLUMN `x` int NOT NULL AFTER `id`",
                "ADD COLUMN `y` int NOT NULL",
            ]
        );
    }

    #[test]
    fn moved_column_gets_a_position() {
        let from = table(&["id", "a", "b", "c"]);
        let to = table(&["id", "c", "a", "b"]);
        assert_eq!(
            rendered(&from, &to),
            ["MODIFY COLUMN `c` int NOT NULL AFTER `id`"]
        );
    }

    #[test]
    fn default_change_is_single_modify() {
        let from = table(&["id", "a"]);
        let mut to = from.clone();
        to.columns[1].default = Some("'5'".into());
        let (clauses, supported) = from.diff(&to);
        assert!(supported);
        assert_eq!(clauses.len(), 1);
        assert!(matches!(
            &clauses[0],
            TableAlterClause::ModifyColumn { new, position: None, .. } if new.name == "a"
        ));
    }

    #[test]
    fn display_width_noise_is_ignored() {
        let mut from = table(&["id", "a"]);
        from.columns[1].type_in_db = "int(11)".into();
        let to = table(&["id", "a"]);
        assert_eq!(from.diff(&to), (vec![], true));
    }

    #[test]
    fn lcs_keeps_longest_run() {
        let common = longest_common_subsequence(&["a", "b", "c", "d"], &["b", "c", "d", "a"]);
        assert_eq!(common, HashSet::from(["b", "c", "d"]));
    }

    // ============================================================
    // Indexes, foreign keys and table options
    // ============================================================

    #[test]
    fn index_changes() {
        let mut from = table(&["id", "a", "b"]);
        from.secondary_indexes = vec![
            Index::secondary("ia", ["a"], false),
            Index::secondary("ib", ["b"], false),
            Index::secondary("gone", ["a", "b"], false),
        ];
        let mut to = from.clone();
        to.primary_key = Some(Index::primary(["id", "a"]));
        to.secondary_indexes = vec![
            Index::secondary("ia", ["a", "b"], false),
            Index::secondary("ib", ["b"], false),
            Index::secondary("new", ["b"], true),
        ];
        to.secondary_indexes[1].invisible = true;
        assert_eq!(
            rendered(&from, &to),
            [
                "DROP PRIMARY KEY",
                "DROP KEY `ia`",
                "DROP KEY `gone`",
                "ADD PRIMARY KEY (`id`,`a`)",
                "ADD KEY `ia` (`a`,`b`)",
                "ADD UNIQUE KEY `new` (`b`)",
                "ALTER INDEX `ib` INVISIBLE",
            ]
        );
    }

    fn fk(name: &str, table: &str) -> ForeignKey {
        ForeignKey {
            name: name.into(),
            columns: vec!["a".into()],
            referenced_table: table.into(),
            referenced_columns: vec!["id".into()],
            ..ForeignKey::default()
        }
    }

    #[test]
    fn redefined_foreign_key_is_split() {
        let mut from = table(&["id", "a"]);
        from.foreign_keys = vec![fk("fk_a", "parent")];
        let mut to = from.clone();
        to.foreign_keys = vec![fk("fk_a", "other_parent")];
        to.comment = "changed".into();
        let diff = TableDiff::alter(&from, &to).unwrap();
        assert_eq!(
            diff.statements(&mods()).unwrap(),
            [
                "ALTER TABLE `t` DROP FOREIGN KEY `fk_a`, COMMENT 'changed'",
                "ALTER TABLE `t` ADD CONSTRAINT `fk_a` FOREIGN KEY (`a`) REFERENCES `other_parent` (`id`)",
            ]
        );
        assert_eq!(diff.statement(&mods()).unwrap().matches("ALTER TABLE").count(), 1);
    }

    #[test]
    fn table_option_order() {
        let from = table(&["id"]);
        let mut to = from.clone();
        to.engine = "MyISAM".into();
        to.charset = "latin1".into();
        to.collation = "latin1_swedish_ci".into();
        to.next_auto_increment = 10;
        to.create_options = "ROW_FORMAT=DYNAMIC".into();
        let (clauses, _) = from.diff(&to);
        assert!(matches!(
            clauses.as_slice(),
            [
                TableAlterClause::ChangeStorageEngine { .. },
                TableAlterClause::ChangeCharSet { .. },
                TableAlterClause::ChangeAutoIncrement { old: 0, new: 10 },
                TableAlterClause::ChangeCreateOptions { .. },
            ]
        ));
    }

    #[test]
    fn charset_alias_is_not_a_change() {
        let mut from = table(&["id"]);
        from.charset = "utf8".into();
        from.collation = "utf8_general_ci".into();
        let mut to = from.clone();
        to.charset = "utf8mb3".into();
        to.collation = "utf8mb3_general_ci".into();
        assert_eq!(from.diff(&to), (vec![], true));
    }

    // ============================================================
    // Statements
    // ============================================================

    #[test]
    fn unsafe_clauses_need_permission() {
        let from = table(&["id", "a"]);
        let to = table(&["id"]);
        let diff = TableDiff::alter(&from, &to).unwrap();
        let err = diff.statement(&mods()).unwrap_err();
        assert!(matches!(err, DiffError::Unsafe { ref reason, .. } if reason == "drops column `a`"));
        let allowed = StatementModifiers {
            allow_unsafe: true,
            ..mods()
        };
        assert_eq!(
            diff.statement(&allowed).unwrap(),
            "ALTER TABLE `t` DROP COLUMN `a`"
        );
    }

    #[test]
    fn suppressed_clauses_yield_no_statement() {
        let from = table(&["id"]);
        let mut to = from.clone();
        to.next_auto_increment = 100;
        let diff = TableDiff::alter(&from, &to).unwrap();
        assert_eq!(diff.statement(&mods()).unwrap(), "");
        assert!(diff.statements(&mods()).unwrap().is_empty());
    }

    #[test]
    fn drop_table_is_unsafe() {
        let diff = TableDiff::drop(table(&["id"]));
        assert!(matches!(diff.statement(&mods()), Err(DiffError::Unsafe { .. })));
    }

    #[test]
    fn unsupported_side_short_circuits() {
        let from = table(&["id"]);
        let mut to = table(&["id", "a"]);
        to.unsupported_ddl = true;
        assert_eq!(from.diff(&to), (vec![], false));
        let diff = TableDiff::alter(&from, &to).unwrap();
        assert!(matches!(diff.statement(&mods()), Err(DiffError::Unsupported { .. })));
        let skip = StatementModifiers {
            skip_unsupported: true,
            ..mods()
        };
        assert_eq!(diff.statement(&skip).unwrap(), "");
    }

    #[test]
    fn subpartitioned_side_is_unsupported_without_refresh() {
        let mut from = table(&["id"]);
        let mut scheme = ranged(&[("p0", "MAXVALUE")]);
        scheme.sub_method = "HASH".into();
        scheme.sub_expression = "`id`".into();
        scheme.sub_partition_count = 2;
        from.partitioning = Some(scheme);
        let mut to = from.clone();
        to.columns.push(col("a"));
        assert!(!from.unsupported_ddl);
        assert!(!to.unsupported_ddl);

        assert_eq!(from.diff(&to), (vec![], false));
        assert_eq!(to.diff(&table(&["id"])), (vec![], false));
        let diff = TableDiff::alter(&from, &to).unwrap();
        assert!(!diff.supported);
    }

    // ============================================================
    // Partitioning
    // ============================================================

    fn ranged(bounds: &[(&str, &str)]) -> TablePartitioning {
        TablePartitioning {
            method: "RANGE".into(),
            expression: "`id`".into(),
            partitions: bounds
                .iter()
                .map(|(name, values)| Partition {
                    name: (*name).into(),
                    values: (*values).into(),
                    engine: "InnoDB".into(),
                    ..Partition::default()
                })
                .collect(),
            ..TablePartitioning::default()
        }
    }

    #[test]
    fn appended_and_dropped_partitions() {
        let mut from = table(&["id"]);
        from.partitioning = Some(ranged(&[("p0", "100"), ("p1", "200")]));
        let mut to = from.clone();
        to.partitioning = Some(ranged(&[("p0", "100"), ("p1", "200"), ("p2", "300")]));
        assert_eq!(
            rendered(&from, &to),
            ["ADD PARTITION (PARTITION p2 VALUES LESS THAN (300) ENGINE = InnoDB)"]
        );

        to.partitioning = Some(ranged(&[("p1", "200")]));
        let (clauses, _) = from.diff(&to);
        assert_eq!(clauses[0].clause(&mods()), "DROP PARTITION p0");
        assert!(clauses[0].is_unsafe());
    }

    #[test]
    fn partition_clauses_follow_the_list() {
        let from = table(&["id"]);
        let mut to = table(&["id", "a"]);
        to.partitioning = Some(ranged(&[("p0", "MAXVALUE")]));
        let diff = TableDiff::alter(&from, &to).unwrap();
        assert_eq!(
            diff.statement(&mods()).unwrap(),
            "ALTER TABLE `t` ADD COLUMN `a` int NOT NULL PARTITION BY RANGE (`id`)\n\
             (PARTITION p0 VALUES LESS THAN MAXVALUE ENGINE = InnoDB)"
        );
    }

    #[test]
    fn removing_partitioning_depends_on_mode() {
        let mut from = table(&["id"]);
        from.partitioning = Some(ranged(&[("p0", "MAXVALUE")]));
        let to = table(&["id"]);
        let diff = TableDiff::alter(&from, &to).unwrap();
        assert_eq!(diff.statement(&mods()).unwrap(), "");
        let remove = StatementModifiers {
            partitioning: PartitioningMode::Remove,
            ..mods()
        };
        assert_eq!(
            diff.statement(&remove).unwrap(),
            "ALTER TABLE `t` REMOVE PARTITIONING"
        );
    }
}
