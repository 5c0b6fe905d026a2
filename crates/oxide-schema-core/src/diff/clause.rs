//! ALTER TABLE clauses.

use crate::model::{
    escape_value_for_create_table, normalize_charset, quote_identifier, strip_display_width,
    Check, Column, ForeignKey, Index, Partition, TablePartitioning,
};

use super::modifiers::{NextAutoIncMode, PartitioningMode, StatementModifiers};

/// Where a column lands after ADD or MODIFY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPosition {
    /// First column.
    First,
    /// Right after the named column.
    After(String),
}

impl ColumnPosition {
    fn sql(&self) -> String {
        match self {
            Self::First => " FIRST".to_string(),
            Self::After(name) => format!(" AFTER {}", quote_identifier(name)),
        }
    }
}

/// One clause of an ALTER TABLE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAlterClause {
    /// New column.
    AddColumn {
        /// Column to add.
        column: Column,
        /// Default collation of the table, for charset display.
        table_collation: String,
        /// Position, `None` when appended last.
        position: Option<ColumnPosition>,
    },
    /// Removed column.
    DropColumn {
        /// Column being dropped.
        column: Column,
    },
    /// Changed or moved column.
    ModifyColumn {
        /// Definition before.
        old: Column,
        /// Definition after.
        new: Column,
        /// Default collation of the table, for charset display.
        table_collation: String,
        /// New position, `None` when not moved.
        position: Option<ColumnPosition>,
    },
    /// New or redefined index.
    AddIndex {
        /// Index to add.
        index: Index,
    },
    /// Removed or redefined index.
    DropIndex {
        /// Index being dropped.
        index: Index,
    },
    /// Index visibility change only.
    AlterIndexVisibility {
        /// Index name.
        name: String,
        /// New visibility.
        invisible: bool,
    },
    /// New or redefined foreign key.
    AddForeignKey {
        /// Foreign key to add.
        foreign_key: ForeignKey,
    },
    /// Removed or redefined foreign key.
    DropForeignKey {
        /// Constraint name.
        name: String,
    },
    /// New or redefined check constraint.
    AddCheck {
        /// Check to add.
        check: Check,
    },
    /// Removed or redefined check constraint.
    DropCheck {
        /// Constraint name.
        name: String,
    },
    /// Storage engine change.
    ChangeStorageEngine {
        /// Engine before.
        old: String,
        /// Engine after.
        new: String,
    },
    /// Default character set or collation change.
    ChangeCharSet {
        /// New default character set.
        charset: String,
        /// New default collation.
        collation: String,
    },
    /// Next AUTO_INCREMENT value change.
    ChangeAutoIncrement {
        /// Value before.
        old: u64,
        /// Value after.
        new: u64,
    },
    /// Table comment change.
    ChangeComment {
        /// New comment, unescaped.
        comment: String,
    },
    /// Create options change.
    ChangeCreateOptions {
        /// Options before.
        old: String,
        /// Options after.
        new: String,
    },
    /// Partition a table, or repartition it differently.
    PartitionBy {
        /// New partitioning.
        partitioning: TablePartitioning,
    },
    /// Remove partitioning.
    RemovePartitioning,
    /// Add partitions at the end or drop some, keeping the scheme.
    ModifyPartitions {
        /// Partitioning after the change.
        partitioning: TablePartitioning,
        /// Partitions to append.
        add: Vec<Partition>,
        /// Partition names to drop.
        drop: Vec<String>,
    },
}

impl TableAlterClause {
    /// SQL text of this clause, or an empty string if `mods` suppress it.
    #[must_use]
    pub fn clause(&self, mods: &StatementModifiers) -> String {
        let flavor = mods.flavor;
        match self {
            Self::AddColumn {
                column,
                table_collation,
                position,
            } => format!(
                "ADD COLUMN {}{}",
                column.definition_in(flavor, table_collation),
                position.as_ref().map(ColumnPosition::sql).unwrap_or_default()
            ),
            Self::DropColumn { column } => {
                format!("DROP COLUMN {}", quote_identifier(&column.name))
            }
            Self::ModifyColumn {
                old,
                new,
                table_collation,
                position,
            } => {
                let position = if mods.lax_column_order {
                    None
                } else {
                    position.as_ref()
                };
                if position.is_none() && old.equivalent(new) {
                    return String::new();
                }
                format!(
                    "MODIFY COLUMN {}{}",
                    new.definition_in(flavor, table_collation),
                    position.map(ColumnPosition::sql).unwrap_or_default()
                )
            }
            Self::AddIndex { index } => format!("ADD {}", index.definition(flavor)),
            Self::DropIndex { index } if index.primary_key => "DROP PRIMARY KEY".to_string(),
            Self::DropIndex { index } => format!("DROP KEY {}", quote_identifier(&index.name)),
            Self::AlterIndexVisibility { name, invisible } => {
                let keyword = match (flavor.is_mariadb(&[]), invisible) {
                    (true, true) => "IGNORED",
                    (true, false) => "NOT IGNORED",
                    (false, true) => "INVISIBLE",
                    (false, false) => "VISIBLE",
                };
                format!("ALTER INDEX {} {keyword}", quote_identifier(name))
            }
            Self::AddForeignKey { foreign_key } => format!("ADD {}", foreign_key.definition()),
            Self::DropForeignKey { name } => {
                format!("DROP FOREIGN KEY {}", quote_identifier(name))
            }
            Self::AddCheck { check } => format!("ADD {}", check.definition(flavor)),
            Self::DropCheck { name } => {
                let keyword = if flavor.is_mariadb(&[]) {
                    "CONSTRAINT"
                } else {
                    "CHECK"
                };
                format!("DROP {keyword} {}", quote_identifier(name))
            }
            Self::ChangeStorageEngine { new, .. } => format!("ENGINE={new}"),
            Self::ChangeCharSet { charset, collation } => {
                format!("DEFAULT CHARACTER SET = {charset} COLLATE = {collation}")
            }
            Self::ChangeAutoIncrement { old, new } => {
                let emit = match mods.next_auto_inc {
                    NextAutoIncMode::Ignore => false,
                    NextAutoIncMode::IfIncreased => new > old,
                    NextAutoIncMode::IfAlready => *old > 1,
                    NextAutoIncMode::Always => true,
                };
                if emit {
                    format!("AUTO_INCREMENT = {new}")
                } else {
                    String::new()
                }
            }
            Self::ChangeComment { comment } => {
                format!("COMMENT '{}'", escape_value_for_create_table(comment))
            }
            Self::ChangeCreateOptions { old, new } => create_options_clause(old, new),
            Self::PartitionBy { partitioning } => partitioning.clause_body(flavor),
            Self::RemovePartitioning => match mods.partitioning {
                PartitioningMode::Keep => String::new(),
                PartitioningMode::Remove => "REMOVE PARTITIONING".to_string(),
            },
            Self::ModifyPartitions {
                partitioning,
                add,
                drop,
            } => {
                if !drop.is_empty() {
                    format!("DROP PARTITION {}", drop.join(", "))
                } else if !add.is_empty() {
                    format!("ADD PARTITION {}", partitioning.partition_list(add, flavor))
                } else {
                    String::new()
                }
            }
        }
    }

    /// Why this clause can lose data, if it can.
    #[must_use]
    pub fn unsafe_reason(&self) -> Option<String> {
        match self {
            Self::DropColumn { column } => Some(format!(
                "drops column {}",
                quote_identifier(&column.name)
            )),
            Self::ModifyColumn { old, new, .. } => unsafe_modification(old, new),
            Self::ChangeStorageEngine { old, new } => {
                Some(format!("changes storage engine from {old} to {new}"))
            }
            Self::ModifyPartitions { drop, .. } if !drop.is_empty() => {
                Some(format!("drops partitions {}", drop.join(", ")))
            }
            _ => None,
        }
    }

    /// Whether this clause can lose data.
    #[must_use]
    pub fn is_unsafe(&self) -> bool {
        self.unsafe_reason().is_some()
    }

    /// Partitioning clauses are appended after the comma-separated list.
    #[must_use]
    pub fn is_partition_clause(&self) -> bool {
        matches!(
            self,
            Self::PartitionBy { .. } | Self::RemovePartitioning | Self::ModifyPartitions { .. }
        )
    }
}

// ================================================================
// Unsafe column changes
// ================================================================

const INT_RANKS: &[&str] = &["tinyint", "smallint", "mediumint", "int", "bigint"];
const TEXT_RANKS: &[&str] = &["tinytext", "text", "mediumtext", "longtext"];
const BLOB_RANKS: &[&str] = &["tinyblob", "blob", "mediumblob", "longblob"];
const LENGTH_TYPES: &[&str] = &["char", "varchar", "binary", "varbinary"];

/// Splits `varchar(10) binary` into `("varchar", "10", " binary")`.
fn type_parts(type_in_db: &str) -> (&str, &str, &str) {
    let Some(open) = type_in_db.find('(') else {
        return match type_in_db.split_once(' ') {
            Some((base, _)) => (base, "", &type_in_db[base.len()..]),
            None => (type_in_db, "", ""),
        };
    };
    let close = type_in_db.rfind(')').unwrap_or(type_in_db.len());
    let args = type_in_db.get(open + 1..close).unwrap_or_default();
    let rest = type_in_db.get(close + 1..).unwrap_or_default();
    (&type_in_db[..open], args, rest)
}

fn rank(ranks: &[&str], base: &str) -> Option<usize> {
    ranks.iter().position(|r| *r == base)
}

fn decimal_bounds(args: &str) -> Option<(u32, u32)> {
    let (precision, scale) = args.split_once(',').unwrap_or((args, "0"));
    Some((precision.trim().parse().ok()?, scale.trim().parse().ok()?))
}

/// Whether every value of `old` fits `new` unchanged.
fn is_safe_type_change(old: &str, new: &str) -> bool {
    let (old, _) = strip_display_width(old);
    let (new, _) = strip_display_width(new);
    if old == new {
        return true;
    }
    let (old_base, old_args, old_rest) = type_parts(&old);
    let (new_base, new_args, new_rest) = type_parts(&new);
    if old_rest != new_rest {
        return false;
    }
    for ranks in [INT_RANKS, TEXT_RANKS, BLOB_RANKS] {
        if let (Some(a), Some(b)) = (rank(ranks, old_base), rank(ranks, new_base)) {
            return b >= a;
        }
    }
    if old_base != new_base {
        return false;
    }
    match old_base {
        base if LENGTH_TYPES.contains(&base) => {
            matches!((old_args.parse::<u32>(), new_args.parse::<u32>()), (Ok(a), Ok(b)) if b >= a)
        }
        "decimal" => match (decimal_bounds(old_args), decimal_bounds(new_args)) {
            (Some((op, os)), Some((np, ns))) => {
                ns >= os && np.saturating_sub(ns) >= op.saturating_sub(os)
            }
            _ => false,
        },
        "enum" | "set" => new_args.starts_with(old_args),
        _ => false,
    }
}

fn unsafe_modification(old: &Column, new: &Column) -> Option<String> {
    if !is_safe_type_change(&old.type_in_db, &new.type_in_db) {
        return Some(format!(
            "modifies column {} type from {} to {}",
            quote_identifier(&new.name),
            old.type_in_db,
            new.type_in_db
        ));
    }
    let charset_changed = !old.charset.is_empty()
        && !new.charset.is_empty()
        && normalize_charset(&old.charset) != normalize_charset(&new.charset);
    if charset_changed {
        return Some(format!(
            "modifies column {} character set from {} to {}",
            quote_identifier(&new.name),
            old.charset,
            new.charset
        ));
    }
    None
}

// ================================================================
// Create options
// ================================================================

fn parse_create_options(options: &str) -> Vec<(String, &str)> {
    options
        .split_whitespace()
        .filter_map(|opt| opt.split_once('='))
        .map(|(key, value)| (key.to_ascii_uppercase(), value))
        .collect()
}

fn reset_value(key: &str) -> &'static str {
    match key {
        "KEY_BLOCK_SIZE" => "0",
        "COMPRESSION" => "'None'",
        _ => "DEFAULT",
    }
}

/// Options that are new or changed, followed by resets for removed ones.
fn create_options_clause(old: &str, new: &str) -> String {
    let old = parse_create_options(old);
    let new = parse_create_options(new);
    let mut parts: Vec<String> = new
        .iter()
        .filter(|opt| !old.contains(opt))
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    parts.extend(
        old.iter()
            .filter(|(key, _)| !new.iter().any(|(k, _)| k == key))
            .map(|(key, _)| format!("{key}={}", reset_value(key))),
    );
    parts.join(" ")
}
