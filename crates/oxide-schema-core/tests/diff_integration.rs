//! Integration tests for the schema diff engine.
//!
//! Each test builds a "from" and a "to" snapshot, diffs them, and checks
//! the DDL statements produced under a given set of modifiers.

mod common;
use common::*;

use oxide_schema_core::diff::{DiffType, NextAutoIncMode, ObjectDiff, PartitioningMode};
use oxide_schema_core::model::{ForeignKey, ObjectPattern, ObjectType, ReferentialAction, Schema};
use oxide_schema_core::{DiffError, ObjectKey};

// =============================================================================
// Identity
// =============================================================================

#[test]
fn self_diff_is_empty() {
    let s = schema(vec![orders(), table("customers", vec![int_col("id")])]);
    let diff = s.diff(&s);
    assert!(diff.is_empty());
    assert!(diff.statements(&mods("mysql:8.0")).unwrap().is_empty());
}

#[test]
fn json_round_trip_diffs_empty() {
    let mut s = schema(vec![orders()]);
    s.tables[0].partitioning = Some(range_by_year(""));
    s.tables[0].comment = "it's an order".into();
    let json = serde_json::to_string_pretty(&s).unwrap();
    let back: Schema = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
    assert!(s.diff(&back).is_empty());
}

// =============================================================================
// Columns
// =============================================================================

#[test]
fn single_default_change_is_one_modify() {
    let from = schema(vec![orders()]);
    let mut to = from.clone();
    to.tables[0].columns[2].default = Some("'n/a'".into());

    let diff = from.diff(&to);
    assert_eq!(diff.len(), 1);
    assert_eq!(
        statements(&from, &to, &mods("mysql:8.0")),
        ["ALTER TABLE `orders` MODIFY COLUMN `reference` varchar(40) NOT NULL DEFAULT 'n/a'"]
    );
}

#[test]
fn dropping_a_column_requires_allow_unsafe() {
    let from = schema(vec![orders()]);
    let mut to = from.clone();
    to.tables[0].columns.pop();

    let err = from.diff(&to).statements(&mods("mysql:8.0")).unwrap_err();
    assert!(matches!(err, DiffError::Unsafe { ref key, .. } if key.name == "orders"));
    assert_eq!(
        statements(&from, &to, &unsafe_mods("mysql:8.0")),
        ["ALTER TABLE `orders` DROP COLUMN `shipped_at`"]
    );
}

#[test]
fn added_column_in_the_middle_is_positioned() {
    let from = schema(vec![orders()]);
    let mut to = from.clone();
    to.tables[0].columns.insert(1, varchar("status", 16));
    assert_eq!(
        statements(&from, &to, &mods("mysql:8.0")),
        ["ALTER TABLE `orders` ADD COLUMN `status` varchar(16) NOT NULL AFTER `id`"]
    );
}

#[test]
fn reordered_column_respects_lax_order() {
    let from = schema(vec![orders()]);
    let mut to = from.clone();
    to.tables[0].columns.swap(1, 2);

    assert_eq!(
        statements(&from, &to, &mods("mysql:8.0")),
        ["ALTER TABLE `orders` MODIFY COLUMN `customer_id` int NOT NULL AFTER `reference`"]
    );

    let mut lax = mods("mysql:8.0");
    lax.lax_column_order = true;
    assert!(statements(&from, &to, &lax).is_empty());
}

#[test]
fn widening_a_varchar_is_safe_but_narrowing_is_not() {
    let from = schema(vec![orders()]);
    let mut wider = from.clone();
    wider.tables[0].columns[2] = varchar("reference", 80);
    assert_eq!(statements(&from, &wider, &mods("mysql:8.0")).len(), 1);

    let mut narrower = from.clone();
    narrower.tables[0].columns[2] = varchar("reference", 10);
    assert!(narrower
        .diff(&from)
        .statements(&mods("mysql:8.0"))
        .is_ok());
    assert!(matches!(
        from.diff(&narrower).statements(&mods("mysql:8.0")),
        Err(DiffError::Unsafe { .. })
    ));
}

// =============================================================================
// Tables
// =============================================================================

#[test]
fn renamed_table_is_drop_plus_create() {
    let from = schema(vec![orders()]);
    let mut to = from.clone();
    to.tables[0].name = "purchases".into();

    let diff = from.diff(&to);
    let kinds: Vec<(DiffType, String)> = diff
        .object_diffs
        .iter()
        .map(|d| (d.diff_type(), d.key().name))
        .collect();
    assert_eq!(
        kinds,
        [
            (DiffType::Create, "purchases".to_string()),
            (DiffType::Drop, "orders".to_string()),
        ]
    );

    let stmts = statements(&from, &to, &unsafe_mods("mysql:8.0"));
    assert_eq!(stmts.len(), 2);
    assert!(stmts[0].starts_with("CREATE TABLE `purchases` ("));
    assert_eq!(stmts[1], "DROP TABLE `orders`");
}

#[test]
fn auto_increment_follows_mode() {
    let from = schema(vec![orders()]);
    let mut to = from.clone();
    to.tables[0].next_auto_increment = 500;

    assert!(statements(&from, &to, &mods("mysql:8.0")).is_empty());

    let mut m = mods("mysql:8.0");
    m.next_auto_inc = NextAutoIncMode::IfIncreased;
    assert_eq!(
        statements(&from, &to, &m),
        ["ALTER TABLE `orders` AUTO_INCREMENT = 500"]
    );
}

#[test]
fn changed_foreign_key_is_readded_separately() {
    let fk = |action| ForeignKey {
        name: "fk_customer".into(),
        columns: vec!["customer_id".into()],
        referenced_table: "customers".into(),
        referenced_columns: vec!["id".into()],
        delete_rule: action,
        ..ForeignKey::default()
    };
    let mut before = orders();
    before.foreign_keys.push(fk(ReferentialAction::Restrict));
    let mut after = orders();
    after.foreign_keys.push(fk(ReferentialAction::Cascade));

    let stmts = statements(
        &schema(vec![before]),
        &schema(vec![after]),
        &mods("mysql:8.0"),
    );
    assert_eq!(
        stmts,
        [
            "ALTER TABLE `orders` DROP FOREIGN KEY `fk_customer`",
            "ALTER TABLE `orders` ADD CONSTRAINT `fk_customer` FOREIGN KEY (`customer_id`) \
             REFERENCES `customers` (`id`) ON DELETE CASCADE",
        ]
    );
}

// =============================================================================
// Partitioning
// =============================================================================

#[test]
fn range_with_hash_subpartitions_is_unsupported_until_stripped() {
    let fl = flavor("mysql:8.0");
    let mut partitioned = orders();
    partitioned.partitioning = Some(range_by_year("HASH"));
    partitioned.refresh_unsupported_ddl(fl);
    assert!(partitioned.unsupported_ddl);

    let mut from = schema(vec![partitioned]);
    let mut to = from.clone();
    to.tables[0].columns.push(varchar("note", 10));

    let diff = from.diff(&to);
    assert_eq!(
        diff.unsupported_keys(),
        [ObjectKey::new(ObjectType::Table, "orders")]
    );
    assert!(matches!(
        diff.statements(&mods("mysql:8.0")),
        Err(DiffError::Unsupported { .. })
    ));
    let mut skip = mods("mysql:8.0");
    skip.skip_unsupported = true;
    assert!(diff.statements(&skip).unwrap().is_empty());

    from.strip_table_partitioning(fl);
    to.strip_table_partitioning(fl);
    assert!(!from.tables[0].unsupported_ddl);
    assert_eq!(
        statements(&from, &to, &mods("mysql:8.0")),
        ["ALTER TABLE `orders` ADD COLUMN `note` varchar(10) NOT NULL"]
    );
}

#[test]
fn hash_subpartitioned_snapshot_is_unsupported_without_refresh() {
    let mut partitioned = orders();
    partitioned.partitioning = Some(range_by_year("KEY"));
    let from = schema(vec![partitioned]);
    let mut to = from.clone();
    to.tables[0].columns.push(varchar("note", 10));
    assert!(!from.tables[0].unsupported_ddl);

    let diff = from.diff(&to);
    assert_eq!(
        diff.unsupported_keys(),
        [ObjectKey::new(ObjectType::Table, "orders")]
    );
    assert!(matches!(
        diff.statements(&unsafe_mods("mysql:8.0")),
        Err(DiffError::Unsupported { ref key }) if key.name == "orders"
    ));
}

#[test]
fn partitioning_mode_controls_removal_and_creates() {
    let mut partitioned = orders();
    partitioned.partitioning = Some(range_by_year(""));
    let from = schema(vec![partitioned.clone()]);
    let to = schema(vec![orders()]);

    assert!(statements(&from, &to, &mods("mysql:8.0")).is_empty());

    let mut remove = mods("mysql:8.0");
    remove.partitioning = PartitioningMode::Remove;
    assert_eq!(
        statements(&from, &to, &remove),
        ["ALTER TABLE `orders` REMOVE PARTITIONING"]
    );

    let created = statements(&schema(Vec::new()), &schema(vec![partitioned]), &remove);
    assert_eq!(created.len(), 1);
    assert!(!created[0].contains("PARTITION BY"));
}

// =============================================================================
// Routines and filtering
// =============================================================================

#[test]
fn excluded_objects_are_not_diffed() {
    let from = schema(vec![orders()]);
    let mut to = schema(vec![orders(), table("_tmp_import", vec![int_col("id")])]);
    let patterns = [ObjectPattern::new(ObjectType::Table, "^_tmp").unwrap()];
    assert_eq!(to.strip_matches(&patterns), 1);
    assert!(from.diff(&to).is_empty());
}

#[test]
fn object_diffs_are_ordered_by_kind() {
    let from = schema(vec![orders(), table("legacy", vec![int_col("id")])]);
    let mut to = schema(vec![table("fresh", vec![int_col("id")]), orders()]);
    to.tables[1].comment = "orders".into();

    let diff = from.diff(&to);
    let order: Vec<DiffType> = diff.object_diffs.iter().map(ObjectDiff::diff_type).collect();
    assert_eq!(order, [DiffType::Create, DiffType::Alter, DiffType::Drop]);
}
