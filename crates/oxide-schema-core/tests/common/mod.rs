#![allow(dead_code)]

use oxide_schema_core::diff::StatementModifiers;
use oxide_schema_core::flavor::Flavor;
use oxide_schema_core::model::{Column, Index, Partition, Schema, Table, TablePartitioning};

pub fn flavor(s: &str) -> Flavor {
    s.parse()
        .unwrap_or_else(|e| panic!("Failed to parse flavor {s}: {e}"))
}

pub fn mods(s: &str) -> StatementModifiers {
    StatementModifiers::for_flavor(flavor(s))
}

pub fn unsafe_mods(s: &str) -> StatementModifiers {
    StatementModifiers {
        allow_unsafe: true,
        ..mods(s)
    }
}

pub fn int_col(name: &str) -> Column {
    Column::new(name, "int")
}

pub fn nullable(mut col: Column) -> Column {
    col.nullable = true;
    col.default = Some("NULL".into());
    col
}

pub fn varchar(name: &str, len: u32) -> Column {
    let mut col = Column::new(name, format!("varchar({len})"));
    col.charset = "utf8mb4".into();
    col.collation = "utf8mb4_general_ci".into();
    col.collation_is_default = true;
    col
}

pub fn table(name: &str, columns: Vec<Column>) -> Table {
    let pk = columns.first().map(|c| Index::primary([c.name.clone()]));
    Table {
        name: name.into(),
        engine: "InnoDB".into(),
        charset: "utf8mb4".into(),
        collation: "utf8mb4_general_ci".into(),
        columns,
        primary_key: pk,
        ..Table::default()
    }
}

pub fn orders() -> Table {
    let mut id = int_col("id");
    id.auto_increment = true;
    let mut t = table(
        "orders",
        vec![
            id,
            int_col("customer_id"),
            varchar("reference", 40),
            nullable(Column::new("shipped_at", "datetime")),
        ],
    );
    t.secondary_indexes
        .push(Index::secondary("idx_customer", ["customer_id"], false));
    t
}

pub fn schema(tables: Vec<Table>) -> Schema {
    Schema {
        name: "shop".into(),
        charset: "utf8mb4".into(),
        collation: "utf8mb4_general_ci".into(),
        tables,
        routines: Vec::new(),
    }
}

pub fn range_by_year(sub_method: &str) -> TablePartitioning {
    let part = |name: &str, values: &str| Partition {
        name: name.into(),
        values: values.into(),
        engine: "InnoDB".into(),
        ..Partition::default()
    };
    TablePartitioning {
        method: "RANGE".into(),
        expression: "`id`".into(),
        sub_method: sub_method.into(),
        sub_expression: if sub_method.is_empty() {
            String::new()
        } else {
            "`customer_id`".into()
        },
        sub_partition_count: u32::from(!sub_method.is_empty()) * 2,
        partitions: vec![part("p0", "1000"), part("pmax", "MAXVALUE")],
    }
}

/// Statements for `from -> to`, panicking on diff errors.
pub fn statements(from: &Schema, to: &Schema, mods: &StatementModifiers) -> Vec<String> {
    from.diff(to)
        .statements(mods)
        .unwrap_or_else(|e| panic!("Failed to generate statements: {e}"))
}
