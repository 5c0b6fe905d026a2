//! Table partitioning.

use serde::{Deserialize, Serialize};

use crate::flavor::Flavor;

use super::escape::{escape_value_for_create_table, quote_identifier};

/// One partition definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Partition {
    /// Partition name.
    pub name: String,
    /// Boundary: the LESS THAN value for RANGE (`MAXVALUE` allowed), the
    /// value list for LIST, empty for HASH and KEY.
    pub values: String,
    /// Storage engine.
    pub engine: String,
    /// Partition comment, unescaped.
    pub comment: String,
}

/// Partitioning of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePartitioning {
    /// `RANGE`, `RANGE COLUMNS`, `LIST`, `LIST COLUMNS`, `HASH`,
    /// `LINEAR HASH`, `KEY` or `LINEAR KEY`.
    pub method: String,
    /// Partitioning expression or column list.
    pub expression: String,
    /// Sub-partitioning method, empty if none.
    pub sub_method: String,
    /// Sub-partitioning expression.
    pub sub_expression: String,
    /// Number of sub-partitions per partition, 0 if not shown.
    pub sub_partition_count: u32,
    /// Partitions in order.
    pub partitions: Vec<Partition>,
}

impl TablePartitioning {
    fn is_hash_or_key(method: &str) -> bool {
        method.ends_with("HASH") || method.ends_with("KEY")
    }

    pub(crate) fn is_range_or_list(&self) -> bool {
        self.method.starts_with("RANGE") || self.method.starts_with("LIST")
    }

    /// RANGE or LIST partitioning with HASH or KEY sub-partitioning. Diffs
    /// of such tables cannot be expressed as ALTER clauses.
    #[must_use]
    pub fn has_hash_subpartitioning(&self) -> bool {
        self.is_range_or_list() && Self::is_hash_or_key(&self.sub_method)
    }

    /// Partitions named `p0..pN-1` with nothing but the engine set, which
    /// the server abbreviates to `PARTITIONS N`.
    fn has_default_partition_list(&self) -> bool {
        Self::is_hash_or_key(&self.method)
            && self.partitions.iter().enumerate().all(|(i, p)| {
                p.name == format!("p{i}") && p.values.is_empty() && p.comment.is_empty()
            })
    }

    fn partition_definition(&self, p: &Partition, flavor: Flavor) -> String {
        let name = if flavor.is_mariadb(&[]) {
            quote_identifier(&p.name)
        } else {
            p.name.clone()
        };
        let mut def = format!("PARTITION {name}");
        if self.method.starts_with("RANGE") {
            if p.values == "MAXVALUE" {
                def.push_str(" VALUES LESS THAN MAXVALUE");
            } else {
                def.push_str(&format!(" VALUES LESS THAN ({})", p.values));
            }
        } else if self.method.starts_with("LIST") {
            def.push_str(&format!(" VALUES IN ({})", p.values));
        }
        if !p.comment.is_empty() {
            def.push_str(&format!(
                " COMMENT = '{}'",
                escape_value_for_create_table(&p.comment)
            ));
        }
        if !p.engine.is_empty() {
            def.push_str(&format!(" ENGINE = {}", p.engine));
        }
        def
    }

    /// Parenthesized partition list for ADD PARTITION and CREATE TABLE.
    pub(crate) fn partition_list(&self, partitions: &[Partition], flavor: Flavor) -> String {
        let defs: Vec<String> = partitions
            .iter()
            .map(|p| self.partition_definition(p, flavor))
            .collect();
        format!("({})", defs.join(",\n "))
    }

    /// `PARTITION BY ...` without any version comment wrapping, as used in
    /// ALTER TABLE.
    #[must_use]
    pub fn clause_body(&self, flavor: Flavor) -> String {
        let mut body = match self.method.strip_suffix(" COLUMNS") {
            Some(base) => format!("PARTITION BY {base}  COLUMNS({})", self.expression),
            None => format!("PARTITION BY {} ({})", self.method, self.expression),
        };
        if !self.sub_method.is_empty() {
            body.push_str(&format!(
                "\nSUBPARTITION BY {} ({})",
                self.sub_method, self.sub_expression
            ));
            if self.sub_partition_count > 0 {
                body.push_str(&format!("\nSUBPARTITIONS {}", self.sub_partition_count));
            }
        }
        if self.partitions.is_empty() {
            return body;
        }
        if self.has_default_partition_list() {
            body.push_str(&format!("\nPARTITIONS {}", self.partitions.len()));
        } else {
            body.push('\n');
            body.push_str(&self.partition_list(&self.partitions, flavor));
        }
        body
    }

    /// Partitioning clause as appended to CREATE TABLE, including the
    /// leading newline.
    #[must_use]
    pub fn definition(&self, flavor: Flavor) -> String {
        let body = self.clause_body(flavor);
        if flavor.is_mariadb(&[]) {
            return format!("\n {body}");
        }
        let version = if self.method.ends_with("COLUMNS") {
            "50500"
        } else {
            "50100"
        };
        format!("\n/*!{version} {body} */")
    }
}
