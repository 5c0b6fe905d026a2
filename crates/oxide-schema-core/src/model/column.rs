//! Table columns.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::flavor::Flavor;

use super::escape::{escape_value_for_create_table, quote_identifier};
use super::table::Table;

static INT_DISPLAY_WIDTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(tinyint|smallint|mediumint|int|bigint)\((\d+)\)(.*)$").expect("compile regex")
});

/// A column of a table, as introspected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Full type text, e.g. `int(10) unsigned` or `varchar(64)`.
    pub type_in_db: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Whether the column has AUTO_INCREMENT.
    pub auto_increment: bool,
    /// Default expression exactly as shown, e.g. `'abc'`, `NULL`,
    /// `CURRENT_TIMESTAMP`.
    pub default: Option<String>,
    /// ON UPDATE expression.
    pub on_update: Option<String>,
    /// Generation expression for a generated column.
    pub generation_expr: Option<String>,
    /// Whether a generated column is stored rather than virtual.
    pub generated_stored: bool,
    /// Character set, empty for non-character types.
    pub charset: String,
    /// Collation, empty for non-character types.
    pub collation: String,
    /// Whether `collation` is the default for `charset`.
    pub collation_is_default: bool,
    /// CHARACTER SET must be shown even when redundant. Recovered from
    /// introspection.
    pub show_charset: bool,
    /// COLLATE must be shown even when default. Recovered from
    /// introspection.
    pub show_collation: bool,
    /// Compression codec name, empty for uncompressed columns.
    pub compression: String,
    /// Column comment, unescaped.
    pub comment: String,
    /// Whether the column is invisible.
    pub invisible: bool,
    /// Inline check constraint clause (MariaDB).
    pub check_clause: Option<String>,
}

impl Column {
    /// Creates a NOT NULL column of the given type.
    pub fn new(name: impl Into<String>, type_in_db: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_in_db: type_in_db.into(),
            ..Self::default()
        }
    }

    /// Column definition exactly as SHOW CREATE TABLE renders it inside
    /// `table`.
    #[must_use]
    pub fn definition(&self, flavor: Flavor, table: &Table) -> String {
        self.definition_in(flavor, &table.collation)
    }

    pub(crate) fn definition_in(&self, flavor: Flavor, table_collation: &str) -> String {
        let mariadb = flavor.is_mariadb(&[]);
        let mut def = format!("{} {}", quote_identifier(&self.name), self.type_in_db);

        if mariadb && !self.compression.is_empty() {
            def.push(' ');
            def.push_str(flavor.compression_comment_marker());
            def.push_str(" COMPRESSED*/");
        }

        let show_charset =
            !self.charset.is_empty() && (self.collation != table_collation || self.show_charset);
        let show_collate = if flavor.always_show_collate() {
            show_charset
        } else {
            !self.collation.is_empty() && (!self.collation_is_default || self.show_collation)
        };
        if show_charset {
            def.push_str(" CHARACTER SET ");
            def.push_str(&self.charset);
        }
        if show_collate {
            def.push_str(" COLLATE ");
            def.push_str(&self.collation);
        }

        if let Some(expr) = &self.generation_expr {
            let (prefix, stored) = if flavor.generated_columns() {
                ("GENERATED ALWAYS AS", "STORED")
            } else {
                ("AS", "PERSISTENT")
            };
            let kind = if self.generated_stored { stored } else { "VIRTUAL" };
            def.push_str(&format!(" {prefix} ({expr}) {kind}"));
        }

        if !self.nullable {
            def.push_str(" NOT NULL");
        } else if self.is_timestamp_family() {
            def.push_str(" NULL");
        }

        let visibility = match (self.invisible, mariadb) {
            (false, _) => "",
            (true, true) => " INVISIBLE",
            (true, false) => " /*!80023 INVISIBLE */",
        };
        if mariadb {
            def.push_str(visibility);
        }
        if self.auto_increment {
            def.push_str(" AUTO_INCREMENT");
        }
        if let Some(default) = &self.default {
            def.push_str(" DEFAULT ");
            def.push_str(default);
        }
        if let Some(on_update) = &self.on_update {
            def.push_str(" ON UPDATE ");
            def.push_str(on_update);
        }
        if !mariadb {
            def.push_str(visibility);
            if !self.compression.is_empty() {
                def.push_str(" /*!50633 COLUMN_FORMAT COMPRESSED */");
            }
        }
        if !self.comment.is_empty() {
            def.push_str(" COMMENT '");
            def.push_str(&escape_value_for_create_table(&self.comment));
            def.push('\'');
        }
        if let Some(check) = &self.check_clause {
            def.push_str(&format!(" CHECK ({check})"));
        }
        def
    }

    /// Whether the type belongs to the timestamp family, which always
    /// renders its nullability.
    #[must_use]
    pub fn is_timestamp_family(&self) -> bool {
        self.type_in_db.starts_with("timestamp")
    }

    /// Strict field-by-field equality.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Equality that tolerates differences with no semantic effect:
    /// presence (not value) of an integer display width, the
    /// `utf8`/`utf8mb3` charset alias and the matching collation prefix.
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        if self.equals(other) {
            return true;
        }
        let mut a = self.clone();
        let mut b = other.clone();
        let (stripped_a, had_a) = strip_display_width(&a.type_in_db);
        let (stripped_b, had_b) = strip_display_width(&b.type_in_db);
        if had_a != had_b {
            a.type_in_db = stripped_a;
            b.type_in_db = stripped_b;
        }
        for col in [&mut a, &mut b] {
            col.charset = normalize_charset(&col.charset).to_string();
            col.collation = normalize_collation(&col.collation);
        }
        a == b
    }
}

/// Maps the `utf8mb3` alias to `utf8`.
pub(crate) fn normalize_charset(charset: &str) -> &str {
    if charset == "utf8mb3" {
        "utf8"
    } else {
        charset
    }
}

/// Maps `utf8mb3_*` collations to their `utf8_*` alias.
pub(crate) fn normalize_collation(collation: &str) -> String {
    match collation.strip_prefix("utf8mb3_") {
        Some(rest) => format!("utf8_{rest}"),
        None => collation.to_string(),
    }
}

/// Removes an integer display width from `type_in_db`. Returns the new
/// type and whether anything was removed. `tinyint(1)` and zerofill types
/// keep their width since it is still shown for them.
#[must_use]
pub fn strip_display_width(type_in_db: &str) -> (String, bool) {
    let Some(caps) = INT_DISPLAY_WIDTH.captures(type_in_db) else {
        return (type_in_db.to_string(), false);
    };
    let base = &caps[1];
    let rest = &caps[3];
    if (base == "tinyint" && &caps[2] == "1") || rest.contains("zerofill") {
        return (type_in_db.to_string(), false);
    }
    (format!("{base}{rest}"), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fl(s: &str) -> Flavor {
        s.parse().unwrap()
    }

    fn text(name: &str) -> Column {
        Column {
            charset: "utf8mb4".into(),
            collation: "utf8mb4_general_ci".into(),
            collation_is_default: true,
            ..Column::new(name, "varchar(64)")
        }
    }

    // ============================================================
    // Rendering
    // ============================================================

    #[test]
    fn not_null_and_default() {
        let mut c = Column::new("id", "int unsigned");
        c.auto_increment = true;
        assert_eq!(
            c.definition_in(fl("mysql:8.0.36"), "utf8mb4_0900_ai_ci"),
            "`id` int unsigned NOT NULL AUTO_INCREMENT"
        );
        let mut c = Column::new("n", "int(11)");
        c.nullable = true;
        c.default = Some("NULL".into());
        assert_eq!(
            c.definition_in(fl("mysql:5.7"), "latin1_swedish_ci"),
            "`n` int(11) DEFAULT NULL"
        );
    }

    #[test]
    fn timestamp_shows_explicit_null() {
        let mut c = Column::new("ts", "timestamp");
        c.nullable = true;
        c.default = Some("NULL".into());
        c.on_update = Some("CURRENT_TIMESTAMP".into());
        assert_eq!(
            c.definition_in(fl("mysql:8.0"), "utf8mb4_0900_ai_ci"),
            "`ts` timestamp NULL DEFAULT NULL ON UPDATE CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn charset_shown_only_when_differing_from_table() {
        let c = text("name");
        assert_eq!(
            c.definition_in(fl("mysql:5.7"), "utf8mb4_general_ci"),
            "`name` varchar(64) NOT NULL"
        );
        assert_eq!(
            c.definition_in(fl("mysql:5.7"), "latin1_swedish_ci"),
            "`name` varchar(64) CHARACTER SET utf8mb4 NOT NULL"
        );
        let mut bin = text("name");
        bin.collation = "utf8mb4_bin".into();
        bin.collation_is_default = false;
        assert_eq!(
            bin.definition_in(fl("mysql:5.7"), "utf8mb4_general_ci"),
            "`name` varchar(64) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL"
        );
    }

    #[test]
    fn always_show_collate_ties_collate_to_charset() {
        let c = text("name");
        assert_eq!(
            c.definition_in(fl("mariadb:10.11"), "latin1_swedish_ci"),
            "`name` varchar(64) CHARACTER SET utf8mb4 COLLATE utf8mb4_general_ci NOT NULL"
        );
        let mut forced = text("name");
        forced.show_collation = true;
        assert_eq!(
            forced.definition_in(fl("mariadb:10.11"), "utf8mb4_general_ci"),
            "`name` varchar(64) NOT NULL"
        );
        assert_eq!(
            forced.definition_in(fl("mysql:8.0"), "utf8mb4_general_ci"),
            "`name` varchar(64) COLLATE utf8mb4_general_ci NOT NULL"
        );
    }

    #[test]
    fn generated_column_syntax() {
        let mut c = Column::new("total", "int");
        c.nullable = true;
        c.generation_expr = Some("`a` + `b`".into());
        assert_eq!(
            c.definition_in(fl("mysql:8.0"), ""),
            "`total` int GENERATED ALWAYS AS (`a` + `b`) VIRTUAL"
        );
        c.generated_stored = true;
        assert_eq!(
            c.definition_in(fl("mariadb:10.1"), ""),
            "`total` int AS (`a` + `b`) PERSISTENT"
        );
    }

    #[test]
    fn tail_order_differs_by_vendor() {
        let mut c = Column::new("secret", "int");
        c.nullable = true;
        c.default = Some("NULL".into());
        c.invisible = true;
        c.comment = "don't".into();
        assert_eq!(
            c.definition_in(fl("mysql:8.0.23"), ""),
            "`secret` int DEFAULT NULL /*!80023 INVISIBLE */ COMMENT 'don''t'"
        );
        assert_eq!(
            c.definition_in(fl("mariadb:10.6"), ""),
            "`secret` int INVISIBLE DEFAULT NULL COMMENT 'don''t'"
        );
    }

    #[test]
    fn compression_markers() {
        let mut c = Column::new("blob", "blob");
        c.nullable = true;
        c.default = Some("NULL".into());
        c.compression = "zlib".into();
        assert_eq!(
            c.definition_in(fl("mariadb:10.6.8"), ""),
            "`blob` blob /*M!100301 COMPRESSED*/ DEFAULT NULL"
        );
        assert_eq!(
            c.definition_in(fl("mariadb:10.4.1"), ""),
            "`blob` blob /*!100301 COMPRESSED*/ DEFAULT NULL"
        );
        assert_eq!(
            c.definition_in(fl("percona:5.7"), ""),
            "`blob` blob DEFAULT NULL /*!50633 COLUMN_FORMAT COMPRESSED */"
        );
    }

    #[test]
    fn inline_check_comes_last() {
        let mut c = Column::new("qty", "int(11)");
        c.check_clause = Some("`qty` >= 0".into());
        c.comment = "units".into();
        assert_eq!(
            c.definition_in(fl("mariadb:10.5"), ""),
            "`qty` int(11) NOT NULL COMMENT 'units' CHECK (`qty` >= 0)"
        );
    }

    // ============================================================
    // Equality tiers
    // ============================================================

    #[test]
    fn equals_implies_equivalent() {
        let cols = [text("a"), Column::new("b", "int(11)"), Column::default()];
        for c in &cols {
            assert!(c.equals(c));
            assert!(c.equivalent(c));
        }
    }

    #[test]
    fn display_width_presence_is_equivalent() {
        let a = Column::new("n", "int(11) unsigned");
        let b = Column::new("n", "int unsigned");
        assert!(!a.equals(&b));
        assert!(a.equivalent(&b));
        let c = Column::new("n", "int(10) unsigned");
        assert!(!a.equivalent(&c));
    }

    #[test]
    fn utf8_alias_is_equivalent() {
        let mut a = text("s");
        a.charset = "utf8".into();
        a.collation = "utf8_general_ci".into();
        let mut b = a.clone();
        b.charset = "utf8mb3".into();
        b.collation = "utf8mb3_general_ci".into();
        assert!(a.equivalent(&b));
        b.collation = "utf8mb3_bin".into();
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn other_differences_break_equivalence() {
        let a = text("s");
        let mut b = a.clone();
        b.comment = "x".into();
        assert!(!a.equivalent(&b));
    }

    // ============================================================
    // Display width stripping
    // ============================================================

    #[test]
    fn strip_widths() {
        assert_eq!(strip_display_width("int(11)"), ("int".into(), true));
        assert_eq!(
            strip_display_width("bigint(20) unsigned"),
            ("bigint unsigned".into(), true)
        );
        assert_eq!(strip_display_width("tinyint(1)"), ("tinyint(1)".into(), false));
        assert_eq!(strip_display_width("tinyint(4)"), ("tinyint".into(), true));
        assert_eq!(
            strip_display_width("int(5) unsigned zerofill"),
            ("int(5) unsigned zerofill".into(), false)
        );
        assert_eq!(strip_display_width("varchar(20)"), ("varchar(20)".into(), false));
        assert_eq!(strip_display_width("point"), ("point".into(), false));
    }

    #[test]
    fn strip_is_idempotent() {
        for t in ["int(11)", "tinyint(1)", "smallint(6) unsigned", "decimal(10,2)"] {
            let (once, _) = strip_display_width(t);
            let (twice, changed) = strip_display_width(&once);
            assert_eq!(once, twice);
            assert!(!changed);
        }
    }
}
