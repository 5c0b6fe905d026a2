//! Stored procedures and functions.

use serde::{Deserialize, Serialize};

use super::escape::{escape_value_for_create_table, quote_identifier};
use super::object::{ObjectKey, ObjectType};

/// Kind of stored routine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineType {
    /// Stored procedure.
    #[default]
    Procedure,
    /// Stored function.
    Function,
}

impl RoutineType {
    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Procedure => "PROCEDURE",
            Self::Function => "FUNCTION",
        }
    }

    /// Matching object type.
    #[must_use]
    pub const fn object_type(self) -> ObjectType {
        match self {
            Self::Procedure => ObjectType::Procedure,
            Self::Function => ObjectType::Function,
        }
    }
}

/// A stored procedure or function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Routine {
    /// Routine name.
    pub name: String,
    /// Procedure or function.
    pub routine_type: RoutineType,
    /// Body text starting at the first body token.
    pub body: String,
    /// Parameter list without the surrounding parentheses.
    pub param_string: String,
    /// Return type; functions only.
    pub return_type: String,
    /// Definer as `user@host`.
    pub definer: String,
    /// DETERMINISTIC characteristic.
    pub deterministic: bool,
    /// `CONTAINS SQL`, `NO SQL`, `READS SQL DATA` or `MODIFIES SQL DATA`.
    pub data_access: String,
    /// `DEFINER` or `INVOKER`.
    pub security_type: String,
    /// Routine comment, unescaped.
    pub comment: String,
    /// Session sql_mode at creation time.
    pub sql_mode: String,
    /// Database collation at creation time.
    pub db_collation: String,
}

fn quote_definer(definer: &str) -> String {
    match definer.rsplit_once('@') {
        Some((user, host)) => format!("{}@{}", quote_identifier(user), quote_identifier(host)),
        None => quote_identifier(definer),
    }
}

impl Routine {
    /// Identity of this routine.
    #[must_use]
    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(self.routine_type.object_type(), self.name.clone())
    }

    /// CREATE statement as SHOW CREATE PROCEDURE/FUNCTION renders it.
    #[must_use]
    pub fn definition(&self) -> String {
        let mut def = "CREATE".to_string();
        if !self.definer.is_empty() {
            def.push_str(" DEFINER=");
            def.push_str(&quote_definer(&self.definer));
        }
        def.push_str(&format!(
            " {} {}({})",
            self.routine_type.as_sql(),
            quote_identifier(&self.name),
            self.param_string
        ));
        if self.routine_type == RoutineType::Function {
            def.push_str(" RETURNS ");
            def.push_str(&self.return_type);
        }
        let mut characteristics = Vec::new();
        if self.deterministic {
            characteristics.push("DETERMINISTIC".to_string());
        }
        if !self.data_access.is_empty() && self.data_access != "CONTAINS SQL" {
            characteristics.push(self.data_access.clone());
        }
        if !self.security_type.is_empty() && self.security_type != "DEFINER" {
            characteristics.push(format!("SQL SECURITY {}", self.security_type));
        }
        if !self.comment.is_empty() {
            characteristics.push(format!(
                "COMMENT '{}'",
                escape_value_for_create_table(&self.comment)
            ));
        }
        for c in characteristics {
            def.push_str("\n    ");
            def.push_str(&c);
        }
        def.push('\n');
        def.push_str(&self.body);
        def
    }

    /// DROP statement.
    #[must_use]
    pub fn drop_statement(&self) -> String {
        format!(
            "DROP {} {}",
            self.routine_type.as_sql(),
            quote_identifier(&self.name)
        )
    }
}
