//! Object identity and exclusion patterns.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::escape::escape_identifier;

/// Kind of schema object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    /// The database itself.
    Database,
    /// A table.
    Table,
    /// A stored procedure.
    Procedure,
    /// A stored function.
    Function,
}

impl ObjectType {
    /// Lowercase SQL keyword for this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Table => "table",
            Self::Procedure => "procedure",
            Self::Function => "function",
        }
    }

    /// Parses a lowercase type name. `"proc"` and `"func"` are accepted
    /// as short forms.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "database" => Some(Self::Database),
            "table" => Some(Self::Table),
            "procedure" | "proc" => Some(Self::Procedure),
            "function" | "func" => Some(Self::Function),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable identity of a named object within a schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    /// Object kind.
    pub object_type: ObjectType,
    /// Object name.
    pub name: String,
}

impl ObjectKey {
    /// Creates a key.
    pub fn new(object_type: ObjectType, name: impl Into<String>) -> Self {
        Self {
            object_type,
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.object_type, escape_identifier(&self.name))
    }
}

/// Selects objects of one type whose name matches a regular expression.
///
/// The expression is used as given: it is not anchored, so `log` matches
/// `audit_log` too.
#[derive(Debug, Clone)]
pub struct ObjectPattern {
    /// Object kind the pattern applies to.
    pub object_type: ObjectType,
    /// Name pattern.
    pub pattern: Regex,
}

impl ObjectPattern {
    /// Compiles `pattern` for objects of `object_type`.
    pub fn new(object_type: ObjectType, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            object_type,
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns `true` if `key` is of this pattern's type and its name matches.
    #[must_use]
    pub fn matches(&self, key: &ObjectKey) -> bool {
        key.object_type == self.object_type && self.pattern.is_match(&key.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_doubles_backticks() {
        let key = ObjectKey::new(ObjectType::Table, "odd`name");
        assert_eq!(key.to_string(), "table `odd``name`");
        let key = ObjectKey::new(ObjectType::Procedure, "p");
        assert_eq!(key.to_string(), "procedure `p`");
    }

    #[test]
    fn type_names() {
        for t in [
            ObjectType::Database,
            ObjectType::Table,
            ObjectType::Procedure,
            ObjectType::Function,
        ] {
            assert_eq!(ObjectType::from_name(t.name()), Some(t));
        }
        assert_eq!(ObjectType::from_name("func"), Some(ObjectType::Function));
        assert_eq!(ObjectType::from_name("view"), None);
    }

    #[test]
    fn pattern_is_unanchored_and_typed() {
        let p = ObjectPattern::new(ObjectType::Table, "log").unwrap();
        assert!(p.matches(&ObjectKey::new(ObjectType::Table, "audit_log")));
        assert!(!p.matches(&ObjectKey::new(ObjectType::Procedure, "log")));
        let anchored = ObjectPattern::new(ObjectType::Table, "^tmp_").unwrap();
        assert!(anchored.matches(&ObjectKey::new(ObjectType::Table, "tmp_x")));
        assert!(!anchored.matches(&ObjectKey::new(ObjectType::Table, "x_tmp_")));
    }

    #[test]
    fn bad_regex_is_an_error() {
        assert!(ObjectPattern::new(ObjectType::Table, "(").is_err());
    }
}
