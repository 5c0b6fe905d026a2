//! Identifier and literal escaping as SHOW CREATE renders them.

/// Doubles every backtick in `name`.
#[must_use]
pub fn escape_identifier(name: &str) -> String {
    name.replace('`', "``")
}

/// Wraps `name` in backticks after escaping it.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", escape_identifier(name))
}

/// Escapes a string literal body the way SHOW CREATE TABLE does for
/// comments: backslashes and the control characters are backslash-escaped,
/// single quotes are doubled.
#[must_use]
pub fn escape_value_for_create_table(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("''"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert_eq!(escape_identifier("plain"), "plain");
        assert_eq!(escape_identifier("we`ird"), "we``ird");
        assert_eq!(quote_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn comment_values() {
        assert_eq!(escape_value_for_create_table("it's"), "it''s");
        assert_eq!(escape_value_for_create_table("a\\b"), "a\\\\b");
        assert_eq!(escape_value_for_create_table("line\nnext\r"), "line\\nnext\\r");
        assert_eq!(escape_value_for_create_table("nul\0"), "nul\\0");
    }
}
