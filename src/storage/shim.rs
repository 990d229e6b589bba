//! NULL-literal repair for the legacy driver.
//!
//! The legacy driver has no NULL expression, so rendering a statement turns a
//! null parameter into the string literal `'NULL'`. Before such a statement is
//! submitted its SQL text is rewritten and parsed again.

use super::driver::{DriverError, PollingDriver};
use super::statement::Statement;

const QUOTED_NULL: &str = "'NULL'";

/// Render `stmt` through the driver, turn quoted NULL literals back into the
/// keyword and parse the result into a parameterless statement.
///
/// # Errors
///
/// Returns the driver's error if the rewritten SQL does not parse.
pub fn unescape_nulls(
    driver: &dyn PollingDriver,
    stmt: &Statement,
) -> Result<Statement, DriverError> {
    let sql = driver.statement_to_sql(stmt);
    let rewritten = unescape_null_literals(&sql);
    if rewritten != sql {
        tracing::debug!("rewrote quoted NULL literals: {rewritten}");
    }
    driver.parse_sql(&rewritten)
}

/// Replace every `'NULL'` that is not directly preceded or followed by another
/// quote with the bare `NULL` keyword.
///
/// A quote on either side means the token is part of a longer literal, such as
/// the escaped string `'''NULL'''`, and is left untouched.
#[must_use]
pub fn unescape_null_literals(sql: &str) -> String {
    let bytes = sql.as_bytes();
    let token = QUOTED_NULL.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut copied = 0;
    let mut i = 0;

    while i + token.len() <= bytes.len() {
        if &bytes[i..i + token.len()] == token {
            let quote_before = i > 0 && bytes[i - 1] == b'\'';
            let quote_after = bytes.get(i + token.len()) == Some(&b'\'');
            if !quote_before && !quote_after {
                out.push_str(&sql[copied..i]);
                out.push_str("NULL");
                i += token.len();
                copied = i;
                continue;
            }
        }
        i += 1;
    }

    out.push_str(&sql[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_bare_token() {
        assert_eq!(
            unescape_null_literals("SELECT * FROM t WHERE x = 'NULL'"),
            "SELECT * FROM t WHERE x = NULL"
        );
    }

    #[test]
    fn test_rewrites_every_occurrence() {
        assert_eq!(
            unescape_null_literals("INSERT INTO t (a, b) VALUES ('NULL', 'NULL')"),
            "INSERT INTO t (a, b) VALUES (NULL, NULL)"
        );
    }

    #[test]
    fn test_leaves_escaped_string_alone() {
        // The text value 'NULL' (quotes included) renders as '''NULL'''.
        let sql = "UPDATE t SET a = '''NULL''' WHERE id = 1";
        assert_eq!(unescape_null_literals(sql), sql);
    }

    #[test]
    fn test_adjacent_candidates_resume_one_past_rejection() {
        // The first candidate is quote-adjacent, the second starts at the
        // shared quote and is preceded by a letter.
        assert_eq!(unescape_null_literals("''NULL'NULL'"), "''NULLNULL");
        assert_eq!(unescape_null_literals("x'NULL'NULL'"), "xNULLNULL'");
    }

    #[test]
    fn test_no_token() {
        let sql = "SELECT 'nullable', NULL FROM t";
        assert_eq!(unescape_null_literals(sql), sql);
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        assert_eq!(
            unescape_null_literals("VALUES ('héllo', 'NULL')"),
            "VALUES ('héllo', NULL)"
        );
    }
}
