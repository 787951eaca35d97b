//! Splits a migration script into executable statements.
//!
//! Splitting is purely textual: statements are separated by `;`, and the
//! splitter assumes no semicolons appear inside string literals or comments.
//! That is a documented restriction on script authors, not something the
//! engine tries to parse its way around.

/// Split `sql` into trimmed, non-empty statements in source order.
///
/// Leading lines that are blank or `--` line comments are dropped from each
/// statement; a statement that is nothing but comments is discarded.
pub fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(strip_leading_comments)
        .filter(|stmt| !stmt.is_empty())
        .collect()
}

fn strip_leading_comments(statement: &str) -> String {
    statement
        .lines()
        .skip_while(|line| {
            let line = line.trim_start();
            line.is_empty() || line.starts_with("--")
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
