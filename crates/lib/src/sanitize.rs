//! # SQL Sanitizer
//!
//! Strips conversational scaffolding from the model's raw text and isolates
//! the first `SELECT ...` statement. This is a best-effort contract: if no
//! SELECT token exists, the cleaned text is returned as-is and will fail
//! later at execution time.

use crate::errors::AnalyzerError;
use regex::Regex;

/// Cleans the model's raw output so only the SQL statement remains.
///
/// Steps, in order:
/// 1. Strip one leading `Question:` or `SQLQuery:` label (case-insensitive).
/// 2. Remove every triple-backtick marker and every literal `sql`.
/// 3. Return everything from the first case-insensitive `SELECT` onward,
///    trimmed; if there is no `SELECT`, return the cleaned text from
///    steps 1-2.
///
/// Multiple statements are not split: anything after the first `SELECT` is
/// kept verbatim, including trailing statements some drivers will reject.
pub fn clean_sql(raw: &str) -> Result<String, AnalyzerError> {
    let label_re = Regex::new(r"(?i)^(Question:|SQLQuery:)\s*")?;
    let cleaned = label_re.replace(raw.trim(), "").to_string();
    let cleaned = cleaned.replace("```", "").replace("sql", "");
    let cleaned = cleaned.trim();

    let select_re = Regex::new(r"(?is)(SELECT\s.+)")?;
    let sql = match select_re.captures(cleaned).and_then(|caps| caps.get(1)) {
        Some(m) => m.as_str().trim().to_string(),
        None => cleaned.to_string(),
    };

    Ok(sql)
}
