//! Front matter extraction.
//!
//! Content files may start with a TOML block between `+++` delimiter
//! lines:
//!
//! ```text
//! +++
//! template = "post"
//! title = "Hello"
//! date = "2024-01-01"
//! +++
//!
//! Body text in Markdown.
//! ```
//!
//! A file without the opening delimiter has no front matter; that is an
//! empty table, not an error. An opened but unterminated block is treated
//! the same way (the whole file is body), matching how forgiving parsers
//! handle a stray `+++` first line.

use crate::error::BuildError;
use std::path::Path;
use toml::value::Table;

const DELIMITER: &str = "+++";

/// Split a content file into its front matter table and body text.
///
/// The returned body borrows from `raw`, not from `path`.
pub fn split<'a>(raw: &'a str, path: &Path) -> Result<(Table, &'a str), BuildError> {
    let Some(rest) = strip_open_delimiter(raw) else {
        return Ok((Table::new(), raw));
    };

    let Some((header, body)) = find_close_delimiter(rest) else {
        return Ok((Table::new(), raw));
    };

    let table: Table = toml::from_str(header).map_err(|source| BuildError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((table, body))
}

/// Strip a leading `+++` line, returning the remainder.
fn strip_open_delimiter(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix(DELIMITER)?;
    // The delimiter must occupy the whole first line
    match rest.trim_start_matches('\r').strip_prefix('\n') {
        Some(rest) => Some(rest),
        None if rest.is_empty() => Some(rest),
        None => None,
    }
}

/// Find the closing `+++` line, splitting header from body.
fn find_close_delimiter(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}
