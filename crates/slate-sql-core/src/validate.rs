//! Identifier validation.
//!
//! Table, column and index names are the one place where caller-supplied
//! text is spliced into SQL without quoting or parameter binding, so they
//! are checked once, at construction time, against a closed character set.
//! Values never go through this path; they are encoded by the type codecs
//! in [`dtype`](crate::dtype).

use crate::error::IdentifierError;

/// Checks a table, column or index name.
///
/// Accepted names are non-empty, consist only of `[a-z0-9_]` and do not
/// start with a digit. Upper-case letters are rejected: SQLite treats
/// identifiers case-insensitively and keeping everything lower case avoids
/// names that differ only in case.
///
/// # Errors
///
/// Returns the first [`IdentifierError`] found.
pub fn exam_identifier(name: &str) -> Result<(), IdentifierError> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(IdentifierError::Empty)?;
    if first.is_ascii_digit() {
        return Err(IdentifierError::LeadingDigit);
    }
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            return Err(IdentifierError::UpperCase);
        }
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_') {
            return Err(IdentifierError::ForbiddenChar(ch));
        }
    }
    Ok(())
}
