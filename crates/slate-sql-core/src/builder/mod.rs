//! Statement builders.
//!
//! Each builder assembles [`Expr`](crate::expr::Expr) fragments and
//! column references into complete SQL text. Clause layout is fixed per
//! statement; absent clauses are omitted entirely, never emitted empty.

mod delete;
mod insert;
mod select;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use update::{SetValue, Update};

use crate::expr::Expr;

/// `WHERE\t…` with criteria AND-joined across indented lines.
fn where_clause(criteria: &[Expr]) -> Result<String, crate::error::StatementError> {
    if criteria.is_empty() {
        return Err(crate::error::StatementError::EmptyCriteria);
    }
    let parts: Vec<&str> = criteria.iter().map(Expr::sql).collect();
    Ok(format!("WHERE\t{}", parts.join("\n\tAND ")))
}
