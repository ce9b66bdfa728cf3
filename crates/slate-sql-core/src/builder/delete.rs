//! DELETE statement builder.

use crate::builder::where_clause;
use crate::error::StatementError;
use crate::expr::Expr;
use crate::schema::Table;

/// Builds DELETE statements for one table.
///
/// Without a WHERE clause the rendered statement deletes every row.
#[derive(Debug)]
pub struct Delete<'a> {
    table: &'a Table,
    where_: Option<String>,
}

impl<'a> Delete<'a> {
    pub(crate) fn new(table: &'a Table) -> Self {
        Self {
            table,
            where_: None,
        }
    }

    /// AND-joins filter criteria into the WHERE clause.
    ///
    /// # Errors
    ///
    /// [`StatementError::EmptyCriteria`] when `criteria` is empty.
    pub fn where_(mut self, criteria: &[Expr]) -> Result<Self, StatementError> {
        self.where_ = Some(where_clause(criteria)?);
        Ok(self)
    }

    /// Renders the statement.
    #[must_use]
    pub fn sql(&self) -> String {
        let mut sql = format!("DELETE FROM\t{}", self.table.name());
        if let Some(where_) = &self.where_ {
            sql.push('\n');
            sql.push_str(where_);
        }
        sql
    }
}
