//! UPDATE statement builder.

use chrono::{NaiveDate, NaiveDateTime};

use crate::builder::where_clause;
use crate::dtype::SqlValue;
use crate::error::StatementError;
use crate::expr::Expr;
use crate::schema::Table;

/// Right-hand side of a SET assignment.
///
/// A scalar is encoded through the target column's codec; an expression
/// is used verbatim, which is how relative updates like `a = a + 1` are
/// written.
#[derive(Debug, Clone)]
pub enum SetValue {
    /// A scalar, encoded under the target column's type.
    Value(SqlValue),
    /// An expression fragment, spliced as-is.
    Expr(Expr),
}

impl From<Expr> for SetValue {
    fn from(expr: Expr) -> Self {
        Self::Expr(expr)
    }
}

impl From<SqlValue> for SetValue {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}

impl From<i64> for SetValue {
    fn from(v: i64) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<i32> for SetValue {
    fn from(v: i32) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<bool> for SetValue {
    fn from(v: bool) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<f64> for SetValue {
    fn from(v: f64) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<&str> for SetValue {
    fn from(v: &str) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<String> for SetValue {
    fn from(v: String) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<Vec<u8>> for SetValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<NaiveDate> for SetValue {
    fn from(v: NaiveDate) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<NaiveDateTime> for SetValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

/// Builds UPDATE statements for one table.
///
/// Without a WHERE clause the rendered statement updates every row.
#[derive(Debug)]
pub struct Update<'a> {
    table: &'a Table,
    assignments: Vec<String>,
    where_: Option<String>,
}

impl<'a> Update<'a> {
    pub(crate) fn new(table: &'a Table) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            where_: None,
        }
    }

    /// Adds a SET assignment. The column is checked against the table
    /// immediately, not at render time.
    ///
    /// # Errors
    ///
    /// [`StatementError::UnknownColumn`] for a column the table does not
    /// have; [`StatementError::Encode`] when a scalar does not encode
    /// under the column's type.
    pub fn set(mut self, column: &str, value: impl Into<SetValue>) -> Result<Self, StatementError> {
        let Ok(target) = self.table.column(column) else {
            return Err(StatementError::UnknownColumn {
                table: String::from(self.table.name()),
                column: String::from(column),
            });
        };
        let rendered = match value.into() {
            SetValue::Expr(expr) => String::from(expr.sql()),
            SetValue::Value(value) => target.data_type().encode(&value)?,
        };
        self.assignments.push(format!("{column} = {rendered}"));
        Ok(self)
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
    ///
    /// # Errors
    ///
    /// [`StatementError::EmptySet`] when no assignment was added.
    pub fn sql(&self) -> Result<String, StatementError> {
        if self.assignments.is_empty() {
            return Err(StatementError::EmptySet);
        }
        let mut clauses = vec![
            format!("UPDATE\t{}", self.table.name()),
            format!("SET\t{}", self.assignments.join(",\n\t")),
        ];
        if let Some(where_) = &self.where_ {
            clauses.push(where_.clone());
        }
        Ok(clauses.join("\n"))
    }
}
