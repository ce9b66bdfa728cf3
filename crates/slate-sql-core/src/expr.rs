//! SQL expression fragments and their combinators.
//!
//! An [`Expr`] is an immutable piece of SQL text plus the metadata the
//! statement builders need to reuse it: which column and table it came
//! from, which function produced it, what type its result decodes as, and
//! whether it carries a sort direction. Expressions are produced by the
//! comparison methods on [`Column`](crate::schema::Column), by the
//! function registry in [`func`](crate::func) and by the combinators in
//! this module. They are never mutated; combinators always build a new
//! expression from the text of their inputs.

use crate::dtype::DataType;
use crate::error::StatementError;

/// Sort direction attached to an ORDER BY or index column spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// The SQL keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// An immutable fragment of SQL text with builder-facing metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub(crate) sql: String,
    pub(crate) column: Option<String>,
    pub(crate) table: Option<String>,
    pub(crate) function: Option<&'static str>,
    pub(crate) result_type: Option<DataType>,
    pub(crate) sort: Option<SortOrder>,
}

impl Expr {
    pub(crate) fn fragment(sql: String) -> Self {
        Self {
            sql,
            column: None,
            table: None,
            function: None,
            result_type: None,
            sort: None,
        }
    }

    /// The SQL text of this fragment.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Unqualified name of the column this fragment originates from.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Name of the table this fragment originates from.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Name of the SQL function that produced this fragment, if any.
    #[must_use]
    pub fn function(&self) -> Option<&'static str> {
        self.function
    }

    /// Type the fragment's result decodes as, when known.
    #[must_use]
    pub fn result_type(&self) -> Option<DataType> {
        self.result_type
    }

    /// Sort direction, set by [`asc`] and [`desc`].
    #[must_use]
    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }
}

impl From<&str> for Expr {
    /// A raw column name, used for reflection-derived references where no
    /// live [`Column`](crate::schema::Column) object exists.
    fn from(name: &str) -> Self {
        Self::fragment(String::from(name))
    }
}

fn joined(clauses: &[Expr], sep: &str) -> Result<Expr, StatementError> {
    if clauses.is_empty() {
        return Err(StatementError::EmptyCriteria);
    }
    let parts: Vec<&str> = clauses.iter().map(Expr::sql).collect();
    Ok(Expr::fragment(format!("({})", parts.join(sep))))
}

/// AND-joins criteria into one parenthesized expression.
///
/// # Errors
///
/// [`StatementError::EmptyCriteria`] when `clauses` is empty.
pub fn and_(clauses: &[Expr]) -> Result<Expr, StatementError> {
    joined(clauses, " AND ")
}

/// OR-joins criteria into one parenthesized expression.
///
/// # Errors
///
/// [`StatementError::EmptyCriteria`] when `clauses` is empty.
pub fn or_(clauses: &[Expr]) -> Result<Expr, StatementError> {
    joined(clauses, " OR ")
}

fn sorted(target: Expr, order: SortOrder) -> Expr {
    Expr {
        sql: format!("{} {}", target.sql, order.keyword()),
        sort: Some(order),
        ..target
    }
}

/// Marks a column reference as an ascending sort key.
///
/// Accepts a bound [`Column`](crate::schema::Column) reference or a raw
/// name string.
#[must_use]
pub fn asc(target: impl Into<Expr>) -> Expr {
    sorted(target.into(), SortOrder::Asc)
}

/// Marks a column reference as a descending sort key.
#[must_use]
pub fn desc(target: impl Into<Expr>) -> Expr {
    sorted(target.into(), SortOrder::Desc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_joins_with_parens() {
        let combined = and_(&[
            Expr::fragment(String::from("col1 >= 0")),
            Expr::fragment(String::from("col2 <= 1")),
        ])
        .unwrap();
        assert_eq!(combined.sql(), "(col1 >= 0 AND col2 <= 1)");
    }

    #[test]
    fn test_or_joins_with_parens() {
        let combined = or_(&[
            Expr::fragment(String::from("col1 >= 0")),
            Expr::fragment(String::from("col2 <= 1")),
        ])
        .unwrap();
        assert_eq!(combined.sql(), "(col1 >= 0 OR col2 <= 1)");
    }

    #[test]
    fn test_empty_criteria_rejected() {
        assert!(matches!(and_(&[]), Err(StatementError::EmptyCriteria)));
        assert!(matches!(or_(&[]), Err(StatementError::EmptyCriteria)));
    }

    #[test]
    fn test_sort_wrappers_on_raw_names() {
        let key = asc("create_date");
        assert_eq!(key.sql(), "create_date ASC");
        assert_eq!(key.sort(), Some(SortOrder::Asc));

        let key = desc("age");
        assert_eq!(key.sql(), "age DESC");
        assert_eq!(key.sort(), Some(SortOrder::Desc));
    }
}
