//! The fixed registry of SQL functions usable in projections.
//!
//! Each function takes a bound column and returns an [`Expr`] carrying a
//! declared result type, so SELECTs built over it know how to decode the
//! projected value. Function calls use the unqualified column name, as
//! the engine expects inside aggregate arguments.

use crate::dtype::DataType;
use crate::expr::Expr;
use crate::schema::Column;

fn call(name: &'static str, column: &Column, result_type: DataType) -> Expr {
    let mut expr = Expr::fragment(format!("{name}({})", column.name()));
    expr.column = Some(String::from(column.name()));
    expr.table = column.table().map(String::from);
    expr.function = Some(name);
    expr.result_type = Some(result_type);
    expr
}

/// `COUNT(col)`, decoding as an integer.
#[must_use]
pub fn count(column: &Column) -> Expr {
    call("COUNT", column, DataType::Integer)
}

/// `MAX(col)`, decoding as the column's own type.
#[must_use]
pub fn max(column: &Column) -> Expr {
    call("MAX", column, column.data_type())
}

/// `MIN(col)`, decoding as the column's own type.
#[must_use]
pub fn min(column: &Column) -> Expr {
    call("MIN", column, column.data_type())
}

/// `ABS(col)`, decoding as the column's own type.
#[must_use]
pub fn abs(column: &Column) -> Expr {
    call("ABS", column, column.data_type())
}

/// `ROUND(col)`, decoding as the column's own type.
#[must_use]
pub fn round(column: &Column) -> Expr {
    call("ROUND", column, column.data_type())
}

/// `LENGTH(col)`, decoding as an integer.
#[must_use]
pub fn length(column: &Column) -> Expr {
    call("LENGTH", column, DataType::Integer)
}

/// `LOWER(col)`, decoding as text.
#[must_use]
pub fn lower(column: &Column) -> Expr {
    call("LOWER", column, DataType::Text)
}

/// `UPPER(col)`, decoding as text.
#[must_use]
pub fn upper(column: &Column) -> Expr {
    call("UPPER", column, DataType::Text)
}
