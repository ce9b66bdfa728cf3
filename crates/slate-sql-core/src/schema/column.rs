//! Column descriptors and the comparison methods that produce
//! [`Expr`] fragments.

use chrono::{NaiveDate, NaiveDateTime};

use crate::dtype::{quote_text, DataType, SqlValue};
use crate::error::{EncodeError, SchemaError};
use crate::expr::{Expr, SortOrder};
use crate::validate::exam_identifier;

/// A schema-level column descriptor.
///
/// A column starts unbound; handing it to
/// [`Table::new`](crate::schema::Table::new) binds it to that table, which
/// gives it a qualified name. Binding happens at most once; reusing a
/// bound column in a second table is a construction error.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    data_type: DataType,
    nullable: bool,
    primary_key: bool,
    default: Option<SqlValue>,
    default_literal: Option<String>,
    table: Option<String>,
}

impl Column {
    /// Creates an unbound column.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidIdentifier`] when the name fails validation.
    pub fn new(name: &str, data_type: DataType) -> Result<Self, SchemaError> {
        exam_identifier(name).map_err(|source| SchemaError::InvalidIdentifier {
            name: String::from(name),
            source,
        })?;
        Ok(Self {
            name: String::from(name),
            data_type,
            nullable: true,
            primary_key: false,
            default: None,
            default_literal: None,
            table: None,
        })
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Sets a default value, encoded immediately under this column's type.
    ///
    /// # Errors
    ///
    /// [`SchemaError::BadDefault`] when the value does not encode under
    /// the column's data type.
    pub fn with_default(mut self, value: impl Into<SqlValue>) -> Result<Self, SchemaError> {
        let value = value.into();
        let literal = self
            .data_type
            .encode(&value)
            .map_err(|source| SchemaError::BadDefault {
                column: self.name.clone(),
                source,
            })?;
        self.default = Some(value);
        self.default_literal = Some(literal);
        Ok(self)
    }

    /// The column name, unqualified.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column's logical type.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Whether NULL is allowed.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether the column is part of the primary key.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// The default value, if one was set.
    #[must_use]
    pub fn default(&self) -> Option<&SqlValue> {
        self.default.as_ref()
    }

    /// Name of the table this column is bound to.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// `table.column` form, available once bound.
    #[must_use]
    pub fn qualified_name(&self) -> Option<String> {
        self.table.as_ref().map(|t| format!("{t}.{}", self.name))
    }

    pub(crate) fn bind(&mut self, table: &str) -> Result<(), SchemaError> {
        if let Some(bound) = &self.table {
            return Err(SchemaError::ColumnRebound {
                column: self.name.clone(),
                table: bound.clone(),
            });
        }
        self.table = Some(String::from(table));
        Ok(())
    }

    /// How the column is referenced inside expressions: qualified when
    /// bound, bare otherwise.
    fn reference(&self) -> String {
        self.qualified_name().unwrap_or_else(|| self.name.clone())
    }

    fn expr(&self, sql: String) -> Expr {
        let mut expr = Expr::fragment(sql);
        expr.column = Some(self.name.clone());
        expr.table = self.table.clone();
        expr
    }

    fn operand_text(&self, operand: Operand) -> Result<String, EncodeError> {
        match operand {
            Operand::Column(reference) => Ok(reference),
            Operand::Value(value) => self.data_type.encode(&value),
        }
    }

    fn compare(&self, op: &str, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        let text = self.operand_text(other.into())?;
        Ok(self.expr(format!("{} {op} {text}", self.reference())))
    }

    /// `= value`, or `IS NULL` when the operand is NULL.
    ///
    /// NULL never compares with `=`; the IS NULL form is the only one the
    /// engine evaluates usefully.
    ///
    /// # Errors
    ///
    /// Scalar operands that do not encode under this column's type.
    pub fn eq(&self, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        match other.into() {
            Operand::Value(SqlValue::Null) => {
                Ok(self.expr(format!("{} IS NULL", self.reference())))
            }
            operand => self.compare("=", operand),
        }
    }

    /// `!= value`, or `NOT NULL` when the operand is NULL.
    ///
    /// # Errors
    ///
    /// Scalar operands that do not encode under this column's type.
    pub fn ne(&self, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        match other.into() {
            Operand::Value(SqlValue::Null) => {
                Ok(self.expr(format!("{} NOT NULL", self.reference())))
            }
            operand => self.compare("!=", operand),
        }
    }

    /// `< value`.
    ///
    /// # Errors
    ///
    /// Scalar operands that do not encode under this column's type.
    pub fn lt(&self, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        self.compare("<", other)
    }

    /// `<= value`.
    ///
    /// # Errors
    ///
    /// Scalar operands that do not encode under this column's type.
    pub fn le(&self, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        self.compare("<=", other)
    }

    /// `> value`.
    ///
    /// # Errors
    ///
    /// Scalar operands that do not encode under this column's type.
    pub fn gt(&self, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        self.compare(">", other)
    }

    /// `>= value`.
    ///
    /// # Errors
    ///
    /// Scalar operands that do not encode under this column's type.
    pub fn ge(&self, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        self.compare(">=", other)
    }

    /// `BETWEEN lo AND hi`. Either bound may itself be a column.
    ///
    /// # Errors
    ///
    /// Scalar bounds that do not encode under this column's type.
    pub fn between(
        &self,
        lower: impl Into<Operand>,
        upper: impl Into<Operand>,
    ) -> Result<Expr, EncodeError> {
        let lower = self.operand_text(lower.into())?;
        let upper = self.operand_text(upper.into())?;
        Ok(self.expr(format!(
            "{} BETWEEN {lower} AND {upper}",
            self.reference()
        )))
    }

    /// `LIKE 'pattern'`. The pattern is always quoted as text.
    #[must_use]
    pub fn like(&self, pattern: &str) -> Expr {
        self.expr(format!("{} LIKE {}", self.reference(), quote_text(pattern)))
    }

    /// `IN (…)` over encoded candidate values.
    ///
    /// # Errors
    ///
    /// Candidates that do not encode under this column's type.
    pub fn in_<T: Into<SqlValue>>(&self, candidates: Vec<T>) -> Result<Expr, EncodeError> {
        let mut literals = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            literals.push(self.data_type.encode(&candidate.into())?);
        }
        Ok(self.expr(format!(
            "{} IN ({})",
            self.reference(),
            literals.join(", ")
        )))
    }

    /// `col + value`, for SET clauses and projections only.
    ///
    /// # Errors
    ///
    /// Scalar operands that do not encode under this column's type.
    pub fn add(&self, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        self.compare("+", other)
    }

    /// `col - value`.
    ///
    /// # Errors
    ///
    /// Scalar operands that do not encode under this column's type.
    pub fn sub(&self, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        self.compare("-", other)
    }

    /// `col * value`.
    ///
    /// # Errors
    ///
    /// Scalar operands that do not encode under this column's type.
    pub fn mul(&self, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        self.compare("*", other)
    }

    /// `col / value`.
    ///
    /// # Errors
    ///
    /// Scalar operands that do not encode under this column's type.
    pub fn div(&self, other: impl Into<Operand>) -> Result<Expr, EncodeError> {
        self.compare("/", other)
    }

    /// Unary `- col`.
    #[must_use]
    pub fn neg(&self) -> Expr {
        self.expr(format!("- {}", self.reference()))
    }

    /// Unary `+ col`.
    #[must_use]
    pub fn pos(&self) -> Expr {
        self.expr(format!("+ {}", self.reference()))
    }

    /// Ascending sort key over this column.
    #[must_use]
    pub fn asc(&self) -> Expr {
        let mut expr = self.expr(format!("{} ASC", self.reference()));
        expr.sort = Some(SortOrder::Asc);
        expr
    }

    /// Descending sort key over this column.
    #[must_use]
    pub fn desc(&self) -> Expr {
        let mut expr = self.expr(format!("{} DESC", self.reference()));
        expr.sort = Some(SortOrder::Desc);
        expr
    }

    /// Renders this column's line in a CREATE TABLE body, without any
    /// primary-key marker. Composite keys are declared in one trailing
    /// clause by the table.
    pub(crate) fn definition(&self) -> String {
        let mut def = format!("{} {}", self.name, self.data_type.declared_type());
        if !self.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(literal) = &self.default_literal {
            def.push_str(" DEFAULT ");
            def.push_str(literal);
        }
        def
    }
}

impl From<&Column> for Expr {
    /// A bare reference to the column, qualified when bound. Used by sort
    /// wrappers and projections; carries the column's type so projected
    /// rows can be decoded.
    fn from(column: &Column) -> Self {
        let mut expr = column.expr(column.reference());
        expr.result_type = Some(column.data_type);
        expr
    }
}

/// Right-hand side of a comparison: another column or a scalar value.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A column reference, compared by name without literal encoding.
    Column(String),
    /// A scalar, encoded through the left-hand column's codec.
    Value(SqlValue),
}

impl From<&Column> for Operand {
    fn from(column: &Column) -> Self {
        Self::Column(column.reference())
    }
}

impl From<SqlValue> for Operand {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<bool> for Operand {
    fn from(v: bool) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<Vec<u8>> for Operand {
    fn from(v: Vec<u8>) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<&[u8]> for Operand {
    fn from(v: &[u8]) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<NaiveDate> for Operand {
    fn from(v: NaiveDate) -> Self {
        Self::Value(SqlValue::from(v))
    }
}

impl From<NaiveDateTime> for Operand {
    fn from(v: NaiveDateTime) -> Self {
        Self::Value(SqlValue::from(v))
    }
}
