//! Table descriptors and CREATE/DROP TABLE rendering.

use indexmap::IndexMap;

use crate::builder::{Delete, Insert, Update};
use crate::error::SchemaError;
use crate::schema::Column;
use crate::validate::exam_identifier;

/// An ordered collection of bound columns.
///
/// Construction binds every column to this table and derives the
/// primary-key and serialized-column sets once; they do not change
/// afterwards. Column order is significant, it fixes the positional
/// tuple order of full-record INSERTs.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: IndexMap<String, Column>,
    primary_key_columns: Vec<String>,
    serialized_columns: Vec<String>,
}

impl Table {
    /// Builds a table from unbound columns.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidIdentifier`] for a bad table name,
    /// [`SchemaError::EmptyTable`] for an empty column list,
    /// [`SchemaError::DuplicateColumn`] for repeated column names and
    /// [`SchemaError::ColumnRebound`] when a column already belongs to
    /// another table.
    pub fn new(name: &str, columns: Vec<Column>) -> Result<Self, SchemaError> {
        exam_identifier(name).map_err(|source| SchemaError::InvalidIdentifier {
            name: String::from(name),
            source,
        })?;
        if columns.is_empty() {
            return Err(SchemaError::EmptyTable(String::from(name)));
        }

        let mut bound: IndexMap<String, Column> = IndexMap::with_capacity(columns.len());
        let mut primary_key_columns = Vec::new();
        let mut serialized_columns = Vec::new();
        for mut column in columns {
            column.bind(name)?;
            if column.is_primary_key() {
                primary_key_columns.push(String::from(column.name()));
            }
            if column.data_type() == crate::dtype::DataType::Serialized {
                serialized_columns.push(String::from(column.name()));
            }
            let key = String::from(column.name());
            if bound.insert(key.clone(), column).is_some() {
                return Err(SchemaError::DuplicateColumn(key));
            }
        }

        Ok(Self {
            name: String::from(name),
            columns: bound,
            primary_key_columns,
            serialized_columns,
        })
    }

    /// The table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks a column up by name.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownColumn`] when no column has that name.
    pub fn column(&self, name: &str) -> Result<&Column, SchemaError> {
        self.columns.get(name).ok_or_else(|| SchemaError::UnknownColumn {
            table: self.name.clone(),
            column: String::from(name),
        })
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Names of the primary-key columns, in declaration order.
    #[must_use]
    pub fn primary_key_columns(&self) -> &[String] {
        &self.primary_key_columns
    }

    /// Names of the columns holding serialized-object payloads.
    #[must_use]
    pub fn serialized_columns(&self) -> &[String] {
        &self.serialized_columns
    }

    /// Projection expressions for every column, in declaration order.
    /// The usual argument to [`Select::new`](crate::builder::Select::new).
    #[must_use]
    pub fn all(&self) -> Vec<crate::expr::Expr> {
        self.columns.values().map(Into::into).collect()
    }

    /// Starts an INSERT against this table.
    #[must_use]
    pub fn insert(&self) -> Insert<'_> {
        Insert::new(self)
    }

    /// Starts an UPDATE against this table.
    #[must_use]
    pub fn update(&self) -> Update<'_> {
        Update::new(self)
    }

    /// Starts a DELETE against this table.
    #[must_use]
    pub fn delete(&self) -> Delete<'_> {
        Delete::new(self)
    }

    /// Renders the CREATE TABLE statement.
    ///
    /// A multi-column primary key is declared in one trailing
    /// `PRIMARY KEY (…)` clause; column definitions never carry their own
    /// marker, so composite keys are not double-declared.
    #[must_use]
    pub fn create_table_sql(&self) -> String {
        let mut lines: Vec<String> = self
            .columns
            .values()
            .map(|c| format!("\t{}", c.definition()))
            .collect();
        if !self.primary_key_columns.is_empty() {
            lines.push(format!(
                "\tPRIMARY KEY ({})",
                self.primary_key_columns.join(", ")
            ));
        }
        format!("CREATE TABLE {}\n(\n{}\n)", self.name, lines.join(",\n"))
    }

    /// Renders the DROP TABLE statement.
    #[must_use]
    pub fn drop_table_sql(&self) -> String {
        format!("DROP TABLE {}", self.name)
    }
}
