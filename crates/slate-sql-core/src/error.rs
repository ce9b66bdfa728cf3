//! Error types for schema construction and statement building.

/// Reasons an identifier fails validation.
///
/// Raised at construction time only; an invalid name is never recoverable
/// downstream, the caller has to fix it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The identifier is the empty string.
    #[error("identifier cannot be empty")]
    Empty,

    /// A character outside `[a-z0-9_]` was found.
    #[error("'{0}' is not allowed in an identifier")]
    ForbiddenChar(char),

    /// The first character is a digit.
    #[error("identifier cannot start with a digit")]
    LeadingDigit,

    /// An upper-case letter was found. SQLite identifiers are case
    /// insensitive, so everything is kept lower case.
    #[error("identifier must be lower case")]
    UpperCase,
}

/// Errors raised while building schema objects (columns, tables, indexes)
/// or mutating a [`MetaData`](crate::schema::MetaData) registry.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// An identifier failed validation.
    #[error("invalid identifier '{name}': {source}")]
    InvalidIdentifier {
        /// The offending name.
        name: String,
        /// What was wrong with it.
        source: IdentifierError,
    },

    /// Two columns in one table share a name.
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// A table was built with no columns; there is no valid CREATE TABLE
    /// for it.
    #[error("table '{0}' has no columns")]
    EmptyTable(String),

    /// A column already bound to one table was handed to another.
    #[error("column '{column}' is already bound to table '{table}'")]
    ColumnRebound {
        /// The column being reused.
        column: String,
        /// The table it is already bound to.
        table: String,
    },

    /// A column default cannot be encoded by the column's data type.
    #[error("default for column '{column}' cannot be encoded: {source}")]
    BadDefault {
        /// The column with the bad default.
        column: String,
        /// The codec failure.
        source: EncodeError,
    },

    /// A table with this name is already registered.
    #[error("duplicate table name '{0}'")]
    DuplicateTable(String),

    /// An index with this name is already registered.
    #[error("duplicate index name '{0}'")]
    DuplicateIndex(String),

    /// An index was given column specs from more than one table.
    #[error("index '{index}' mixes columns from tables '{first}' and '{second}'")]
    MixedTableIndex {
        /// The index being built.
        index: String,
        /// Table of the earlier specs.
        first: String,
        /// The conflicting table.
        second: String,
    },

    /// No column spec (or explicit table name) told the index which table
    /// it belongs to.
    #[error("index '{0}' has no resolvable table")]
    IndexWithoutTable(String),

    /// A column lookup by name failed.
    #[error("no column '{column}' in table '{table}'")]
    UnknownColumn {
        /// The table searched.
        table: String,
        /// The missing column.
        column: String,
    },

    /// A table lookup by name failed.
    #[error("no table '{0}' registered")]
    UnknownTable(String),

    /// An index lookup by name failed.
    #[error("no index '{0}' registered")]
    UnknownIndex(String),
}

/// A value cannot be rendered as a SQL literal of the requested type.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The value variant does not match the column's data type.
    #[error("{value_kind} value cannot be encoded as {data_type}")]
    TypeMismatch {
        /// Name of the data type doing the encoding.
        data_type: &'static str,
        /// Kind of the value that was passed.
        value_kind: &'static str,
    },

    /// NaN or an infinity was passed to the REAL codec; SQL has no
    /// literal for them.
    #[error("non-finite value {0} has no REAL literal")]
    NonFiniteReal(f64),

    /// Serializing an arbitrary object payload failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A SQL literal cannot be decoded back into a value of the expected type.
///
/// Decoding never falls back to a default value; corrupt input is always
/// surfaced.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The literal text does not parse as the expected type.
    #[error("'{literal}' is not a valid {data_type} literal")]
    Malformed {
        /// Name of the data type doing the decoding.
        data_type: &'static str,
        /// The offending literal text.
        literal: String,
    },

    /// A blob literal is not of the form `X'..hex..'`.
    #[error("blob literal must be of the form X'..hex..'")]
    BadBlobLiteral,

    /// A blob literal contains a non-hex digit or an odd digit count.
    #[error("invalid hex in blob literal")]
    BadHex,

    /// A serialized-object payload does not deserialize.
    #[error("serialized payload is corrupt: {0}")]
    Corrupt(serde_json::Error),
}

/// Errors raised while assembling a statement, detected eagerly at build
/// time rather than when the SQL text is rendered.
#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    /// A SELECT was built with no projections.
    #[error("select needs at least one projection")]
    EmptyProjection,

    /// A function expression in a projection carries no result type, so
    /// downstream rows could not be decoded.
    #[error("projection '{0}' carries no result type")]
    UntypedProjection(String),

    /// Projections reference columns of two different tables.
    #[error("projection mixes columns of tables '{first}' and '{second}'")]
    MixedTables {
        /// Table of the earlier projections.
        first: String,
        /// The conflicting table.
        second: String,
    },

    /// A SELECT has neither a FROM table nor a nested source.
    #[error("select has no FROM source")]
    MissingFrom,

    /// A referenced column does not belong to the statement's table.
    #[error("'{column}' is not a column of table '{table}'")]
    UnknownColumn {
        /// The statement's table.
        table: String,
        /// The missing column.
        column: String,
    },

    /// `where_` or a combinator was called with no criteria.
    #[error("at least one criterion is required")]
    EmptyCriteria,

    /// An UPDATE was rendered with no SET assignments.
    #[error("update has no assignments")]
    EmptySet,

    /// A value failed to encode under the column's codec.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Errors raised by [`Row`](crate::row::Row) construction and mutation.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// The column and value sequences differ in length.
    #[error("row has {columns} columns but {values} values")]
    LengthMismatch {
        /// Number of column names.
        columns: usize,
        /// Number of values.
        values: usize,
    },

    /// Two row columns share a name.
    #[error("duplicate row column '{0}'")]
    DuplicateColumn(String),

    /// A name-based access referenced a column the row does not have.
    #[error("row has no column '{0}'")]
    UnknownColumn(String),
}
