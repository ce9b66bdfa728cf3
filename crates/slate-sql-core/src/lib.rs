//! Typed SQL statement builders, schema metadata and value codecs for
//! SQLite.
//!
//! The crate is driver-agnostic: it turns schema descriptions into SQL
//! text and converts values to and from SQL literals, but performs no
//! I/O. Execution lives in the companion `slate-sql-sqlite` crate.
//!
//! ```
//! use slate_sql_core::builder::Select;
//! use slate_sql_core::dtype::DataType;
//! use slate_sql_core::schema::{Column, MetaData, Table};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut metadata = MetaData::new();
//! let users = Table::new(
//!     "users",
//!     vec![
//!         Column::new("_id", DataType::Integer)?.primary_key(),
//!         Column::new("name", DataType::Text)?.not_null(),
//!     ],
//! )?;
//!
//! let select = Select::new(users.all())?
//!     .where_(&[users.column("name")?.like("a%")])?
//!     .limit(10);
//! assert_eq!(
//!     select.sql()?,
//!     "SELECT\tusers._id,\n\tusers.name\nFROM\tusers\nWHERE\tusers.name LIKE 'a%'\nLIMIT 10"
//! );
//!
//! metadata.register_table(users)?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod dtype;
pub mod error;
pub mod expr;
pub mod func;
pub mod row;
pub mod schema;
pub mod validate;

pub use builder::{Delete, Insert, Select, SetValue, Update};
pub use dtype::{DataType, SqlValue};
pub use error::{
    DecodeError, EncodeError, IdentifierError, RowError, SchemaError, StatementError,
};
pub use expr::{and_, asc, desc, or_, Expr, SortOrder};
pub use row::Row;
pub use schema::{Column, Index, MetaData, Operand, Table};
