//! SQLite execution engine for the statement builders and schema
//! descriptors of `slate-sql-core`.
//!
//! [`SqliteEngine`] owns a synchronous connection and covers insertion
//! (single, bulk with per-record conflict isolation, insert-or-update),
//! typed SELECT decoding through each statement's shadow projection,
//! registry-consistent DROPs and schema reflection from the live
//! catalog.
//!
//! ```no_run
//! use slate_sql_core::{Column, DataType, MetaData, SqlValue, Table};
//! use slate_sql_sqlite::SqliteEngine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = SqliteEngine::open("app.db")?;
//! let mut metadata = MetaData::new();
//! metadata.register_table(Table::new(
//!     "users",
//!     vec![
//!         Column::new("_id", DataType::Integer)?.primary_key(),
//!         Column::new("name", DataType::Text)?.not_null(),
//!     ],
//! )?)?;
//! engine.create_all(&metadata);
//!
//! let users = metadata.table("users")?;
//! let insert = users.insert();
//! engine.insert_record(&insert, &[SqlValue::from(1), SqlValue::from("alice")])?;
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod reflect;
mod value_io;

pub use engine::SqliteEngine;
pub use error::EngineError;
