//! Schema metadata: columns, tables, indexes and the registry that holds
//! them.

mod column;
mod index;
mod metadata;
mod table;

pub use column::{Column, Operand};
pub use index::Index;
pub use metadata::MetaData;
pub use table::Table;
