//! The schema registry.

use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::schema::{Index, Table};

/// Insertion-ordered registries of tables and indexes.
///
/// Registration is explicit: build the descriptor, then register it.
/// Nothing registers itself as a construction side effect, so the
/// registry's content is always exactly what the caller put there.
#[derive(Debug, Default)]
pub struct MetaData {
    tables: IndexMap<String, Table>,
    indexes: IndexMap<String, Index>,
}

impl MetaData {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateTable`] when a table with the same name is
    /// already registered.
    pub fn register_table(&mut self, table: Table) -> Result<(), SchemaError> {
        let name = String::from(table.name());
        if self.tables.contains_key(&name) {
            return Err(SchemaError::DuplicateTable(name));
        }
        self.tables.insert(name, table);
        Ok(())
    }

    /// Registers an index.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateIndex`] when an index with the same name is
    /// already registered.
    pub fn register_index(&mut self, index: Index) -> Result<(), SchemaError> {
        let name = String::from(index.name());
        if self.indexes.contains_key(&name) {
            return Err(SchemaError::DuplicateIndex(name));
        }
        self.indexes.insert(name, index);
        Ok(())
    }

    /// Removes a table from the registry and returns it.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownTable`] when no table has that name.
    pub fn remove_table(&mut self, name: &str) -> Result<Table, SchemaError> {
        self.tables
            .shift_remove(name)
            .ok_or_else(|| SchemaError::UnknownTable(String::from(name)))
    }

    /// Removes an index from the registry and returns it.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownIndex`] when no index has that name.
    pub fn remove_index(&mut self, name: &str) -> Result<Index, SchemaError> {
        self.indexes
            .shift_remove(name)
            .ok_or_else(|| SchemaError::UnknownIndex(String::from(name)))
    }

    /// Looks a table up by name.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownTable`] when no table has that name.
    pub fn table(&self, name: &str) -> Result<&Table, SchemaError> {
        self.tables
            .get(name)
            .ok_or_else(|| SchemaError::UnknownTable(String::from(name)))
    }

    /// Looks an index up by name.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownIndex`] when no index has that name.
    pub fn index(&self, name: &str) -> Result<&Index, SchemaError> {
        self.indexes
            .get(name)
            .ok_or_else(|| SchemaError::UnknownIndex(String::from(name)))
    }

    /// Registered tables in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Registered indexes in registration order.
    pub fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.values()
    }

    /// Registered table names in registration order.
    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Registered index names in registration order.
    #[must_use]
    pub fn index_names(&self) -> Vec<&str> {
        self.indexes.keys().map(String::as_str).collect()
    }
}
