//! The synchronous SQLite execution engine.

use std::path::Path;

use rusqlite::{params_from_iter, Connection};
use tracing::{debug, instrument, warn};

use slate_sql_core::{
    Delete, Insert, MetaData, Row, Select, SqlValue, Table, Update,
};

use crate::error::EngineError;
use crate::value_io::{bind_value, read_value};

/// A SQLite connection that executes the statements built by
/// `slate-sql-core`.
///
/// All methods are synchronous; the core builders themselves never touch
/// the connection.
pub struct SqliteEngine {
    pub(crate) conn: Connection,
}

impl SqliteEngine {
    /// Opens (or creates) a database file.
    ///
    /// # Errors
    ///
    /// Any failure opening the file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let conn = Connection::open(path.as_ref())?;
        debug!("opened database");
        Ok(Self { conn })
    }

    /// Opens an in-memory database.
    ///
    /// # Errors
    ///
    /// Any failure creating the connection.
    pub fn open_in_memory() -> Result<Self, EngineError> {
        let conn = Connection::open_in_memory()?;
        debug!("opened in-memory database");
        Ok(Self { conn })
    }

    /// Executes one parameterless statement, returning the affected row
    /// count.
    ///
    /// # Errors
    ///
    /// Any engine-reported failure.
    pub fn execute(&self, sql: &str) -> Result<usize, EngineError> {
        Ok(self.conn.execute(sql, [])?)
    }

    fn bind_record(table: &Table, record: &[SqlValue]) -> Result<Vec<rusqlite::types::Value>, EngineError> {
        if record.len() != table.len() {
            return Err(EngineError::RecordShape {
                table: String::from(table.name()),
                columns: table.len(),
                values: record.len(),
            });
        }
        table
            .columns()
            .zip(record)
            .map(|(column, value)| Ok(bind_value(value, column.data_type())?))
            .collect()
    }

    fn bind_row(table: &Table, row: &Row) -> Result<Vec<rusqlite::types::Value>, EngineError> {
        row.columns()
            .iter()
            .zip(row.values())
            .map(|(name, value)| {
                let column = table.column(name)?;
                Ok(bind_value(value, column.data_type())?)
            })
            .collect()
    }

    /// Inserts one full record, all table columns in declaration order.
    ///
    /// # Errors
    ///
    /// [`EngineError::Conflict`] on a uniqueness violation;
    /// [`EngineError::RecordShape`] when the value count is wrong.
    pub fn insert_record(&self, insert: &Insert<'_>, record: &[SqlValue]) -> Result<(), EngineError> {
        let params = Self::bind_record(insert.table(), record)?;
        self.conn
            .execute(&insert.sql_from_record(), params_from_iter(params))?;
        Ok(())
    }

    /// Inserts one partial row; omitted columns take their defaults.
    ///
    /// # Errors
    ///
    /// [`EngineError::Conflict`] on a uniqueness violation.
    pub fn insert_row(&self, insert: &Insert<'_>, row: &Row) -> Result<(), EngineError> {
        let sql = insert.sql_from_row(row)?;
        let params = Self::bind_row(insert.table(), row)?;
        self.conn.execute(&sql, params_from_iter(params))?;
        Ok(())
    }

    /// Bulk-inserts records, skipping conflicting ones.
    ///
    /// Returns the number of records actually inserted. Uniqueness
    /// conflicts are isolated per record so one duplicate does not abort
    /// the batch; any other error does.
    ///
    /// # Errors
    ///
    /// Any non-conflict failure.
    #[instrument(skip_all, fields(table = %insert.table().name()))]
    pub fn insert_many_records(
        &self,
        insert: &Insert<'_>,
        records: &[Vec<SqlValue>],
    ) -> Result<usize, EngineError> {
        let mut inserted = 0;
        for record in records {
            match self.insert_record(insert, record) {
                Ok(()) => inserted += 1,
                Err(err) if err.is_conflict() => {
                    debug!(error = %err, "skipping conflicting record");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(inserted)
    }

    /// Bulk-inserts rows, skipping conflicting ones.
    ///
    /// # Errors
    ///
    /// Any non-conflict failure.
    #[instrument(skip_all, fields(table = %insert.table().name()))]
    pub fn insert_many_rows(
        &self,
        insert: &Insert<'_>,
        rows: &[Row],
    ) -> Result<usize, EngineError> {
        let mut inserted = 0;
        for row in rows {
            match self.insert_row(insert, row) {
                Ok(()) => inserted += 1,
                Err(err) if err.is_conflict() => {
                    debug!(error = %err, "skipping conflicting row");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(inserted)
    }

    /// Runs a SELECT and decodes each result column through the
    /// statement's shadow projection types.
    ///
    /// # Errors
    ///
    /// Statement rendering, execution or decode failures.
    pub fn select(&self, select: &Select) -> Result<Vec<Vec<SqlValue>>, EngineError> {
        let sql = select.sql()?;
        let shadow = select.shadow();
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(shadow.len());
            for (i, (_, data_type)) in shadow.iter().enumerate() {
                record.push(read_value(row.get_ref(i)?, *data_type)?);
            }
            out.push(record);
        }
        Ok(out)
    }

    /// Like [`SqliteEngine::select`], wrapping each record in a [`Row`]
    /// keyed by the shadow projection names.
    ///
    /// # Errors
    ///
    /// Statement rendering, execution or decode failures.
    pub fn select_rows(&self, select: &Select) -> Result<Vec<Row>, EngineError> {
        let names: Vec<String> = select
            .shadow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        self.select(select)?
            .into_iter()
            .map(|record| Ok(Row::new(names.clone(), record)?))
            .collect()
    }

    /// Number of rows in a table.
    ///
    /// # Errors
    ///
    /// Any engine-reported failure.
    pub fn count(&self, table: &Table) -> Result<i64, EngineError> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }

    /// Executes an UPDATE, returning the affected row count.
    ///
    /// # Errors
    ///
    /// [`EngineError::Conflict`] when the update violates a uniqueness
    /// constraint; any other engine failure.
    pub fn update(&self, update: &Update<'_>) -> Result<usize, EngineError> {
        Ok(self.conn.execute(&update.sql()?, [])?)
    }

    /// Executes a DELETE, returning the affected row count.
    ///
    /// # Errors
    ///
    /// Any engine-reported failure.
    pub fn delete(&self, delete: &Delete<'_>) -> Result<usize, EngineError> {
        Ok(self.conn.execute(&delete.sql(), [])?)
    }

    fn recover_conflict(
        &self,
        table: &Table,
        present: &[(String, SqlValue)],
    ) -> Result<(), EngineError> {
        let mut assignments = 0;
        let mut update = table.update();
        let mut criteria = Vec::new();
        for (name, value) in present {
            let column = table.column(name)?;
            if column.is_primary_key() {
                criteria.push(column.eq(value.clone()).map_err(EngineError::Encode)?);
            } else {
                update = update.set(name, value.clone())?;
                assignments += 1;
            }
        }
        // A record carrying only its primary key has nothing to update.
        if assignments == 0 {
            return Ok(());
        }
        // A second conflict here propagates; recovery is attempted once.
        self.update(&update.where_(&criteria)?)?;
        Ok(())
    }

    /// Insert-or-update over full records.
    ///
    /// Each record is inserted; on a uniqueness conflict the existing row
    /// is located by primary-key equality and only the non-key columns
    /// are updated. Columns absent from the record keep their stored
    /// values, which is what distinguishes this from the engine's native
    /// REPLACE.
    ///
    /// # Errors
    ///
    /// Non-conflict failures, and a conflict raised by the recovery
    /// update itself.
    #[instrument(skip_all, fields(table = %insert.table().name()))]
    pub fn insdate_many_records(
        &self,
        insert: &Insert<'_>,
        records: &[Vec<SqlValue>],
    ) -> Result<(), EngineError> {
        let table = insert.table();
        for record in records {
            match self.insert_record(insert, record) {
                Ok(()) => {}
                Err(err) if err.is_conflict() => {
                    let present: Vec<(String, SqlValue)> = table
                        .columns()
                        .map(|c| String::from(c.name()))
                        .zip(record.iter().cloned())
                        .collect();
                    self.recover_conflict(table, &present)?;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Insert-or-update over partial rows. See
    /// [`SqliteEngine::insdate_many_records`].
    ///
    /// # Errors
    ///
    /// Non-conflict failures, and a conflict raised by the recovery
    /// update itself.
    #[instrument(skip_all, fields(table = %insert.table().name()))]
    pub fn insdate_many_rows(
        &self,
        insert: &Insert<'_>,
        rows: &[Row],
    ) -> Result<(), EngineError> {
        for row in rows {
            match self.insert_row(insert, row) {
                Ok(()) => {}
                Err(err) if err.is_conflict() => {
                    self.recover_conflict(insert.table(), &row.to_pairs())?;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Drops a table and removes it from the registry.
    ///
    /// Two-phase: the registry entry is removed only after the engine
    /// confirmed the DROP, so the registry never claims a table that
    /// still exists.
    ///
    /// # Errors
    ///
    /// The table being unknown to the registry, or the DROP failing. On
    /// failure the registry is left unchanged.
    pub fn drop_table(&self, metadata: &mut MetaData, name: &str) -> Result<(), EngineError> {
        let sql = metadata.table(name)?.drop_table_sql();
        self.execute(&sql)?;
        metadata.remove_table(name)?;
        Ok(())
    }

    /// Drops an index and removes it from the registry. Two-phase, like
    /// [`SqliteEngine::drop_table`].
    ///
    /// # Errors
    ///
    /// The index being unknown to the registry, or the DROP failing.
    pub fn drop_index(&self, metadata: &mut MetaData, name: &str) -> Result<(), EngineError> {
        let sql = metadata.index(name)?.drop_index_sql();
        self.execute(&sql)?;
        metadata.remove_index(name)?;
        Ok(())
    }

    /// Creates every registered table and index.
    ///
    /// Per-item failures are logged and tolerated, so re-running over a
    /// partially created schema finishes the rest of the batch.
    #[instrument(skip_all)]
    pub fn create_all(&self, metadata: &MetaData) {
        for table in metadata.tables() {
            if let Err(err) = self.execute(&table.create_table_sql()) {
                warn!(table = table.name(), error = %err, "create table failed");
            }
        }
        for index in metadata.indexes() {
            if let Err(err) = self.execute(&index.create_index_sql()) {
                warn!(index = index.name(), error = %err, "create index failed");
            }
        }
    }

    /// Drops every registered index and table.
    ///
    /// Per-item failures are logged and tolerated; each successful drop
    /// removes its registry entry, failed ones stay registered.
    #[instrument(skip_all)]
    pub fn drop_all(&self, metadata: &mut MetaData) {
        let index_names: Vec<String> = metadata.index_names().iter().map(|s| String::from(*s)).collect();
        for name in index_names {
            if let Err(err) = self.drop_index(metadata, &name) {
                warn!(index = %name, error = %err, "drop index failed");
            }
        }
        let table_names: Vec<String> = metadata.table_names().iter().map(|s| String::from(*s)).collect();
        for name in table_names {
            if let Err(err) = self.drop_table(metadata, &name) {
                warn!(table = %name, error = %err, "drop table failed");
            }
        }
    }

    /// Table names from the live catalog.
    ///
    /// # Errors
    ///
    /// Any engine-reported failure.
    pub fn table_names(&self) -> Result<Vec<String>, EngineError> {
        self.catalog_names("table")
    }

    /// Index names from the live catalog.
    ///
    /// # Errors
    ///
    /// Any engine-reported failure.
    pub fn index_names(&self) -> Result<Vec<String>, EngineError> {
        self.catalog_names("index")
    }

    fn catalog_names(&self, kind: &str) -> Result<Vec<String>, EngineError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = ?1 AND name NOT LIKE 'sqlite_%'")?;
        let names = stmt
            .query_map([kind], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
