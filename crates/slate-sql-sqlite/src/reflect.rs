//! Schema reflection: rebuilding table and index descriptors from the
//! live catalog.

use tracing::{debug, instrument};

use slate_sql_core::validate::exam_identifier;
use slate_sql_core::{Column, DataType, Expr, Index, MetaData, SchemaError, Table};

use crate::engine::SqliteEngine;
use crate::error::EngineError;

struct ColumnInfo {
    name: String,
    declared_type: String,
    not_null: bool,
    default_literal: Option<String>,
    primary_key: bool,
}

impl SqliteEngine {
    /// Reads the live catalog and registers a [`Table`] for every stored
    /// table and an [`Index`] for every named index.
    ///
    /// `serialized_columns` lists `table.column` names whose BLOB storage
    /// actually holds serialized objects; the catalog alone cannot tell
    /// the two apart. Default values are recovered by decoding the stored
    /// literal through the column's codec.
    ///
    /// # Errors
    ///
    /// Catalog queries failing, a stored name or default not surviving
    /// validation, or a registry collision with already-registered
    /// descriptors.
    #[instrument(skip_all)]
    pub fn reflect(
        &self,
        metadata: &mut MetaData,
        serialized_columns: &[&str],
    ) -> Result<(), EngineError> {
        for table_name in self.table_names()? {
            let table = self.reflect_table(&table_name, serialized_columns)?;
            debug!(table = %table_name, columns = table.len(), "reflected table");
            metadata.register_table(table)?;
        }

        let mut stmt = self.conn.prepare(
            "SELECT name, tbl_name, sql FROM sqlite_master \
             WHERE type = 'index' AND sql NOT NULL",
        )?;
        let stored: Vec<(String, String, String)> = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        for (index_name, table_name, sql) in stored {
            let index = index_from_sql(&index_name, &table_name, &sql)?;
            debug!(index = %index_name, table = %table_name, "reflected index");
            metadata.register_index(index)?;
        }
        Ok(())
    }

    fn reflect_table(
        &self,
        table_name: &str,
        serialized_columns: &[&str],
    ) -> Result<Table, EngineError> {
        // Catalog names are untrusted input; they are validated before
        // being spliced into the PRAGMA text.
        exam_identifier(table_name).map_err(|source| {
            EngineError::Schema(SchemaError::InvalidIdentifier {
                name: String::from(table_name),
                source,
            })
        })?;
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({table_name})"))?;
        let infos: Vec<ColumnInfo> = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    name: row.get(1)?,
                    declared_type: row.get(2)?,
                    not_null: row.get::<_, i64>(3)? != 0,
                    default_literal: row.get(4)?,
                    primary_key: row.get::<_, i64>(5)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut columns = Vec::with_capacity(infos.len());
        for info in infos {
            let mut data_type = DataType::from_declared_type(&info.declared_type)
                .ok_or_else(|| EngineError::UnknownDeclaredType(info.declared_type.clone()))?;
            let qualified = format!("{table_name}.{}", info.name);
            if data_type == DataType::Blob && serialized_columns.contains(&qualified.as_str()) {
                data_type = DataType::Serialized;
            }

            let mut column = Column::new(&info.name, data_type)?;
            if info.not_null {
                column = column.not_null();
            }
            if info.primary_key {
                column = column.primary_key();
            }
            // Defaults come back as literal text and go through the same
            // typed decode path as fetched values, never an evaluator.
            let default = data_type.decode(info.default_literal.as_deref())?;
            if !default.is_null() {
                column = column.with_default(default)?;
            }
            columns.push(column);
        }
        Ok(Table::new(table_name, columns)?)
    }
}

/// Rebuilds an index descriptor from its stored CREATE INDEX text. The
/// column specs between the parentheses are kept as raw strings.
fn index_from_sql(name: &str, table_name: &str, sql: &str) -> Result<Index, EngineError> {
    let specs: Vec<Expr> = match (sql.find('('), sql.rfind(')')) {
        (Some(open), Some(close)) if open < close => sql[open + 1..close]
            .split(',')
            .map(|spec| Expr::from(spec.trim()))
            .collect(),
        _ => Vec::new(),
    };
    let mut index = Index::on_table(name, table_name, &specs)?;
    if sql.contains("CREATE UNIQUE INDEX") {
        index = index.unique();
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_from_sql_parses_specs() {
        let sql = "CREATE INDEX t_index\nON t (\n\ta ASC,\n\tb DESC\n)";
        let index = index_from_sql("t_index", "t", sql).unwrap();
        assert_eq!(index.table_name(), "t");
        assert_eq!(index.column_specs(), ["a ASC", "b DESC"]);
        assert!(!index.is_unique());
    }

    #[test]
    fn test_index_from_sql_detects_unique() {
        let sql = "CREATE UNIQUE INDEX u_index ON t (a ASC)";
        let index = index_from_sql("u_index", "t", sql).unwrap();
        assert!(index.is_unique());
        assert_eq!(index.column_specs(), ["a ASC"]);
    }
}
