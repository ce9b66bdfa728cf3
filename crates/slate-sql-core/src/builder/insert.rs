//! INSERT statement builder.

use crate::error::StatementError;
use crate::row::Row;
use crate::schema::Table;

/// Builds INSERT statements for one table.
///
/// The two render modes produce different SQL and are not interchangeable:
/// a full record binds every table column positionally, while a row names
/// only its present columns so the omitted ones take their engine-side
/// defaults instead of NULL.
#[derive(Debug)]
pub struct Insert<'a> {
    table: &'a Table,
}

impl<'a> Insert<'a> {
    pub(crate) fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// The target table.
    #[must_use]
    pub fn table(&self) -> &'a Table {
        self.table
    }

    fn placeholders(count: usize) -> String {
        vec!["?"; count].join(", ")
    }

    /// `INSERT INTO t VALUES (?, …)` over all table columns in
    /// declaration order.
    #[must_use]
    pub fn sql_from_record(&self) -> String {
        format!(
            "INSERT INTO\t{}\nVALUES\n\t({});",
            self.table.name(),
            Self::placeholders(self.table.len())
        )
    }

    /// `INSERT INTO t (cols…) VALUES (?, …)` restricted to the row's
    /// columns.
    ///
    /// # Errors
    ///
    /// [`StatementError::UnknownColumn`] when the row names a column the
    /// table does not have.
    pub fn sql_from_row(&self, row: &Row) -> Result<String, StatementError> {
        for name in row.columns() {
            if self.table.column(name).is_err() {
                return Err(StatementError::UnknownColumn {
                    table: String::from(self.table.name()),
                    column: name.clone(),
                });
            }
        }
        let columns: Vec<&str> = row.columns().iter().map(String::as_str).collect();
        Ok(format!(
            "INSERT INTO\t{}\n\t({})\nVALUES\n\t({});",
            self.table.name(),
            columns.join(", "),
            Self::placeholders(row.len())
        ))
    }
}
