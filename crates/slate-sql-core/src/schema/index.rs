//! Index descriptors and CREATE/DROP INDEX rendering.

use crate::error::SchemaError;
use crate::expr::Expr;
use crate::validate::exam_identifier;

/// An index over one or more ordered column references of a single table.
///
/// Column specs come in three forms, all normalized at construction:
/// bound [`Column`](crate::schema::Column) references (default ASC),
/// [`asc`](crate::expr::asc)/[`desc`](crate::expr::desc)-wrapped
/// expressions, and raw strings for reflection-derived indexes where no
/// live column object exists. Index column lists always use unqualified
/// names; the owning table is named in the ON clause instead.
#[derive(Debug, Clone)]
pub struct Index {
    name: String,
    table_name: String,
    unique: bool,
    specs: Vec<String>,
}

impl Index {
    /// Builds an index, resolving the owning table from the column specs.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidIdentifier`] for a bad index name,
    /// [`SchemaError::MixedTableIndex`] when specs come from two tables
    /// and [`SchemaError::IndexWithoutTable`] when no spec names a table.
    pub fn new(name: &str, specs: &[Expr]) -> Result<Self, SchemaError> {
        Self::build(name, None, specs)
    }

    /// Builds an index with an explicit table name, for raw-string specs.
    ///
    /// # Errors
    ///
    /// Same as [`Index::new`]; a spec naming a different table than
    /// `table_name` is a [`SchemaError::MixedTableIndex`].
    pub fn on_table(name: &str, table_name: &str, specs: &[Expr]) -> Result<Self, SchemaError> {
        Self::build(name, Some(table_name), specs)
    }

    fn build(name: &str, table_name: Option<&str>, specs: &[Expr]) -> Result<Self, SchemaError> {
        exam_identifier(name).map_err(|source| SchemaError::InvalidIdentifier {
            name: String::from(name),
            source,
        })?;

        let mut resolved: Option<String> = table_name.map(String::from);
        let mut rendered = Vec::with_capacity(specs.len());
        for spec in specs {
            rendered.push(match (spec.column(), spec.sort()) {
                (Some(column), Some(order)) => format!("{column} {}", order.keyword()),
                (Some(column), None) => format!("{column} ASC"),
                // Raw string spec, used verbatim.
                (None, _) => String::from(spec.sql()),
            });
            if let Some(table) = spec.table() {
                match &resolved {
                    Some(first) if first != table => {
                        return Err(SchemaError::MixedTableIndex {
                            index: String::from(name),
                            first: first.clone(),
                            second: String::from(table),
                        });
                    }
                    Some(_) => {}
                    None => resolved = Some(String::from(table)),
                }
            }
        }

        let table_name = resolved.ok_or_else(|| SchemaError::IndexWithoutTable(String::from(name)))?;
        Ok(Self {
            name: String::from(name),
            table_name,
            unique: false,
            specs: rendered,
        })
    }

    /// Makes this a UNIQUE index.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// The index name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the indexed table.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Whether this is a UNIQUE index.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// The normalized `col ASC|DESC` column specs.
    #[must_use]
    pub fn column_specs(&self) -> &[String] {
        &self.specs
    }

    /// Renders the CREATE INDEX statement.
    #[must_use]
    pub fn create_index_sql(&self) -> String {
        let keyword = if self.unique {
            "CREATE UNIQUE INDEX"
        } else {
            "CREATE INDEX"
        };
        let columns: Vec<String> = self.specs.iter().map(|s| format!("\t{s}")).collect();
        format!(
            "{keyword} {}\nON {} (\n{}\n)",
            self.name,
            self.table_name,
            columns.join(",\n")
        )
    }

    /// Renders the DROP INDEX statement.
    #[must_use]
    pub fn drop_index_sql(&self) -> String {
        format!("DROP INDEX {}", self.name)
    }
}
