//! SELECT statement builder.

use crate::builder::where_clause;
use crate::dtype::DataType;
use crate::error::StatementError;
use crate::expr::Expr;

#[derive(Debug, Clone)]
enum Source {
    Table(String),
    /// Pre-rendered inner SELECT, already re-indented.
    Nested(String),
}

/// Builds SELECT statements.
///
/// Projections are column references or typed function expressions from
/// [`func`](crate::func). Alongside the SQL text the builder keeps a
/// shadow projection table, the name and [`DataType`] of every projected
/// item, so callers executing the statement know how to decode each
/// result column even when the projection is a function call.
#[derive(Debug, Clone)]
pub struct Select {
    items: Vec<String>,
    shadow: Vec<(String, DataType)>,
    source: Option<Source>,
    distinct: bool,
    where_: Option<String>,
    order_by: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Select {
    /// Builds a SELECT over the given projections.
    ///
    /// The FROM table is resolved from the projections' origin tables.
    ///
    /// # Errors
    ///
    /// [`StatementError::EmptyProjection`] for an empty projection list,
    /// [`StatementError::UntypedProjection`] for a projection without a
    /// result type and [`StatementError::MixedTables`] when projections
    /// come from two tables.
    pub fn new(projections: Vec<Expr>) -> Result<Self, StatementError> {
        if projections.is_empty() {
            return Err(StatementError::EmptyProjection);
        }

        let mut items = Vec::with_capacity(projections.len());
        let mut shadow = Vec::with_capacity(projections.len());
        let mut source: Option<String> = None;
        for projection in &projections {
            let result_type = projection
                .result_type()
                .ok_or_else(|| StatementError::UntypedProjection(String::from(projection.sql())))?;
            let shadow_name = if projection.function().is_some() {
                projection.sql().to_ascii_lowercase()
            } else {
                projection
                    .column()
                    .map_or_else(|| String::from(projection.sql()), String::from)
            };
            items.push(String::from(projection.sql()));
            shadow.push((shadow_name, result_type));

            if let Some(table) = projection.table() {
                match &source {
                    Some(first) if first != table => {
                        return Err(StatementError::MixedTables {
                            first: first.clone(),
                            second: String::from(table),
                        });
                    }
                    Some(_) => {}
                    None => source = Some(String::from(table)),
                }
            }
        }

        Ok(Self {
            items,
            shadow,
            source: source.map(Source::Table),
            distinct: false,
            where_: None,
            order_by: None,
            limit: None,
            offset: None,
        })
    }

    /// AND-joins filter criteria into the WHERE clause.
    ///
    /// # Errors
    ///
    /// [`StatementError::EmptyCriteria`] when `criteria` is empty.
    pub fn where_(mut self, criteria: &[Expr]) -> Result<Self, StatementError> {
        self.where_ = Some(where_clause(criteria)?);
        Ok(self)
    }

    /// Sets the sort keys. A bare column reference or raw name sorts
    /// ascending; wrap with [`desc`](crate::expr::desc) to flip.
    #[must_use]
    pub fn order_by(mut self, keys: &[Expr]) -> Self {
        let rendered: Vec<String> = keys
            .iter()
            .map(|key| {
                if key.sort().is_some() {
                    String::from(key.sql())
                } else {
                    format!("{} ASC", key.sql())
                }
            })
            .collect();
        self.order_by = Some(format!("ORDER BY {}", rendered.join(", ")));
        self
    }

    /// Caps the number of returned rows.
    #[must_use]
    pub const fn limit(mut self, howmany: u64) -> Self {
        self.limit = Some(howmany);
        self
    }

    /// Skips the first `howmany` rows.
    #[must_use]
    pub const fn offset(mut self, howmany: u64) -> Self {
        self.offset = Some(howmany);
        self
    }

    /// Deduplicates the result set.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Uses another SELECT as the FROM source. The inner statement is
    /// wrapped in parentheses and re-indented one level.
    ///
    /// # Errors
    ///
    /// Any error rendering the inner statement.
    pub fn select_from(mut self, inner: &Self) -> Result<Self, StatementError> {
        let inner_sql = inner.sql()?.replace('\n', "\n\t");
        self.source = Some(Source::Nested(inner_sql));
        Ok(self)
    }

    /// The projection shape: name and type of each projected item, used
    /// to decode result rows.
    #[must_use]
    pub fn shadow(&self) -> &[(String, DataType)] {
        &self.shadow
    }

    /// Renders the statement. Clause order is fixed: SELECT, FROM,
    /// WHERE, ORDER BY, LIMIT, OFFSET.
    ///
    /// # Errors
    ///
    /// [`StatementError::MissingFrom`] when no projection named a table
    /// and no nested source was set.
    pub fn sql(&self) -> Result<String, StatementError> {
        let what = if self.distinct {
            format!("SELECT DISTINCT\t{}", self.items.join(",\n\t\t"))
        } else {
            format!("SELECT\t{}", self.items.join(",\n\t"))
        };
        let from = match &self.source {
            Some(Source::Table(name)) => format!("FROM\t{name}"),
            Some(Source::Nested(inner)) => format!("FROM\t({inner})"),
            None => return Err(StatementError::MissingFrom),
        };

        let mut clauses = vec![what, from];
        if let Some(where_) = &self.where_ {
            clauses.push(where_.clone());
        }
        if let Some(order_by) = &self.order_by {
            clauses.push(order_by.clone());
        }
        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            clauses.push(format!("OFFSET {offset}"));
        }
        Ok(clauses.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DataType;
    use crate::expr::desc;
    use crate::func;
    use crate::schema::{Column, Table};

    fn table() -> Table {
        Table::new(
            "t",
            vec![
                Column::new("a", DataType::Integer).unwrap().primary_key(),
                Column::new("b", DataType::Text).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_select_all_columns() {
        let t = table();
        let sql = Select::new(t.all()).unwrap().sql().unwrap();
        assert_eq!(sql, "SELECT\tt.a,\n\tt.b\nFROM\tt");
    }

    #[test]
    fn test_where_and_joined() {
        let t = table();
        let sql = Select::new(t.all())
            .unwrap()
            .where_(&[
                t.column("a").unwrap().eq(1).unwrap(),
                t.column("b").unwrap().like("%x%"),
            ])
            .unwrap()
            .sql()
            .unwrap();
        assert!(sql.contains("WHERE\tt.a = 1\n\tAND t.b LIKE '%x%'"));
    }

    #[test]
    fn test_clause_order_and_omission() {
        let t = table();
        let sql = Select::new(t.all())
            .unwrap()
            .order_by(&[desc(t.column("a").unwrap())])
            .limit(10)
            .offset(20)
            .sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT\tt.a,\n\tt.b\nFROM\tt\nORDER BY t.a DESC\nLIMIT 10\nOFFSET 20"
        );
        let plain = Select::new(t.all()).unwrap().sql().unwrap();
        assert!(!plain.contains("WHERE"));
        assert!(!plain.contains("ORDER BY"));
    }

    #[test]
    fn test_order_by_defaults_ascending() {
        let t = table();
        let sql = Select::new(t.all())
            .unwrap()
            .order_by(&[t.column("b").unwrap().into()])
            .sql()
            .unwrap();
        assert!(sql.ends_with("ORDER BY t.b ASC"));
    }

    #[test]
    fn test_distinct_reindents_items() {
        let t = table();
        let sql = Select::new(t.all()).unwrap().distinct().sql().unwrap();
        assert!(sql.starts_with("SELECT DISTINCT\tt.a,\n\t\tt.b"));
    }

    #[test]
    fn test_function_projection_shadow() {
        let t = table();
        let select = Select::new(vec![func::count(t.column("a").unwrap())]).unwrap();
        assert_eq!(select.shadow(), [(String::from("count(a)"), DataType::Integer)]);
        assert_eq!(select.sql().unwrap(), "SELECT\tCOUNT(a)\nFROM\tt");
    }

    #[test]
    fn test_nested_select() {
        let t = table();
        let inner = Select::new(t.all()).unwrap().limit(5);
        let sql = Select::new(t.all())
            .unwrap()
            .select_from(&inner)
            .unwrap()
            .sql()
            .unwrap();
        assert!(sql.contains("FROM\t(SELECT\t"));
        assert!(sql.contains("\n\tLIMIT 5)"));
    }

    #[test]
    fn test_empty_projection_rejected() {
        assert!(matches!(
            Select::new(vec![]),
            Err(StatementError::EmptyProjection)
        ));
    }

    #[test]
    fn test_mixed_tables_rejected() {
        let t = table();
        let other = Table::new("s", vec![Column::new("x", DataType::Integer).unwrap()]).unwrap();
        let mut projections = t.all();
        projections.push(other.column("x").unwrap().into());
        assert!(matches!(
            Select::new(projections),
            Err(StatementError::MixedTables { .. })
        ));
    }

    #[test]
    fn test_untyped_projection_rejected() {
        assert!(matches!(
            Select::new(vec![Expr::from("raw_name")]),
            Err(StatementError::UntypedProjection(_))
        ));
    }
}
