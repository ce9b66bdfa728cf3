//! An ordered name→value view over one query result.

use indexmap::IndexMap;

use crate::dtype::SqlValue;
use crate::error::RowError;

/// One result row: parallel column-name and value sequences plus a
/// name-keyed position map.
///
/// The position map is a pure function of the column list, rebuilt on
/// construction; mutation goes through [`Row::set`], which writes the
/// positional slot directly, so the map never goes stale.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<SqlValue>,
    positions: IndexMap<String, usize>,
}

impl Row {
    /// Builds a row from parallel column and value sequences.
    ///
    /// # Errors
    ///
    /// [`RowError::LengthMismatch`] when the sequences differ in length,
    /// [`RowError::DuplicateColumn`] when a name repeats.
    pub fn new(columns: Vec<String>, values: Vec<SqlValue>) -> Result<Self, RowError> {
        if columns.len() != values.len() {
            return Err(RowError::LengthMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }
        let mut positions = IndexMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if positions.insert(name.clone(), i).is_some() {
                return Err(RowError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            values,
            positions,
        })
    }

    /// Builds a row from name/value pairs, preserving pair order.
    ///
    /// # Errors
    ///
    /// [`RowError::DuplicateColumn`] when a name repeats.
    pub fn from_pairs(pairs: Vec<(String, SqlValue)>) -> Result<Self, RowError> {
        let (columns, values) = pairs.into_iter().unzip();
        Self::new(columns, values)
    }

    /// Column names in positional order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in positional order.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether the row has a column with this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Value by column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.positions.get(name).map(|&i| &self.values[i])
    }

    /// Value by position.
    #[must_use]
    pub fn get_at(&self, position: usize) -> Option<&SqlValue> {
        self.values.get(position)
    }

    /// Replaces the value of an existing column.
    ///
    /// The positional sequence is updated in place, so both access forms
    /// see the change.
    ///
    /// # Errors
    ///
    /// [`RowError::UnknownColumn`] when the row has no such column.
    pub fn set(&mut self, name: &str, value: impl Into<SqlValue>) -> Result<(), RowError> {
        let &position = self
            .positions
            .get(name)
            .ok_or_else(|| RowError::UnknownColumn(String::from(name)))?;
        self.values[position] = value.into();
        Ok(())
    }

    /// An independent copy of the row's content as name/value pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, SqlValue)> {
        self.columns
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }
}

impl PartialEq for Row {
    /// Rows compare by name→value content; positional order does not
    /// matter.
    fn eq(&self, other: &Self) -> bool {
        if self.columns.len() != other.columns.len() {
            return false;
        }
        self.columns
            .iter()
            .all(|name| self.get(name) == other.get(name) && other.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new(
            vec![String::from("c1"), String::from("c2")],
            vec![SqlValue::Integer(1), SqlValue::Integer(2)],
        )
        .unwrap()
    }

    #[test]
    fn test_both_access_forms() {
        let r = row();
        assert_eq!(r.get("c2"), Some(&SqlValue::Integer(2)));
        assert_eq!(r.get_at(0), Some(&SqlValue::Integer(1)));
        assert!(r.contains("c1"));
        assert!(!r.contains("c3"));
    }

    #[test]
    fn test_set_updates_both_views() {
        let mut r = row();
        r.set("c2", 20).unwrap();
        assert_eq!(r.get("c2"), Some(&SqlValue::Integer(20)));
        assert_eq!(r.get_at(1), Some(&SqlValue::Integer(20)));
        let pairs = r.to_pairs();
        assert_eq!(pairs[1], (String::from("c2"), SqlValue::Integer(20)));
    }

    #[test]
    fn test_set_unknown_column_fails() {
        let mut r = row();
        assert!(matches!(
            r.set("missing", 1),
            Err(RowError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Row::new(vec![String::from("a")], vec![]);
        assert!(matches!(err, Err(RowError::LengthMismatch { .. })));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Row::new(
            vec![String::from("a"), String::from("a")],
            vec![SqlValue::Null, SqlValue::Null],
        );
        assert!(matches!(err, Err(RowError::DuplicateColumn(_))));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = Row::from_pairs(vec![
            (String::from("c1"), SqlValue::Integer(1)),
            (String::from("c2"), SqlValue::Integer(2)),
        ])
        .unwrap();
        let b = Row::from_pairs(vec![
            (String::from("c2"), SqlValue::Integer(2)),
            (String::from("c1"), SqlValue::Integer(1)),
        ])
        .unwrap();
        assert_eq!(a, b);
        let c = Row::from_pairs(vec![(String::from("c1"), SqlValue::Integer(1))]).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_to_pairs_is_independent() {
        let mut r = row();
        let snapshot = r.to_pairs();
        r.set("c1", 99).unwrap();
        assert_eq!(snapshot[0].1, SqlValue::Integer(1));
    }
}
