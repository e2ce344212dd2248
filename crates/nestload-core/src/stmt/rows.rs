use super::Row;
use crate::{Error, Result};

/// A fully fetched result set: column names plus rows in arrival order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Rows {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Rows {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the position of `name` in the column list.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        column_index(&self.columns, name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Keeps only the first `len` rows, as a producer cut off mid-stream would.
    pub fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }
}

/// Returns the position of `name` in `columns`. Column names compare ASCII
/// case-insensitively, as SQL identifiers do.
pub(crate) fn column_index(columns: &[String], name: &str) -> Result<usize> {
    columns
        .iter()
        .position(|column| column.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            Error::invalid_result(format!(
                "missing column `{name}`; columns={}",
                columns.join(",")
            ))
        })
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
