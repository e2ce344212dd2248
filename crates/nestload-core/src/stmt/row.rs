use super::Value;
use crate::{Error, Result};

/// One flat row of a result set, positionally aligned with its
/// [`Rows::columns`](super::Rows::columns).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    fields: Vec<Value>,
}

impl Row {
    pub fn from_vec(fields: Vec<Value>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the value at `index`, failing if the row is too narrow.
    pub fn get(&self, index: usize) -> Result<&Value> {
        self.fields.get(index).ok_or_else(|| {
            Error::invalid_result(format!(
                "row has {} fields; expected a value at index {index}",
                self.fields.len()
            ))
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.fields.iter()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.fields
    }
}

impl From<Vec<Value>> for Row {
    fn from(fields: Vec<Value>) -> Self {
        Self::from_vec(fields)
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
