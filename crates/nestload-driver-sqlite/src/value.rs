use nestload_core::{stmt::Value as CoreValue, Error, Result};
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

/// Bridges core values and SQLite values.
#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Reads the cell at `index` of a SQLite row.
    ///
    /// Only integers, text and null occur in the benchmark schema; any other
    /// storage class means the statement did not select what the caller
    /// expected.
    pub fn from_sql(row: &Row<'_>, index: usize) -> Result<Self> {
        let value = row
            .get_ref(index)
            .map_err(Error::driver_operation_failed)?;

        let core_value = match value {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(value) => CoreValue::I64(value),
            ValueRef::Text(value) => {
                let value = std::str::from_utf8(value).map_err(Error::driver_operation_failed)?;
                CoreValue::String(value.to_owned())
            }
            ValueRef::Real(_) | ValueRef::Blob(_) => {
                return Err(Error::invalid_result(format!(
                    "column {index} has unsupported storage class {}",
                    value.data_type()
                )))
            }
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match &self.0 {
            CoreValue::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            CoreValue::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            CoreValue::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
        }
    }
}
