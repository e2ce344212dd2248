use crate::{Error, Result};

/// A nullable scalar cell of a flat row.
///
/// Only the shapes the blog hierarchy needs are represented: surrogate keys
/// are integers, owner keys and attributes are strings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Signed 64-bit integer
    I64(i64),

    /// Null value
    #[default]
    Null,

    /// String value
    String(String),
}

impl Value {
    /// Name of the value's type, used in conversion errors.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::I64(_) => "I64",
            Self::Null => "Null",
            Self::String(_) => "String",
        }
    }

    /// Reads the value as a nullable integer key.
    pub fn to_opt_i64(&self) -> Result<Option<i64>> {
        match *self {
            Self::Null => Ok(None),
            Self::I64(v) => Ok(Some(v)),
            _ => Err(Error::type_conversion(self.clone(), "i64")),
        }
    }

    /// Reads the value as a nullable string.
    pub fn to_opt_str(&self) -> Result<Option<&str>> {
        match self {
            Self::Null => Ok(None),
            Self::String(v) => Ok(Some(v)),
            _ => Err(Error::type_conversion(self.clone(), "String")),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::I64(value as i64)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Self::I64(v) => write!(f, "{v}"),
            Self::Null => f.write_str("NULL"),
            Self::String(v) => write!(f, "{v:?}"),
        }
    }
}
