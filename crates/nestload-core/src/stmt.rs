//! Scalar values and flat rows as produced by a row source.

mod row;
pub use row::Row;

mod rows;
pub use rows::Rows;
pub(crate) use rows::column_index;

mod value;
pub use value::Value;
