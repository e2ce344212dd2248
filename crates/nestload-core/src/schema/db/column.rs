use super::{TableId, Type};

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Uniquely identifies the column in the schema.
    pub id: ColumnId,

    /// The name of the column in the database.
    pub name: String,

    /// The database storage type of the column.
    pub ty: Type,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// True if the column is the table's primary key
    pub primary_key: bool,

    /// True if the database assigns the value on insert.
    pub auto_increment: bool,

    /// Table whose primary key this column references, if any.
    pub references: Option<TableId>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

impl Column {
    pub(super) fn new(id: ColumnId, name: &str, ty: Type) -> Self {
        Self {
            id,
            name: name.to_string(),
            ty,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            references: None,
        }
    }

    /// Returns `true` if inserts must supply a value for this column.
    pub fn is_insertable(&self) -> bool {
        !self.auto_increment
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}
