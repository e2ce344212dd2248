use super::{Column, ColumnId, Type};

use std::fmt;

/// A database table
#[derive(Debug, Clone)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Name of the table
    pub name: String,

    /// The table's columns
    pub columns: Vec<Column>,

    /// The single-column primary key
    pub primary_key: ColumnId,

    /// Column referencing the owning level of the hierarchy, if any.
    pub parent: Option<ColumnId>,

    /// Column referencing the owner lookup table, if any.
    pub owner: Option<ColumnId>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct TableId(pub usize);

impl Table {
    pub(super) fn new(id: TableId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            columns: vec![],
            primary_key: ColumnId { table: id, index: 0 },
            parent: None,
            owner: None,
        }
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        &self.columns[id.into().index]
    }

    pub fn primary_key_column(&self) -> &Column {
        self.column(self.primary_key)
    }

    pub fn parent_column(&self) -> Option<&Column> {
        self.parent.map(|id| self.column(id))
    }

    pub fn owner_column(&self) -> Option<&Column> {
        self.owner.map(|id| self.column(id))
    }

    /// Columns an insert must provide values for, in declaration order.
    pub fn insertable_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter().filter(|column| column.is_insertable())
    }

    /// The first non-key text column; the level's single attribute.
    pub fn attribute_column(&self) -> Option<&Column> {
        self.columns.iter().find(|column| {
            column.ty == Type::Text
                && !column.primary_key
                && column.references.is_none()
        })
    }

    pub(super) fn push_column(&mut self, name: &str, ty: Type) -> &mut Column {
        let index = self.columns.len();
        let id = ColumnId {
            table: self.id,
            index,
        };
        self.columns.push(Column::new(id, name, ty));
        &mut self.columns[index]
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> Self {
        value.id
    }
}
