#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::Comma;

mod ident;
use ident::{Ident, Qualified};

// Statement serializers
mod create_table;
mod delete;
mod insert;
mod select;

use nestload_core::schema::{
    db::{Schema, Table},
    row::JoinNames,
};

/// Serializes statements over the benchmark schema to SQL strings.
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Schema against which statements are serialized
    schema: &'a Schema,
}

struct Formatter<'a> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,
}

impl<'a> Serializer<'a> {
    pub fn sqlite(schema: &'a Schema) -> Serializer<'a> {
        Serializer { schema }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    fn serialize(&self, stmt: impl ToSql) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
        };

        stmt.to_sql(&mut fmt);
        ret
    }

    /// `CREATE TABLE IF NOT EXISTS` for `table`, with its key and foreign
    /// keys.
    pub fn create_table(&self, table: &Table) -> String {
        self.serialize(create_table::CreateTable(table))
    }

    /// `INSERT` of one row into `table`, with one positional parameter per
    /// insertable column.
    pub fn insert(&self, table: &Table) -> String {
        self.serialize(insert::Insert(table))
    }

    /// Deletes every row of `table`.
    pub fn delete_all(&self, table: &Table) -> String {
        self.serialize(delete::DeleteAll(table))
    }

    /// Selects every column of `table`, ordered by primary key.
    pub fn select_table(&self, table: &Table) -> String {
        self.serialize(select::SelectTable(table))
    }

    /// The eager `blogs ⟕ posts ⟕ comments` join, aliasing each level's
    /// columns with `names`.
    pub fn eager_join(&self, names: &JoinNames<'_>) -> String {
        self.serialize(select::EagerJoin(names))
    }
}
