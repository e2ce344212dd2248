use super::{Comma, Formatter, Ident, ToSql};

use nestload_core::schema::db::{Column, Table};

pub(super) struct CreateTable<'a>(pub(super) &'a Table);

struct ColumnDef<'a>(&'a Column);

impl ToSql for CreateTable<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let columns = Comma(self.0.columns.iter().map(ColumnDef));

        fmt!(f, "CREATE TABLE IF NOT EXISTS ", Ident(&self.0.name), " (", columns, ")");
    }
}

impl ToSql for ColumnDef<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let column = self.0;

        fmt!(f, Ident(&column.name), " ", column.ty.sql_name());

        if column.primary_key {
            // An INTEGER PRIMARY KEY aliases the rowid and is assigned on insert.
            fmt!(f, " PRIMARY KEY");
        } else if !column.nullable {
            fmt!(f, " NOT NULL");
        }

        if let Some(target) = column.references {
            let schema = f.serializer.schema;
            let target = schema.table(target);
            let key = &target.primary_key_column().name;

            fmt!(f, " REFERENCES ", Ident(&target.name), " (", Ident(key), ")");
        }
    }
}
