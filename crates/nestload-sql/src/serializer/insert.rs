use super::{Comma, Formatter, Ident, ToSql};

use nestload_core::schema::db::Table;

pub(super) struct Insert<'a>(pub(super) &'a Table);

/// Positional parameter, `?1`-based.
struct Placeholder(usize);

impl ToSql for Insert<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = self.0;
        let columns = Comma(table.insertable_columns().map(|column| Ident(&column.name)));
        let params = Comma((1..=table.insertable_columns().count()).map(Placeholder));

        fmt!(f, "INSERT INTO ", Ident(&table.name), " (", columns, ") VALUES (", params, ")");
    }
}

impl ToSql for Placeholder {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "?", self.0);
    }
}
