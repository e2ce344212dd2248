use super::{Formatter, Ident, ToSql};

use nestload_core::schema::db::Table;

pub(super) struct DeleteAll<'a>(pub(super) &'a Table);

impl ToSql for DeleteAll<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "DELETE FROM ", Ident(&self.0.name));
    }
}
