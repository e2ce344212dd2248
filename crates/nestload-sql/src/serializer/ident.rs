use super::{Formatter, ToSql};

/// A quoted SQL identifier.
pub(super) struct Ident<S>(pub(super) S);

/// An identifier qualified by a table alias, `alias."name"`.
pub(super) struct Qualified<'a, S>(pub(super) &'a str, pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push('"');
        for c in self.0.as_ref().chars() {
            if c == '"' {
                f.dst.push('"');
            }
            f.dst.push(c);
        }
        f.dst.push('"');
    }
}

impl<S: AsRef<str>> ToSql for Qualified<'_, S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, self.0, ".", Ident(self.1));
    }
}
