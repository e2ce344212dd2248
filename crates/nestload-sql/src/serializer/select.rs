use super::{Comma, Formatter, Ident, Qualified, ToSql};

use nestload_core::schema::{
    db::{Column, Table},
    row::{JoinNames, LevelNames},
};

pub(super) struct SelectTable<'a>(pub(super) &'a Table);

pub(super) struct EagerJoin<'a, 'n>(pub(super) &'a JoinNames<'n>);

/// `alias."column" AS "name"`
struct Aliased<'a> {
    table: &'a str,
    column: &'a Column,
    name: &'a str,
}

const TABLE_ALIASES: [&str; 3] = ["t0", "t1", "t2"];

impl ToSql for SelectTable<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = self.0;
        let columns = Comma(table.columns.iter().map(|column| Ident(&column.name)));
        let key = Ident(&table.primary_key_column().name);

        fmt!(f, "SELECT ", columns, " FROM ", Ident(&table.name), " ORDER BY ", key);
    }
}

impl ToSql for EagerJoin<'_, '_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let names = self.0;
        let schema = f.serializer.schema;
        let levels = schema.levels();
        let level_names = [&names.blog, &names.post, &names.comment];

        let mut projection = vec![];
        for ((table, names), alias) in levels.iter().zip(level_names).zip(TABLE_ALIASES) {
            projection.extend(level_projection(table, names, alias));
        }

        fmt!(f, "SELECT ", Comma(projection), " FROM ");

        let [root, ..] = levels;
        fmt!(f, Ident(&root.name), " AS ", TABLE_ALIASES[0]);

        // Every level below the root hangs off its parent with a LEFT JOIN
        // so that childless parents still produce a row.
        for (depth, pair) in levels.windows(2).enumerate() {
            let [parent, child] = pair else {
                continue;
            };
            let (parent_alias, child_alias) = (TABLE_ALIASES[depth], TABLE_ALIASES[depth + 1]);

            fmt!(f, " LEFT JOIN ", Ident(&child.name), " AS ", child_alias);

            if let Some(fk) = child.parent_column() {
                let pk = &parent.primary_key_column().name;
                fmt!(
                    f,
                    " ON ",
                    Qualified(child_alias, &fk.name),
                    " = ",
                    Qualified(parent_alias, pk),
                );
            }
        }

        let order_by = Comma(
            levels
                .iter()
                .zip(TABLE_ALIASES)
                .map(|(table, alias)| Qualified(alias, &table.primary_key_column().name)),
        );
        fmt!(f, " ORDER BY ", order_by);
    }
}

fn level_projection<'a>(
    table: &'a Table,
    names: &'a LevelNames<'_>,
    alias: &'a str,
) -> Vec<Aliased<'a>> {
    let mut columns = vec![Aliased {
        table: alias,
        column: table.primary_key_column(),
        name: names.key,
    }];

    if let Some(column) = table.attribute_column() {
        columns.push(Aliased {
            table: alias,
            column,
            name: names.attr,
        });
    }

    if let (Some(column), Some(name)) = (table.parent_column(), names.parent) {
        columns.push(Aliased {
            table: alias,
            column,
            name,
        });
    }

    if let Some(column) = table.owner_column() {
        columns.push(Aliased {
            table: alias,
            column,
            name: names.owner,
        });
    }

    columns
}

impl ToSql for Aliased<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Qualified(self.table, &self.column.name), " AS ", Ident(self.name));
    }
}
