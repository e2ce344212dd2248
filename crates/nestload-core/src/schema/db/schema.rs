use super::{Table, TableId, Type};

/// The relational schema of the benchmark dataset.
///
/// Tables are stored in dependency order: the owner lookup table first, then
/// each hierarchy level root first. Creating tables in this order and
/// deleting rows in the reverse order never violates a foreign key.
#[derive(Debug, Clone)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    pub const USERS: TableId = TableId(0);
    pub const BLOGS: TableId = TableId(1);
    pub const POSTS: TableId = TableId(2);
    pub const COMMENTS: TableId = TableId(3);

    /// `users` ← `blogs` ← `posts` ← `comments`, every level owned by a user.
    pub fn blog() -> Schema {
        let mut users = Table::new(Self::USERS, "users");
        users.push_column("email", Type::Text).primary_key = true;

        let mut blogs = Table::new(Self::BLOGS, "blogs");
        level_key(&mut blogs);
        blogs.push_column("url", Type::Text);
        blogs.owner = Some(reference(&mut blogs, "owner_id", Type::Text, Self::USERS));

        let mut posts = Table::new(Self::POSTS, "posts");
        level_key(&mut posts);
        posts.push_column("title", Type::Text);
        posts.parent = Some(reference(&mut posts, "blog_id", Type::Integer, Self::BLOGS));
        posts.owner = Some(reference(&mut posts, "owner_id", Type::Text, Self::USERS));

        let mut comments = Table::new(Self::COMMENTS, "comments");
        level_key(&mut comments);
        comments.push_column("text", Type::Text);
        comments.parent = Some(reference(&mut comments, "post_id", Type::Integer, Self::POSTS));
        comments.owner = Some(reference(&mut comments, "owner_id", Type::Text, Self::USERS));

        Schema {
            tables: vec![users, blogs, posts, comments],
        }
    }

    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    pub fn users(&self) -> &Table {
        self.table(Self::USERS)
    }

    pub fn blogs(&self) -> &Table {
        self.table(Self::BLOGS)
    }

    pub fn posts(&self) -> &Table {
        self.table(Self::POSTS)
    }

    pub fn comments(&self) -> &Table {
        self.table(Self::COMMENTS)
    }

    /// Hierarchy levels, root first.
    pub fn levels(&self) -> [&Table; 3] {
        [self.blogs(), self.posts(), self.comments()]
    }
}

fn level_key(table: &mut Table) {
    let column = table.push_column("id", Type::Integer);
    column.primary_key = true;
    column.auto_increment = true;
}

fn reference(
    table: &mut Table,
    name: &str,
    ty: Type,
    target: TableId,
) -> super::ColumnId {
    let column = table.push_column(name, ty);
    column.references = Some(target);
    column.id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_linked_root_first() {
        let schema = Schema::blog();
        let [blogs, posts, comments] = schema.levels();

        assert!(blogs.parent.is_none());
        assert_eq!(
            posts.parent_column().and_then(|c| c.references),
            Some(blogs.id)
        );
        assert_eq!(
            comments.parent_column().and_then(|c| c.references),
            Some(posts.id)
        );

        for table in schema.levels() {
            assert_eq!(table.primary_key_column().name, "id");
            assert!(table.primary_key_column().auto_increment);
            assert_eq!(
                table.owner_column().and_then(|c| c.references),
                Some(Schema::USERS)
            );
        }
    }

    #[test]
    fn attribute_columns() {
        let schema = Schema::blog();
        let names: Vec<_> = schema
            .levels()
            .iter()
            .map(|table| table.attribute_column().map(|c| c.name.as_str()))
            .collect();

        assert_eq!(names, [Some("url"), Some("title"), Some("text")]);
        assert_eq!(schema.users().insertable_columns().count(), 1);
        assert_eq!(schema.posts().insertable_columns().count(), 3);
    }
}
