use crate::{
    schema::db::Table,
    stmt::{column_index, Row},
    Blog, Comment, Error, LookupTable, Post, Result, User,
};

use std::sync::Arc;

/// Column names for one hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelNames<'a> {
    /// Surrogate key column.
    pub key: &'a str,

    /// The level's single scalar attribute (url, title or text).
    pub attr: &'a str,

    /// Back-reference to the parent level's key. `None` for the root, or
    /// when the parent is known from the row's context.
    pub parent: Option<&'a str>,

    /// Owner key column.
    pub owner: &'a str,

    /// True when the level comes from a LEFT JOIN and may be null.
    pub optional: bool,
}

impl<'a> LevelNames<'a> {
    /// Names of `table`'s own columns, as returned by a plain select of the
    /// table. The level is required.
    pub fn for_table(table: &'a Table) -> Result<Self> {
        let missing = |what: &str| err!("table `{}` has no {what} column", table.name);

        Ok(Self {
            key: &table.primary_key_column().name,
            attr: &table
                .attribute_column()
                .ok_or_else(|| missing("attribute"))?
                .name,
            parent: table.parent_column().map(|column| column.name.as_str()),
            owner: &table.owner_column().ok_or_else(|| missing("owner"))?.name,
            optional: false,
        })
    }
}

/// Column positions for one hierarchy level, resolved against a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelColumns {
    pub key: usize,
    pub attr: usize,
    pub parent: Option<usize>,
    pub owner: usize,
    pub optional: bool,
}

impl LevelColumns {
    pub fn resolve(columns: &[String], names: &LevelNames<'_>) -> Result<Self> {
        Ok(Self {
            key: column_index(columns, names.key)?,
            attr: column_index(columns, names.attr)?,
            parent: names
                .parent
                .map(|name| column_index(columns, name))
                .transpose()?,
            owner: column_index(columns, names.owner)?,
            optional: names.optional,
        })
    }
}

/// One level of the hierarchy: how to read its key and build its record.
pub trait Level {
    /// The record this level materializes into.
    type Record;

    /// Level name used in error messages.
    const NAME: &'static str;

    fn columns(&self) -> &LevelColumns;

    /// Returns the level's key, or `None` when the level is absent from `row`.
    fn key(&self, row: &Row) -> Result<Option<i64>> {
        row.get(self.columns().key)?.to_opt_i64()
    }

    /// Returns the owner key of the record `key`.
    fn owner_key<'a>(&self, row: &'a Row, key: i64) -> Result<&'a str> {
        row.get(self.columns().owner)?
            .to_opt_str()?
            .ok_or_else(|| {
                Error::invalid_result(format!("{} {key} has a null owner key", Self::NAME))
            })
    }

    /// Resolves the owner of record `key` through `lookup`.
    fn owner<'t>(&self, row: &Row, key: i64, lookup: &'t LookupTable) -> Result<&'t Arc<User>> {
        lookup.resolve(Self::NAME, key, self.owner_key(row, key)?)
    }

    /// Builds the record `key` from `row`.
    ///
    /// `parent` is the key of the already-materialized parent, when the row
    /// was reached through one. A parent column, when bound, must agree with
    /// it.
    fn build(
        &self,
        key: i64,
        parent: Option<i64>,
        row: &Row,
        owner: Arc<User>,
    ) -> Result<Self::Record>;
}

/// A record that belongs to a parent record.
pub trait Child {
    fn parent_key(&self) -> i64;
}

/// A record that collects children of type `C`.
pub trait Attach<C> {
    fn attach(&mut self, child: C);
}

#[derive(Debug, Clone)]
pub struct BlogLevel {
    columns: LevelColumns,
}

#[derive(Debug, Clone)]
pub struct PostLevel {
    columns: LevelColumns,
}

#[derive(Debug, Clone)]
pub struct CommentLevel {
    columns: LevelColumns,
}

impl BlogLevel {
    pub fn new(columns: LevelColumns) -> Self {
        Self { columns }
    }
}

impl PostLevel {
    pub fn new(columns: LevelColumns) -> Self {
        Self { columns }
    }
}

impl CommentLevel {
    pub fn new(columns: LevelColumns) -> Self {
        Self { columns }
    }
}

impl Level for BlogLevel {
    type Record = Blog;

    const NAME: &'static str = "blog";

    fn columns(&self) -> &LevelColumns {
        &self.columns
    }

    fn build(&self, id: i64, _parent: Option<i64>, row: &Row, owner: Arc<User>) -> Result<Blog> {
        Ok(Blog {
            id,
            url: attribute(row, &self.columns)?,
            owner,
            posts: vec![],
        })
    }
}

impl Level for PostLevel {
    type Record = Post;

    const NAME: &'static str = "post";

    fn columns(&self) -> &LevelColumns {
        &self.columns
    }

    fn build(&self, id: i64, parent: Option<i64>, row: &Row, owner: Arc<User>) -> Result<Post> {
        Ok(Post {
            id,
            title: attribute(row, &self.columns)?,
            blog_id: parent_key::<Self>(row, &self.columns, id, parent)?,
            owner,
            comments: vec![],
        })
    }
}

impl Level for CommentLevel {
    type Record = Comment;

    const NAME: &'static str = "comment";

    fn columns(&self) -> &LevelColumns {
        &self.columns
    }

    fn build(&self, id: i64, parent: Option<i64>, row: &Row, owner: Arc<User>) -> Result<Comment> {
        Ok(Comment {
            id,
            text: attribute(row, &self.columns)?,
            post_id: parent_key::<Self>(row, &self.columns, id, parent)?,
            owner,
        })
    }
}

impl Child for Post {
    fn parent_key(&self) -> i64 {
        self.blog_id
    }
}

impl Child for Comment {
    fn parent_key(&self) -> i64 {
        self.post_id
    }
}

impl Attach<Post> for Blog {
    fn attach(&mut self, post: Post) {
        self.posts.push(post);
    }
}

impl Attach<Comment> for Post {
    fn attach(&mut self, comment: Comment) {
        self.comments.push(comment);
    }
}

fn attribute(row: &Row, columns: &LevelColumns) -> Result<String> {
    // A present level with a null attribute reads as empty text.
    Ok(row
        .get(columns.attr)?
        .to_opt_str()?
        .map(str::to_owned)
        .unwrap_or_default())
}

fn parent_key<L: Level>(
    row: &Row,
    columns: &LevelColumns,
    id: i64,
    context: Option<i64>,
) -> Result<i64> {
    let stored = match columns.parent {
        Some(index) => row.get(index)?.to_opt_i64()?,
        None => None,
    };

    match (stored, context) {
        (Some(stored), Some(context)) if stored != context => Err(Error::invalid_result(format!(
            "{} {id} references parent {stored} but was joined under parent {context}",
            L::NAME
        ))),
        (Some(key), _) | (None, Some(key)) => Ok(key),
        (None, None) => Err(Error::invalid_result(format!(
            "{} {id} has no parent key",
            L::NAME
        ))),
    }
}
