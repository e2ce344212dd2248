use super::{assemble, Arena};

use nestload_core::{
    graph::GraphStats,
    schema::row::{Level, RowKeys, RowSchema},
    stmt::{Row, Rows},
    Blog, Comment, Error, Graph, LookupTable, Post, Result,
};

/// Rebuilds the nested blog graph from the flat rows of an eager join.
///
/// Rows are consumed in a single pass. Each level keeps an insertion-ordered
/// arena keyed by the level's surrogate key, so a record mentioned by many
/// rows is built once, from the first row that mentions it. Later rows only
/// contribute records the arenas have not seen.
///
/// Any error discards everything built so far; the materializer then keeps
/// returning that error.
#[derive(Debug)]
pub struct Materializer<'a> {
    schema: &'a RowSchema,
    lookup: &'a LookupTable,
    blogs: Arena<Blog>,
    posts: Arena<Post>,
    comments: Arena<Comment>,

    /// Rows accepted so far.
    rows: usize,

    /// Set once a row has been rejected.
    failed: Option<Error>,
}

impl<'a> Materializer<'a> {
    pub fn new(schema: &'a RowSchema, lookup: &'a LookupTable) -> Self {
        Self::with_capacity(schema, lookup, GraphStats::default())
    }

    /// Pre-sizes each level's arena from the expected entity counts.
    pub fn with_capacity(
        schema: &'a RowSchema,
        lookup: &'a LookupTable,
        expected: GraphStats,
    ) -> Self {
        Self {
            schema,
            lookup,
            blogs: Arena::with_capacity(expected.blogs),
            posts: Arena::with_capacity(expected.posts),
            comments: Arena::with_capacity(expected.comments),
            rows: 0,
            failed: None,
        }
    }

    /// Number of rows accepted so far.
    pub fn rows_consumed(&self) -> usize {
        self.rows
    }

    /// Consumes one row.
    pub fn push(&mut self, row: &Row) -> Result<()> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }

        match self.push_row(row) {
            Ok(()) => {
                self.rows += 1;
                Ok(())
            }
            Err(err) => {
                self.blogs.clear();
                self.posts.clear();
                self.comments.clear();
                self.failed = Some(err.clone());
                Err(err)
            }
        }
    }

    fn push_row(&mut self, row: &Row) -> Result<()> {
        let (blog, post, comment) = match self.schema.keys(row, self.rows)? {
            RowKeys::Blog(blog) => (blog, None, None),
            RowKeys::Post(blog, post) => (blog, Some(post), None),
            RowKeys::Comment(blog, post, comment) => (blog, Some(post), Some(comment)),
        };

        let blog_index = visit(&self.schema.blog, &mut self.blogs, self.lookup, row, blog, None)?;

        let Some(post) = post else {
            return Ok(());
        };
        let post_index = visit(
            &self.schema.post,
            &mut self.posts,
            self.lookup,
            row,
            post,
            Some((blog, blog_index)),
        )?;

        if let Some(comment) = comment {
            visit(
                &self.schema.comment,
                &mut self.comments,
                self.lookup,
                row,
                comment,
                Some((post, post_index)),
            )?;
        }

        Ok(())
    }

    /// Folds the levels bottom-up and returns the blogs in first-seen order.
    pub fn finish(self) -> Result<Graph> {
        if let Some(err) = self.failed {
            return Err(err);
        }

        tracing::debug!(
            rows = self.rows,
            blogs = self.blogs.len(),
            posts = self.posts.len(),
            comments = self.comments.len(),
            "materialized graph"
        );

        assemble(self.blogs, self.posts, self.comments)
    }
}

/// Materializes a whole result set.
pub fn materialize<'r>(
    rows: impl IntoIterator<Item = &'r Row>,
    schema: &RowSchema,
    lookup: &LookupTable,
) -> Result<Graph> {
    let mut materializer = Materializer::new(schema, lookup);

    for row in rows {
        materializer.push(row)?;
    }

    materializer.finish()
}

/// Materializes the rows of a single level, keyed by the level's key, with
/// no parent context. Parents are resolved afterwards through
/// [`Arena::adopt`].
pub(crate) fn materialize_level<L: Level>(
    level: &L,
    rows: &Rows,
    lookup: &LookupTable,
) -> Result<Arena<L::Record>> {
    let mut arena = Arena::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let Some(key) = level.key(row)? else {
            return Err(Error::malformed_row(L::NAME, None, index));
        };

        visit(level, &mut arena, lookup, row, key, None)?;
    }

    Ok(arena)
}

/// Returns the arena index of record `key`, building and registering it when
/// this is its first occurrence. `parent` carries the parent's key and arena
/// index.
fn visit<L: Level>(
    level: &L,
    arena: &mut Arena<L::Record>,
    lookup: &LookupTable,
    row: &Row,
    key: i64,
    parent: Option<(i64, usize)>,
) -> Result<usize> {
    // Repeats are fan-out from deeper levels; the first occurrence wins.
    if let Some(index) = arena.index_of(key) {
        return Ok(index);
    }

    let owner = level.owner(row, key, lookup)?.clone();
    let record = level.build(key, parent.map(|(key, _)| key), row, owner)?;

    Ok(arena.insert(key, record, parent.map(|(_, index)| index)))
}
