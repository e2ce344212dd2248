use super::{load_lookup, Strategy};
use crate::{
    engine::{assemble, materialize_level},
    DatasetParams,
};

use nestload_core::{
    async_trait,
    schema::{
        db::Table,
        row::{BlogLevel, CommentLevel, Level, LevelColumns, LevelNames, PostLevel},
    },
    stmt::Rows,
    Connection, Graph, Result, Schema,
};
use nestload_sql::Serializer;

/// Loads each level with its own select and links children to parents
/// through their stored parent key.
#[derive(Debug, Clone, Copy)]
pub struct SplitQuery;

#[async_trait]
impl Strategy for SplitQuery {
    fn name(&self) -> &'static str {
        "split_query"
    }

    async fn load(
        &self,
        conn: &mut dyn Connection,
        schema: &Schema,
        params: &DatasetParams,
    ) -> Result<Graph> {
        let lookup = load_lookup(conn, schema).await?;
        let serializer = Serializer::sqlite(schema);

        let blog_rows = conn.query(&serializer.select_table(schema.blogs())).await?;
        let post_rows = conn.query(&serializer.select_table(schema.posts())).await?;
        let comment_rows = conn.query(&serializer.select_table(schema.comments())).await?;

        tracing::debug!(
            blogs = blog_rows.len(),
            posts = post_rows.len(),
            comments = comment_rows.len(),
            expected_comments = params.expected_stats().comments,
            "fetched level rows"
        );

        let blogs = materialize_level(
            &BlogLevel::new(columns(schema.blogs(), &blog_rows)?),
            &blog_rows,
            &lookup,
        )?;

        let mut posts = materialize_level(
            &PostLevel::new(columns(schema.posts(), &post_rows)?),
            &post_rows,
            &lookup,
        )?;
        posts.adopt(&blogs, PostLevel::NAME)?;

        let mut comments = materialize_level(
            &CommentLevel::new(columns(schema.comments(), &comment_rows)?),
            &comment_rows,
            &lookup,
        )?;
        comments.adopt(&posts, CommentLevel::NAME)?;

        assemble(blogs, posts, comments)
    }
}

/// Binds a plain select of `table` to its level.
fn columns(table: &Table, rows: &Rows) -> Result<LevelColumns> {
    LevelColumns::resolve(rows.columns(), &LevelNames::for_table(table)?)
}
