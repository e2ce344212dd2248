use super::{load_lookup, Strategy};
use crate::{engine::Materializer, DatasetParams};

use nestload_core::{
    async_trait,
    schema::row::{JoinNames, LevelNames, RowSchema},
    Connection, Graph, Result, Schema,
};
use nestload_sql::Serializer;

use std::{borrow::Cow, fmt::Debug};

/// Where a flat strategy gets its join statement and how the statement names
/// its columns.
pub trait JoinSource: Debug + Send + Sync {
    const NAME: &'static str;

    /// Column names of the statement's result set.
    const COLUMNS: JoinNames<'static>;

    fn sql(&self, schema: &Schema) -> Cow<'static, str>;
}

/// Runs a [`JoinSource`]'s statement and streams the rows through the
/// [`Materializer`].
#[derive(Debug)]
pub struct FlatJoin<S> {
    source: S,
}

/// The eager join rendered from the schema description.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedJoin;

/// A literal join statement that also joins the owner table at every level.
#[derive(Debug, Clone, Copy)]
pub struct HandWrittenJoin;

impl<S: JoinSource> FlatJoin<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: JoinSource> Strategy for FlatJoin<S> {
    fn name(&self) -> &'static str {
        S::NAME
    }

    async fn load(
        &self,
        conn: &mut dyn Connection,
        schema: &Schema,
        params: &DatasetParams,
    ) -> Result<Graph> {
        let lookup = load_lookup(conn, schema).await?;
        let sql = self.source.sql(schema);

        let rows = conn.query(&sql).await?;
        tracing::debug!(
            strategy = S::NAME,
            rows = rows.len(),
            expected = params.expected_join_rows(),
            "fetched joined rows"
        );

        let row_schema = RowSchema::resolve(rows.columns(), &S::COLUMNS)?;
        let mut materializer =
            Materializer::with_capacity(&row_schema, &lookup, params.expected_stats());

        for row in &rows {
            materializer.push(row)?;
        }

        materializer.finish()
    }
}

impl JoinSource for GeneratedJoin {
    const NAME: &'static str = "single_query";

    const COLUMNS: JoinNames<'static> = JoinNames {
        blog: LevelNames {
            key: "blog_id",
            attr: "blog_url",
            parent: None,
            owner: "blog_owner_id",
            optional: false,
        },
        post: LevelNames {
            key: "post_id",
            attr: "post_title",
            parent: Some("post_blog_id"),
            owner: "post_owner_id",
            optional: true,
        },
        comment: LevelNames {
            key: "comment_id",
            attr: "comment_text",
            parent: Some("comment_post_id"),
            owner: "comment_owner_id",
            optional: true,
        },
    };

    fn sql(&self, schema: &Schema) -> Cow<'static, str> {
        Cow::Owned(Serializer::sqlite(schema).eager_join(&Self::COLUMNS))
    }
}

impl JoinSource for HandWrittenJoin {
    const NAME: &'static str = "raw_sql";

    // Owners are read from the joined `users` rows rather than the foreign
    // key columns.
    const COLUMNS: JoinNames<'static> = JoinNames {
        blog: LevelNames {
            key: "BlogId",
            attr: "Url",
            parent: None,
            owner: "BlogOwnerEmail",
            optional: false,
        },
        post: LevelNames {
            key: "PostId",
            attr: "Title",
            parent: Some("PostBlogId"),
            owner: "PostOwnerEmail",
            optional: true,
        },
        comment: LevelNames {
            key: "CommentId",
            attr: "Text",
            parent: Some("CommentPostId"),
            owner: "CommentOwnerEmail",
            optional: true,
        },
    };

    fn sql(&self, _schema: &Schema) -> Cow<'static, str> {
        Cow::Borrowed(
            "
            SELECT
                b.id AS BlogId, b.url AS Url, b.owner_id AS BlogOwnerId,
                u.email AS BlogOwnerEmail,
                p.id AS PostId, p.title AS Title, p.blog_id AS PostBlogId, p.owner_id AS PostOwnerId,
                up.email AS PostOwnerEmail,
                c.id AS CommentId, c.text AS Text, c.post_id AS CommentPostId, c.owner_id AS CommentOwnerId,
                uc.email AS CommentOwnerEmail
            FROM blogs b
            INNER JOIN users u ON b.owner_id = u.email
            LEFT JOIN posts p ON b.id = p.blog_id
            LEFT JOIN users up ON p.owner_id = up.email
            LEFT JOIN comments c ON p.id = c.post_id
            LEFT JOIN users uc ON c.owner_id = uc.email
            ORDER BY b.id, p.id, c.id
            ",
        )
    }
}
