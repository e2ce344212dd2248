use nestload::{
    row,
    stmt::{Row, Rows, Value},
    strategy::{self, HandWrittenJoin, JoinSource},
    BenchConfig, DatasetParams, Harness, Schema, Strategy,
};
use nestload_sql::Serializer;
use tests::FixtureConnection;

const PARAMS: DatasetParams = DatasetParams {
    blog_count: 1,
    posts_per_blog: 1,
    comments_per_post: 1,
    owner_count: 1,
};

fn rows(columns: &[&str], rows: Vec<Row>) -> Rows {
    Rows::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}

/// A connection that knows the owner table holds only `a@x.com`.
fn with_users(schema: &Schema) -> FixtureConnection {
    FixtureConnection::new().respond(
        Serializer::sqlite(schema).select_table(schema.users()),
        rows(&["email"], vec![row!["a@x.com"]]),
    )
}

const JOIN_COLUMNS: &[&str] = &[
    "BlogId",
    "Url",
    "BlogOwnerId",
    "BlogOwnerEmail",
    "PostId",
    "Title",
    "PostBlogId",
    "PostOwnerId",
    "PostOwnerEmail",
    "CommentId",
    "Text",
    "CommentPostId",
    "CommentOwnerId",
    "CommentOwnerEmail",
];

fn join_fixture(schema: &Schema, join: Vec<Row>) -> FixtureConnection {
    with_users(schema).respond(
        HandWrittenJoin.sql(schema).into_owned(),
        rows(JOIN_COLUMNS, join),
    )
}

#[tokio::test]
async fn split_query_rejects_orphaned_children() {
    let schema = Schema::blog();
    let serializer = Serializer::sqlite(&schema);

    let mut conn = with_users(&schema)
        .respond(
            serializer.select_table(schema.blogs()),
            rows(&["id", "url", "owner_id"], vec![row![1, "https://blog0.com", "a@x.com"]]),
        )
        .respond(
            serializer.select_table(schema.posts()),
            rows(
                &["id", "title", "blog_id", "owner_id"],
                vec![row![1, "Hello.", 9, "a@x.com"]],
            ),
        )
        .respond(
            serializer.select_table(schema.comments()),
            rows(&["id", "text", "post_id", "owner_id"], vec![]),
        );

    let err = strategy::split_query()
        .load(&mut conn, &schema, &PARAMS)
        .await
        .unwrap_err();

    assert!(err.is_invalid_result(), "{err}");
    assert!(err.to_string().contains("not loaded"), "{err}");
}

#[tokio::test]
async fn unknown_owners_are_reported() {
    let schema = Schema::blog();
    let mut conn = join_fixture(
        &schema,
        vec![row![
            1,
            "https://blog0.com",
            "a@x.com",
            "a@x.com",
            1,
            "Hello.",
            1,
            "ghost@x.com",
            "ghost@x.com",
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
        ]],
    );

    let err = strategy::raw_sql()
        .load(&mut conn, &schema, &PARAMS)
        .await
        .unwrap_err();

    assert!(err.is_unresolved_owner(), "{err}");
    assert!(err.to_string().contains("ghost@x.com"), "{err}");
}

#[tokio::test]
async fn child_below_a_null_parent_is_malformed() {
    let schema = Schema::blog();
    let mut conn = join_fixture(
        &schema,
        vec![row![
            1,
            "https://blog0.com",
            "a@x.com",
            "a@x.com",
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            5,
            "Nice.",
            Value::Null,
            "a@x.com",
            "a@x.com",
        ]],
    );

    let err = strategy::raw_sql()
        .load(&mut conn, &schema, &PARAMS)
        .await
        .unwrap_err();

    assert!(err.is_malformed_row(), "{err}");
}

#[tokio::test]
async fn missing_join_columns_are_reported() {
    let schema = Schema::blog();
    let mut conn = with_users(&schema).respond(
        HandWrittenJoin.sql(&schema).into_owned(),
        rows(&["BlogId", "Url"], vec![]),
    );

    let err = strategy::raw_sql()
        .load(&mut conn, &schema, &PARAMS)
        .await
        .unwrap_err();

    assert!(err.is_invalid_result(), "{err}");
}

#[tokio::test]
async fn driver_failures_surface_as_driver_errors() {
    let schema = Schema::blog();
    let mut conn = FixtureConnection::new();

    let err = strategy::single_query()
        .load(&mut conn, &schema, &PARAMS)
        .await
        .unwrap_err();

    assert!(err.is_driver_operation_failed(), "{err}");
}

#[tokio::test]
async fn harness_records_setup_failures_and_continues() {
    tests::init_tracing();

    let config = BenchConfig::new()
        .database_url("sqlite:/nonexistent/nestload/bench.db")
        .iterations(1)
        .params(PARAMS);
    let harness = Harness::new(config).unwrap();

    let report = harness.run().await;
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.failures().count(), 3);

    let checks = harness.verify().await;
    assert_eq!(checks.len(), 3);
    assert!(checks.iter().all(|check| !check.passed()));
}
