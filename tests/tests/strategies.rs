use nestload::{strategy, DatasetParams, Schema, Strategy};
use pretty_assertions::assert_eq;
use tests::{seeded, LoggingConnection};

const SHAPES: &[DatasetParams] = &[
    DatasetParams {
        blog_count: 0,
        posts_per_blog: 0,
        comments_per_post: 0,
        owner_count: 0,
    },
    DatasetParams {
        blog_count: 3,
        posts_per_blog: 0,
        comments_per_post: 0,
        owner_count: 1,
    },
    DatasetParams {
        blog_count: 2,
        posts_per_blog: 3,
        comments_per_post: 0,
        owner_count: 2,
    },
    DatasetParams {
        blog_count: 4,
        posts_per_blog: 3,
        comments_per_post: 2,
        owner_count: 5,
    },
    DatasetParams {
        blog_count: 1,
        posts_per_blog: 100,
        comments_per_post: 1,
        owner_count: 1,
    },
];

#[tokio::test]
async fn every_strategy_reproduces_the_seeded_graph() {
    let schema = Schema::blog();

    for &params in SHAPES {
        let (mut conn, expected) = seeded(params, 42).await;
        assert_eq!(expected.stats().blogs, params.blog_count);

        for strategy in strategy::all() {
            let graph = strategy.load(conn.as_mut(), &schema, &params).await.unwrap();

            // Every select orders by key, so even sibling order matches.
            assert_eq!(graph, expected, "{} on {params}", strategy.name());
        }
    }
}

#[tokio::test]
async fn strategies_agree_with_each_other() {
    let schema = Schema::blog();
    let params = DatasetParams::new(5, 4, 3, 3);
    let (mut conn, _) = seeded(params, 7).await;

    let mut graphs = vec![];
    for strategy in strategy::all() {
        graphs.push(strategy.load(conn.as_mut(), &schema, &params).await.unwrap());
    }

    let [single, split, raw] = &graphs[..] else {
        panic!("expected three strategies");
    };
    assert!(single.structurally_eq(split));
    assert!(single.structurally_eq(raw));
    assert_eq!(single.stats(), params.expected_stats());
}

#[tokio::test]
async fn owners_are_shared_across_levels() {
    let schema = Schema::blog();
    let params = DatasetParams::new(2, 2, 2, 1);
    let (mut conn, _) = seeded(params, 1).await;

    for strategy in strategy::all() {
        let graph = strategy.load(conn.as_mut(), &schema, &params).await.unwrap();

        let blog_owner = &graph.blogs[0].owner;
        for comment in graph.comments() {
            assert!(std::sync::Arc::ptr_eq(blog_owner, &comment.owner));
        }
        assert_eq!(graph.stats().owners, 1);
    }
}

#[tokio::test]
async fn flat_strategies_issue_one_join() {
    let schema = Schema::blog();
    let params = DatasetParams::new(2, 2, 2, 2);
    let (conn, _) = seeded(params, 3).await;
    let mut conn = LoggingConnection::new(conn);

    let flat: [Box<dyn Strategy>; 2] = [
        Box::new(strategy::single_query()),
        Box::new(strategy::raw_sql()),
    ];

    for strategy in flat {
        strategy.load(&mut conn, &schema, &params).await.unwrap();

        let queries = conn.take_queries();
        assert_eq!(queries.len(), 2, "{}: {queries:#?}", strategy.name());
        assert!(queries[0].contains("\"users\""));
        assert!(queries[1].contains("JOIN"));
    }
}

#[tokio::test]
async fn split_query_issues_one_select_per_table() {
    let schema = Schema::blog();
    let params = DatasetParams::new(2, 2, 2, 2);
    let (conn, _) = seeded(params, 3).await;
    let mut conn = LoggingConnection::new(conn);

    strategy::split_query()
        .load(&mut conn, &schema, &params)
        .await
        .unwrap();

    let queries = conn.take_queries();
    assert_eq!(queries.len(), 4);
    for (sql, table) in queries.iter().zip(["users", "blogs", "posts", "comments"]) {
        assert!(sql.contains(&format!("FROM \"{table}\"")), "{sql}");
        assert!(!sql.contains("JOIN"), "{sql}");
    }
}

#[tokio::test]
async fn loads_can_be_repeated_on_one_connection() {
    let schema = Schema::blog();
    let params = DatasetParams::new(3, 2, 2, 2);
    let (mut conn, expected) = seeded(params, 9).await;
    let strategy = strategy::single_query();

    for _ in 0..3 {
        let graph = strategy.load(conn.as_mut(), &schema, &params).await.unwrap();
        assert_eq!(graph, expected);
    }
}
