use nestload::{strategy, Connect, Dataset, DatasetParams, Driver, Schema, Strategy};
use pretty_assertions::assert_eq;

struct TempDb(std::path::PathBuf);

impl TempDb {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "nestload-{name}-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        Self(path)
    }

    fn url(&self) -> String {
        format!("sqlite:{}", self.0.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[tokio::test]
async fn file_databases_persist_across_connections() {
    tests::init_tracing();

    let db = TempDb::new("persist");
    let schema = Schema::blog();
    let params = DatasetParams::new(3, 2, 2, 2);
    let driver = Connect::new(&db.url()).unwrap();

    let expected = {
        let mut conn = driver.connect().await.unwrap();
        Dataset::generate(params, 5)
            .unwrap()
            .seed(conn.as_mut(), &schema)
            .await
            .unwrap()
    };

    let mut conn = driver.connect().await.unwrap();
    let graph = strategy::split_query()
        .load(conn.as_mut(), &schema, &params)
        .await
        .unwrap();

    assert_eq!(graph, expected);
}

#[tokio::test]
async fn reseeding_replaces_the_previous_dataset() {
    let db = TempDb::new("reseed");
    let schema = Schema::blog();
    let driver = Connect::new(&db.url()).unwrap();
    let mut conn = driver.connect().await.unwrap();

    let large = DatasetParams::new(4, 3, 3, 3);
    Dataset::generate(large, 1)
        .unwrap()
        .seed(conn.as_mut(), &schema)
        .await
        .unwrap();

    let small = DatasetParams::new(1, 1, 1, 1);
    let expected = Dataset::generate(small, 1)
        .unwrap()
        .seed(conn.as_mut(), &schema)
        .await
        .unwrap();

    let graph = strategy::single_query()
        .load(conn.as_mut(), &schema, &small)
        .await
        .unwrap();

    assert_eq!(graph.stats(), small.expected_stats());
    assert_eq!(graph, expected);
}

#[tokio::test]
async fn seeded_keys_are_database_assigned() {
    let (_, expected) = tests::seeded(DatasetParams::new(2, 2, 1, 1), 0).await;

    let blog_ids: Vec<_> = expected.blogs.iter().map(|blog| blog.id).collect();
    assert_eq!(blog_ids, [1, 2]);

    let post_ids: Vec<_> = expected.posts().map(|post| post.id).collect();
    assert_eq!(post_ids, [1, 2, 3, 4]);

    for post in expected.posts() {
        for comment in &post.comments {
            assert_eq!(comment.post_id, post.id);
        }
    }
}
