mod fixture;
pub use fixture::FixtureConnection;

mod logging_driver;
pub use logging_driver::LoggingConnection;

use nestload::{Dataset, DatasetParams, Graph, Schema};
use nestload_core::{Connection, Driver};
use nestload_driver_sqlite::Sqlite;

/// Installs a test-writer subscriber once per test binary. `RUST_LOG`
/// controls the filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Opens a fresh in-memory database and seeds a generated dataset into it.
/// Returns the connection and the graph every strategy must reproduce.
pub async fn seeded(params: DatasetParams, seed: u64) -> (Box<dyn Connection>, Graph) {
    init_tracing();

    let schema = Schema::blog();
    let dataset = Dataset::generate(params, seed).unwrap();

    let mut conn = Sqlite::in_memory().connect().await.unwrap();
    let expected = dataset.seed(conn.as_mut(), &schema).await.unwrap();

    (conn, expected)
}
