//! Interchangeable producers of the blog graph.
//!
//! Every strategy reads the same dataset through an open connection and
//! returns a finished [`Graph`]. The flat strategies differ only in where
//! their join statement comes from, so they share [`FlatJoin`].

mod flat_join;
pub use flat_join::{FlatJoin, GeneratedJoin, HandWrittenJoin, JoinSource};

mod split;
pub use split::SplitQuery;

use crate::DatasetParams;

use nestload_core::{async_trait, stmt::Rows, Connection, Graph, LookupTable, Result, Schema};
use nestload_sql::Serializer;

use std::fmt::Debug;

#[async_trait]
pub trait Strategy: Debug + Send + Sync {
    /// Name the strategy is reported under.
    fn name(&self) -> &'static str;

    /// Loads the whole graph. `params` describes the seeded dataset and is
    /// used to pre-size the materializer.
    async fn load(
        &self,
        conn: &mut dyn Connection,
        schema: &Schema,
        params: &DatasetParams,
    ) -> Result<Graph>;
}

/// One eager join, materialized in a single pass.
pub fn single_query() -> FlatJoin<GeneratedJoin> {
    FlatJoin::new(GeneratedJoin)
}

/// One select per level, linked by parent key.
pub fn split_query() -> SplitQuery {
    SplitQuery
}

/// A hand-written join of the same shape as [`single_query`].
pub fn raw_sql() -> FlatJoin<HandWrittenJoin> {
    FlatJoin::new(HandWrittenJoin)
}

/// Every strategy, in reporting order.
pub fn all() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(single_query()),
        Box::new(split_query()),
        Box::new(raw_sql()),
    ]
}

/// Looks a strategy up by its reported name.
pub fn by_name(name: &str) -> Option<Box<dyn Strategy>> {
    all().into_iter().find(|strategy| strategy.name() == name)
}

/// Snapshots the owner table. Every load builds its own snapshot.
async fn load_lookup(conn: &mut dyn Connection, schema: &Schema) -> Result<LookupTable> {
    let rows: Rows = conn
        .query(&Serializer::sqlite(schema).select_table(schema.users()))
        .await?;

    LookupTable::from_rows(&rows)
}
