use nestload_core::{
    async_trait,
    driver::Connection,
    schema::db::{Schema, Table},
    stmt::{Rows, Value},
    Result,
};
use std::sync::Mutex;

/// A connection wrapper that records every select it runs.
#[derive(Debug)]
pub struct LoggingConnection {
    /// The underlying connection that actually executes statements
    inner: Box<dyn Connection>,

    /// SQL of every query, in execution order
    queries: Mutex<Vec<String>>,
}

impl LoggingConnection {
    pub fn new(inner: Box<dyn Connection>) -> Self {
        Self {
            inner,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Returns and clears the query log.
    pub fn take_queries(&self) -> Vec<String> {
        std::mem::take(&mut *self.queries.lock().unwrap())
    }
}

#[async_trait]
impl Connection for LoggingConnection {
    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        self.inner.push_schema(schema).await
    }

    async fn reset_db(&mut self, schema: &Schema) -> Result<()> {
        self.inner.reset_db(schema).await
    }

    async fn insert(
        &mut self,
        schema: &Schema,
        table: &Table,
        rows: Vec<Vec<Value>>,
    ) -> Result<Vec<i64>> {
        self.inner.insert(schema, table, rows).await
    }

    async fn query(&mut self, sql: &str) -> Result<Rows> {
        self.queries.lock().unwrap().push(sql.to_string());
        self.inner.query(sql).await
    }
}
