use nestload_core::{
    async_trait,
    driver::Connection,
    schema::db::{Schema, Table},
    stmt::{Rows, Value},
    Error, Result,
};
use std::collections::HashMap;

/// A connection that answers queries from canned result sets.
///
/// Lets tests hand strategies result sets a real database would refuse to
/// produce, such as rows whose foreign keys point nowhere.
#[derive(Debug, Default)]
pub struct FixtureConnection {
    responses: HashMap<String, Rows>,
}

impl FixtureConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `sql` with `rows`.
    pub fn respond(mut self, sql: impl Into<String>, rows: Rows) -> Self {
        self.responses.insert(sql.into(), rows);
        self
    }
}

fn unsupported(what: &str) -> Error {
    std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("fixture connection does not support {what}"),
    )
    .into()
}

#[async_trait]
impl Connection for FixtureConnection {
    async fn push_schema(&mut self, _schema: &Schema) -> Result<()> {
        Err(unsupported("push_schema"))
    }

    async fn reset_db(&mut self, _schema: &Schema) -> Result<()> {
        Err(unsupported("reset_db"))
    }

    async fn insert(
        &mut self,
        _schema: &Schema,
        _table: &Table,
        _rows: Vec<Vec<Value>>,
    ) -> Result<Vec<i64>> {
        Err(unsupported("insert"))
    }

    async fn query(&mut self, sql: &str) -> Result<Rows> {
        self.responses.get(sql).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no fixture for query: {sql}"),
            )
            .into()
        })
    }
}
