//! The seam between the core and a database.
//!
//! A driver opens connections; a connection creates the schema, seeds rows
//! and runs the select statements strategies hand it. Nothing here knows
//! about levels or graphs.

use crate::{
    async_trait,
    schema::db::{Schema, Table},
    stmt::{Rows, Value},
    Result,
};

use std::{borrow::Cow, fmt::Debug};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Returns the URL this driver connects to.
    fn url(&self) -> Cow<'_, str>;

    /// Opens a new connection.
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Creates every table of `schema` that does not exist yet.
    async fn push_schema(&mut self, schema: &Schema) -> Result<()>;

    /// Deletes all rows, children first.
    async fn reset_db(&mut self, schema: &Schema) -> Result<()>;

    /// Inserts `rows` into `table`, one value per insertable column, and
    /// returns the generated keys in insertion order. Tables without an
    /// auto-increment key return an empty list.
    async fn insert(
        &mut self,
        schema: &Schema,
        table: &Table,
        rows: Vec<Vec<Value>>,
    ) -> Result<Vec<i64>>;

    /// Runs a select statement and returns its full result set.
    async fn query(&mut self, sql: &str) -> Result<Rows>;
}
