mod value;
pub(crate) use value::Value;

use nestload_core::{
    async_trait,
    driver::Driver,
    schema::db::{Schema, Table},
    stmt::{self, Row, Rows},
    Error, Result,
};
use nestload_sql::Serializer;
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver from a `sqlite:` connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url_str}"))
        })?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else if url.path().is_empty() {
            Err(Error::invalid_connection_url(format!(
                "connection URL has no database path; url={url_str}"
            )))
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    /// Each in-memory connection is a fresh, empty database.
    async fn connect(&self) -> Result<Box<dyn nestload_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Self::init(connection)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Self::init(connection)
    }

    fn init(connection: RusqliteConnection) -> Result<Self> {
        // SQLite leaves foreign key enforcement off unless asked.
        connection
            .pragma_update(None, "foreign_keys", true)
            .map_err(Error::driver_operation_failed)?;

        Ok(Self { connection })
    }

    fn execute(&self, sql: &str) -> Result<usize> {
        tracing::trace!(sql, "execute");

        self.connection
            .execute(sql, [])
            .map_err(Error::driver_operation_failed)
    }
}

#[async_trait]
impl nestload_core::driver::Connection for Connection {
    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        let serializer = Serializer::sqlite(schema);

        for table in &schema.tables {
            self.execute(&serializer.create_table(table))?;
        }

        Ok(())
    }

    async fn reset_db(&mut self, schema: &Schema) -> Result<()> {
        let serializer = Serializer::sqlite(schema);

        for table in schema.tables.iter().rev() {
            let count = self.execute(&serializer.delete_all(table))?;
            tracing::debug!(table = %table.name, count, "deleted rows");
        }

        Ok(())
    }

    async fn insert(
        &mut self,
        schema: &Schema,
        table: &Table,
        rows: Vec<Vec<stmt::Value>>,
    ) -> Result<Vec<i64>> {
        let width = table.insertable_columns().count();
        let returns_key = table.primary_key_column().auto_increment;
        let count = rows.len();

        let sql = Serializer::sqlite(schema).insert(table);
        tracing::trace!(sql, rows = count, "insert");

        let tx = self
            .connection
            .transaction()
            .map_err(Error::driver_operation_failed)?;
        let mut keys = Vec::with_capacity(if returns_key { count } else { 0 });

        {
            let mut stmt = tx
                .prepare_cached(&sql)
                .map_err(Error::driver_operation_failed)?;

            for row in rows {
                if row.len() != width {
                    return Err(Error::invalid_result(format!(
                        "insert into `{}` expects {width} values, got {}",
                        table.name,
                        row.len()
                    )));
                }

                let params = row.into_iter().map(Value::from).collect::<Vec<_>>();
                stmt.execute(rusqlite::params_from_iter(params.iter()))
                    .map_err(Error::driver_operation_failed)?;

                if returns_key {
                    keys.push(tx.last_insert_rowid());
                }
            }
        }

        tx.commit().map_err(Error::driver_operation_failed)?;

        tracing::debug!(table = %table.name, rows = count, "inserted rows");
        Ok(keys)
    }

    async fn query(&mut self, sql: &str) -> Result<Rows> {
        tracing::trace!(sql, "query");

        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let mut rows = stmt.query([]).map_err(Error::driver_operation_failed)?;
        let mut ret = vec![];

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut items = Vec::with_capacity(width);

                    for index in 0..width {
                        items.push(Value::from_sql(row, index)?.into_inner());
                    }

                    ret.push(Row::from_vec(items));
                }
                Ok(None) => break,
                Err(err) => return Err(Error::driver_operation_failed(err)),
            }
        }

        tracing::debug!(rows = ret.len(), width, "query complete");
        Ok(Rows::new(columns, ret))
    }
}
