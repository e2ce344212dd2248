#[macro_use]
mod macros;

pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::{Error, IntoError};

pub mod graph;
pub use graph::{Blog, Comment, Graph, Post, User};

mod lookup;
pub use lookup::LookupTable;

pub mod schema;
pub use schema::Schema;

pub mod stmt;

/// A Result type alias that uses nestload's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
