//! Relational description of the blog hierarchy and the row schema
//! descriptors that bind result-set columns to hierarchy levels.

pub mod db;
pub use db::Schema;

pub mod row;
