//! SQL text for the benchmark schema: DDL, seed inserts, and the selects
//! each loading strategy issues.

pub mod serializer;
pub use serializer::Serializer;
