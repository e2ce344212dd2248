pub mod config;
pub use config::BenchConfig;

pub mod dataset;
pub use dataset::{Dataset, DatasetParams};

pub mod db;
pub use db::Connect;

mod engine;
pub use engine::{materialize, Materializer};

pub mod harness;
pub use harness::{AllocationProbe, Harness, Report};

pub mod strategy;
pub use strategy::Strategy;

pub use nestload_core::{
    bail,
    driver::{Connection, Driver},
    err,
    graph::GraphStats,
    row, schema, stmt, Blog, Comment, Error, Graph, LookupTable, Post, Result, Schema, User,
};
