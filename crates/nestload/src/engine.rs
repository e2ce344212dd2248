mod arena;
pub(crate) use arena::{assemble, Arena};

mod materialize;
pub use materialize::{materialize, Materializer};
pub(crate) use materialize::materialize_level;
