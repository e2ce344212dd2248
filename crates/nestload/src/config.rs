use crate::{strategy, DatasetParams};

use nestload_core::{Error, Result};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a comparison run
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// database_url = "sqlite:bench.db"
/// iterations = 20
/// blog_count = [1, 10, 100]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Database the datasets are seeded into and loaded from
    pub database_url: String,

    /// Timed invocations of each strategy per dataset
    pub iterations: usize,

    /// Seed for dataset generation
    pub seed: u64,

    /// Strategies to run, by name. Empty runs every strategy.
    pub strategies: Vec<String>,

    /// Sweep axes. Every combination is run.
    pub blog_count: Vec<usize>,
    pub posts_per_blog: Vec<usize>,
    pub comments_per_post: Vec<usize>,
    pub owner_count: Vec<usize>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            iterations: 10,
            seed: 0,
            strategies: vec![],
            blog_count: vec![1, 100],
            posts_per_blog: vec![100, 1],
            comments_per_post: vec![1, 10],
            owner_count: vec![1, 5],
        }
    }
}

impl BenchConfig {
    /// Create a new BenchConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|err| Error::invalid_config(format!("{}: {err}", path.display())))?;

        Self::from_toml(&contents)
            .map_err(|err| err.context(path.display().to_string()))
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|err| Error::invalid_config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the database URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Set the number of timed iterations
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the dataset seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Restrict the run to the named strategies
    pub fn strategies(mut self, strategies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.strategies = strategies.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the sweep with a single dataset shape
    pub fn params(mut self, params: DatasetParams) -> Self {
        self.blog_count = vec![params.blog_count];
        self.posts_per_blog = vec![params.posts_per_blog];
        self.comments_per_post = vec![params.comments_per_post];
        self.owner_count = vec![params.owner_count];
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::invalid_config("iterations must be at least 1"));
        }

        if u32::try_from(self.iterations).is_err() {
            return Err(Error::invalid_config(format!(
                "iterations must be at most {}",
                u32::MAX
            )));
        }

        let axes = [
            ("blog_count", &self.blog_count),
            ("posts_per_blog", &self.posts_per_blog),
            ("comments_per_post", &self.comments_per_post),
            ("owner_count", &self.owner_count),
        ];
        for (name, axis) in axes {
            if axis.is_empty() {
                return Err(Error::invalid_config(format!("`{name}` has no values")));
            }
        }

        for name in &self.strategies {
            if strategy::by_name(name).is_none() {
                return Err(Error::invalid_config(format!("unknown strategy `{name}`")));
            }
        }

        for params in self.sweep() {
            params.validate()?;
        }

        Ok(())
    }

    /// Every combination of the sweep axes, in axis order.
    pub fn sweep(&self) -> Vec<DatasetParams> {
        let mut sweep = vec![];

        for &blog_count in &self.blog_count {
            for &posts_per_blog in &self.posts_per_blog {
                for &comments_per_post in &self.comments_per_post {
                    for &owner_count in &self.owner_count {
                        sweep.push(DatasetParams::new(
                            blog_count,
                            posts_per_blog,
                            comments_per_post,
                            owner_count,
                        ));
                    }
                }
            }
        }

        sweep
    }
}
