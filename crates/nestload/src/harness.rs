//! Runs every strategy over every dataset shape of a [`BenchConfig`] and
//! records what each load cost.
//!
//! The harness only measures. Whether a strategy produced the right graph is
//! checked separately by [`Harness::verify`].

use crate::{strategy, BenchConfig, Connect, Dataset, DatasetParams, Strategy};

use nestload_core::{Connection, Driver, Error, Graph, Result, Schema};

use serde::Serialize;
use std::{
    fmt::Debug,
    time::{Duration, Instant},
};

/// Source of the process-wide allocation counter.
///
/// A binary that installs a counting global allocator hands it to the harness
/// through this trait. Without one, reports carry no allocation figures.
pub trait AllocationProbe: Debug + Send + Sync {
    /// Total bytes allocated by the process so far. Never decreases.
    fn allocated_bytes(&self) -> u64;
}

#[derive(Debug)]
pub struct Harness {
    config: BenchConfig,
    driver: Connect,
    schema: Schema,
    strategies: Vec<Box<dyn Strategy>>,
    probe: Option<&'static dyn AllocationProbe>,
}

/// Results keyed by strategy and dataset shape, in run order.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Report {
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub strategy: &'static str,
    pub params: DatasetParams,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Measured(Measurement),
    Failed { error: String },
}

/// Cost of one strategy on one dataset, over every timed iteration.
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub iterations: usize,

    #[serde(serialize_with = "serialize_micros")]
    pub mean: Duration,

    #[serde(serialize_with = "serialize_micros")]
    pub min: Duration,

    #[serde(serialize_with = "serialize_micros")]
    pub max: Duration,

    /// Mean bytes allocated per load, when a probe is installed.
    pub allocated_bytes: Option<u64>,

    /// Blogs, posts and comments in the loaded graph.
    pub entities: usize,
}

/// Outcome of checking one strategy against the generated dataset.
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub strategy: &'static str,
    pub params: DatasetParams,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Match,
    Mismatch { detail: String },
    Failed { error: String },
}

impl Harness {
    /// Validates `config` and resolves its database URL and strategies.
    pub fn new(config: BenchConfig) -> Result<Self> {
        config.validate()?;

        let strategies = if config.strategies.is_empty() {
            strategy::all()
        } else {
            config
                .strategies
                .iter()
                .map(|name| {
                    strategy::by_name(name)
                        .ok_or_else(|| Error::invalid_config(format!("unknown strategy `{name}`")))
                })
                .collect::<Result<_>>()?
        };

        Self::with_strategies(config, strategies)
    }

    /// Runs `strategies` instead of the ones `config` names.
    pub(crate) fn with_strategies(
        config: BenchConfig,
        strategies: Vec<Box<dyn Strategy>>,
    ) -> Result<Self> {
        config.validate()?;
        let driver = Connect::new(&config.database_url)?;

        Ok(Self {
            config,
            driver,
            schema: Schema::blog(),
            strategies,
            probe: None,
        })
    }

    /// Records allocations through `probe`.
    pub fn with_probe(mut self, probe: &'static dyn AllocationProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Runs the whole sweep.
    ///
    /// A failure while seeding or loading is recorded against the affected
    /// entries and the run moves on.
    pub async fn run(&self) -> Report {
        let mut report = Report::default();

        for params in self.config.sweep() {
            tracing::info!(%params, "preparing dataset");

            let seeded = self.prepare(params).await;
            let mut conn = match seeded {
                Ok((conn, _)) => conn,
                Err(err) => {
                    tracing::warn!(%params, error = %err, "dataset setup failed");
                    for strategy in &self.strategies {
                        report.push(strategy.name(), params, Outcome::failed(&err));
                    }
                    continue;
                }
            };

            for strategy in &self.strategies {
                let outcome = match self.measure(strategy.as_ref(), conn.as_mut(), &params).await {
                    Ok(measurement) => {
                        tracing::info!(
                            strategy = strategy.name(),
                            %params,
                            mean_us = measurement.mean.as_micros() as u64,
                            allocated = measurement.allocated_bytes,
                            "measured"
                        );
                        Outcome::Measured(measurement)
                    }
                    Err(err) => {
                        tracing::warn!(strategy = strategy.name(), %params, error = %err, "load failed");
                        Outcome::failed(&err)
                    }
                };

                report.push(strategy.name(), params, outcome);
            }
        }

        report
    }

    /// Seeds each dataset of the sweep and checks every strategy's graph
    /// against the generated one, ignoring sibling order.
    pub async fn verify(&self) -> Vec<Check> {
        let mut checks = vec![];

        for params in self.config.sweep() {
            let (mut conn, expected) = match self.prepare(params).await {
                Ok(seeded) => seeded,
                Err(err) => {
                    for strategy in &self.strategies {
                        checks.push(Check::new(strategy.name(), params, Verdict::failed(&err)));
                    }
                    continue;
                }
            };

            for strategy in &self.strategies {
                let verdict = match strategy.load(conn.as_mut(), &self.schema, &params).await {
                    Ok(graph) => Verdict::compare(&expected, &graph),
                    Err(err) => Verdict::failed(&err),
                };

                tracing::info!(strategy = strategy.name(), %params, ?verdict, "verified");
                checks.push(Check::new(strategy.name(), params, verdict));
            }
        }

        checks
    }

    /// Opens a connection and seeds a freshly generated dataset into it.
    async fn prepare(&self, params: DatasetParams) -> Result<(Box<dyn Connection>, Graph)> {
        let dataset = Dataset::generate(params, self.config.seed)?;

        let mut conn = self.driver.connect().await?;
        let expected = dataset.seed(conn.as_mut(), &self.schema).await?;

        Ok((conn, expected))
    }

    async fn measure(
        &self,
        strategy: &dyn Strategy,
        conn: &mut dyn Connection,
        params: &DatasetParams,
    ) -> Result<Measurement> {
        let iterations = self.config.iterations;
        let divisor = u32::try_from(iterations)
            .map_err(|_| Error::invalid_config(format!("{iterations} iterations is too many")))?;
        let mut total = Duration::ZERO;
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;
        let mut allocated = 0;
        let mut entities = 0;

        for _ in 0..iterations {
            let before = self.allocated_bytes();
            let start = Instant::now();

            let graph = strategy
                .load(conn, &self.schema, params)
                .await
                .map_err(|err| err.context(format!("{} strategy", strategy.name())))?;

            let elapsed = start.elapsed();
            allocated += self.allocated_bytes().saturating_sub(before);

            let stats = graph.stats();
            entities = stats.blogs + stats.posts + stats.comments;

            total += elapsed;
            min = min.min(elapsed);
            max = max.max(elapsed);
        }

        Ok(Measurement {
            iterations,
            mean: total / divisor,
            min,
            max,
            allocated_bytes: self.probe.map(|_| allocated / iterations as u64),
            entities,
        })
    }

    fn allocated_bytes(&self) -> u64 {
        self.probe.map_or(0, |probe| probe.allocated_bytes())
    }
}

impl Report {
    fn push(&mut self, strategy: &'static str, params: DatasetParams, outcome: Outcome) {
        self.entries.push(Entry {
            strategy,
            params,
            outcome,
        });
    }

    /// Looks up the outcome for one strategy and dataset shape.
    pub fn get(&self, strategy: &str, params: &DatasetParams) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|entry| entry.strategy == strategy && entry.params == *params)
            .map(|entry| &entry.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, Outcome::Failed { .. }))
    }
}

impl Outcome {
    fn failed(err: &Error) -> Self {
        Outcome::Failed {
            error: err.to_string(),
        }
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        match self {
            Outcome::Measured(measurement) => Some(measurement),
            Outcome::Failed { .. } => None,
        }
    }
}

impl Check {
    fn new(strategy: &'static str, params: DatasetParams, verdict: Verdict) -> Self {
        Self {
            strategy,
            params,
            verdict,
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Match
    }
}

impl Verdict {
    fn failed(err: &Error) -> Self {
        Verdict::Failed {
            error: err.to_string(),
        }
    }

    fn compare(expected: &Graph, actual: &Graph) -> Self {
        if expected.structurally_eq(actual) {
            return Verdict::Match;
        }

        let (expected, actual) = (expected.stats(), actual.stats());
        let detail = if expected == actual {
            "same entity counts, different ids, attributes or nesting".to_string()
        } else {
            format!("expected {expected:?}, loaded {actual:?}")
        };

        Verdict::Mismatch { detail }
    }
}

fn serialize_micros<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1e6)
}
