use super::SweepArgs;
use crate::table;

use anyhow::Result;
use clap::Parser;
use nestload::{AllocationProbe, BenchConfig, Harness};
use std::io::Write;

#[derive(Parser, Debug)]
pub(crate) struct RunCommand {
    #[command(flatten)]
    sweep: SweepArgs,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl RunCommand {
    pub(crate) async fn run(
        self,
        config: BenchConfig,
        probe: Option<&'static dyn AllocationProbe>,
        out: &mut impl Write,
    ) -> Result<()> {
        let config = self.sweep.apply(config)?;
        tracing::info!(
            database_url = %config.database_url,
            iterations = config.iterations,
            datasets = config.sweep().len(),
            "starting run"
        );

        let mut harness = Harness::new(config)?;
        if let Some(probe) = probe {
            harness = harness.with_probe(probe);
        }

        let report = harness.run().await;

        if self.json {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        } else {
            write!(out, "{}", table::report(&report))?;
        }

        let failures = report.failures().count();
        if failures > 0 {
            tracing::warn!(failures, "some loads failed");
        }

        Ok(())
    }
}
