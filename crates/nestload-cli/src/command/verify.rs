use super::SweepArgs;
use crate::table;

use anyhow::{bail, Result};
use clap::Parser;
use nestload::{BenchConfig, Harness};
use std::io::Write;

#[derive(Parser, Debug)]
pub(crate) struct VerifyCommand {
    #[command(flatten)]
    sweep: SweepArgs,
}

impl VerifyCommand {
    pub(crate) async fn run(self, config: BenchConfig, out: &mut impl Write) -> Result<()> {
        let config = self.sweep.apply(config)?;
        let checks = Harness::new(config)?.verify().await;

        write!(out, "{}", table::checks(&checks))?;

        let failed = checks.iter().filter(|check| !check.passed()).count();
        if failed > 0 {
            bail!("{failed} of {} checks failed", checks.len());
        }

        Ok(())
    }
}
