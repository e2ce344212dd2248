mod command;
use command::Command;

mod table;

use anyhow::Result;
use clap::{Args, Parser};
use nestload::{AllocationProbe, BenchConfig};
use std::{io::Write, path::PathBuf};
use tracing::Level;

/// Entry point shared by the `nestload` binary and tests.
#[derive(Debug, Default)]
pub struct NestloadCli {
    probe: Option<&'static dyn AllocationProbe>,
}

impl NestloadCli {
    /// Create a new NestloadCli without allocation counting
    pub fn new() -> Self {
        Self::default()
    }

    /// Report allocations measured through `probe`
    pub fn with_probe(mut self, probe: &'static dyn AllocationProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Parse and execute CLI commands from an iterator of arguments, writing
    /// results to `out`
    pub async fn parse_from<I, T>(&self, args: I, out: &mut impl Write) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::parse_from(args);
        self.run(cli, out).await
    }

    /// Execute already parsed arguments
    pub async fn run(&self, cli: Cli, out: &mut impl Write) -> Result<()> {
        let config = cli.global.config()?;

        match cli.command {
            Command::Run(cmd) => cmd.run(config, self.probe, out).await,
            Command::Verify(cmd) => cmd.run(config, out).await,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "nestload")]
#[command(about = "Compare strategies for loading a blog/post/comment graph")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    global: GlobalOptions,
}

impl Cli {
    /// Log level selected by the verbosity flags
    pub fn log_level(&self) -> Level {
        match self.global.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Options available to every command. Flags override the config file.
#[derive(Args, Debug, Clone)]
struct GlobalOptions {
    /// TOML file to read the benchmark configuration from
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Database to seed and load, e.g. `sqlite::memory:` or `sqlite:bench.db`
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Timed loads per strategy and dataset
    #[arg(long, short = 'n', global = true)]
    iterations: Option<usize>,

    /// Seed for dataset generation
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Increase log output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl GlobalOptions {
    fn config(&self) -> Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::load(path)?,
            None => BenchConfig::default(),
        };

        if let Some(url) = &self.database_url {
            config = config.database_url(url);
        }

        if let Some(iterations) = self.iterations {
            config = config.iterations(iterations);
        }

        if let Some(seed) = self.seed {
            config = config.seed(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("nestload").chain(args.iter().copied()))
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&["run", "--iterations", "3", "--seed", "9", "-vv"]);
        let config = cli.global.config().unwrap();

        assert_eq!(config.iterations, 3);
        assert_eq!(config.seed, 9);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(cli.log_level(), Level::TRACE);
    }

    #[test]
    fn flags_override_the_config_file() {
        let path = std::env::temp_dir().join(format!("nestload-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "iterations = 4\nseed = 1\nblog_count = [2]\n").unwrap();

        let cli = parse(&["verify", "--config", path.to_str().unwrap(), "--seed", "5"]);
        let config = cli.global.config();
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        assert_eq!(config.iterations, 4);
        assert_eq!(config.seed, 5);
        assert_eq!(config.blog_count, vec![2]);
    }

    #[test]
    fn database_url_flag_overrides_the_default() {
        let cli = parse(&["run", "--database-url", "sqlite:bench.db"]);
        let config = cli.global.config().unwrap();
        assert_eq!(config.database_url, "sqlite:bench.db");

        // Global flags are accepted after the subcommand as well as before.
        let cli = parse(&["--database-url", "sqlite:other.db", "verify"]);
        assert_eq!(cli.global.config().unwrap().database_url, "sqlite:other.db");
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let cli = parse(&["run", "--iterations", "0"]);
        assert!(cli.global.config().is_err());
    }

    #[tokio::test]
    async fn run_prints_json() {
        let mut out = vec![];
        NestloadCli::new()
            .parse_from(
                [
                    "nestload",
                    "run",
                    "--json",
                    "--iterations",
                    "1",
                    "--blogs",
                    "2",
                    "--posts",
                    "2",
                    "--comments",
                    "1",
                    "--owners",
                    "1",
                ],
                &mut out,
            )
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        for entry in entries {
            assert_eq!(entry["outcome"]["status"], "measured");
            assert_eq!(entry["outcome"]["entities"], 2 + 4 + 4);
        }
    }

    #[tokio::test]
    async fn verify_reports_every_strategy() {
        let mut out = vec![];
        NestloadCli::new()
            .parse_from(
                [
                    "nestload", "verify", "--blogs", "3", "--posts", "0", "--comments", "0",
                    "--owners", "2",
                ],
                &mut out,
            )
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches(" ok").count(), 3, "{out}");
    }
}
