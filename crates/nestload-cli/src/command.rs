mod run;
pub(crate) use run::RunCommand;

mod verify;
pub(crate) use verify::VerifyCommand;

use clap::{Args, Parser};
use nestload::BenchConfig;

#[derive(Parser, Debug)]
pub(crate) enum Command {
    /// Seed every dataset of the sweep and time each strategy
    Run(RunCommand),

    /// Check that every strategy reproduces the seeded graph
    Verify(VerifyCommand),
}

/// Narrows the sweep. Each given flag replaces its axis with one value.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SweepArgs {
    /// Only run the named strategy (repeatable)
    #[arg(long = "strategy", short = 's')]
    strategies: Vec<String>,

    #[arg(long)]
    blogs: Option<usize>,

    #[arg(long)]
    posts: Option<usize>,

    #[arg(long)]
    comments: Option<usize>,

    #[arg(long)]
    owners: Option<usize>,
}

impl SweepArgs {
    pub(crate) fn apply(&self, mut config: BenchConfig) -> nestload::Result<BenchConfig> {
        if !self.strategies.is_empty() {
            config = config.strategies(&self.strategies);
        }

        let axes = [
            (self.blogs, &mut config.blog_count),
            (self.posts, &mut config.posts_per_blog),
            (self.comments, &mut config.comments_per_post),
            (self.owners, &mut config.owner_count),
        ];
        for (value, axis) in axes {
            if let Some(value) = value {
                *axis = vec![value];
            }
        }

        config.validate()?;
        Ok(config)
    }
}
