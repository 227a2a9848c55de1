use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::log::LogQuery;
use crate::model::Category;

#[derive(Parser)]
#[command(name = "mindlog")]
#[command(about = "Personal activity log with contribution heatmap and rule-based insights")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to the store database (defaults to the user data directory)")]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    Commit {
        #[arg(help = "Short title for the entry")]
        title: String,

        #[arg(short = 'd', long, help = "Free-form description")]
        description: Option<String>,

        #[arg(short = 'c', long, default_value = "general", help = "Category: coding, learning, health, meeting, planning, other, or general")]
        category: Category,

        #[arg(short = 'e', long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5), help = "Effort score from 1 to 5")]
        effort: u8,

        #[arg(short = 'r', long, help = "Repository to file the entry under")]
        repo: Option<String>,

        #[arg(long, help = "Timestamp for the entry (RFC3339, YYYY-MM-DD, or '<duration> ago'); defaults to now")]
        date: Option<String>,
    },
    Log {
        #[arg(short = 'c', long, help = "Only show this category")]
        category: Option<Category>,

        #[arg(short = 'r', long, help = "Only show commits from this repository")]
        repo: Option<String>,

        #[arg(long, help = "Substring match against title and description")]
        search: Option<String>,

        #[arg(long, help = "Start of the time range (RFC3339, YYYY-MM-DD, or '<duration> ago')")]
        since: Option<String>,

        #[arg(long, help = "End of the time range (RFC3339, YYYY-MM-DD, or '<duration> ago')")]
        until: Option<String>,

        #[arg(long, default_value_t = 100, help = "Maximum number of entries to show")]
        limit: u32,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    Edit {
        #[arg(help = "Commit id to edit")]
        id: i64,

        #[arg(long, help = "New title")]
        title: Option<String>,

        #[arg(short = 'd', long, help = "New description")]
        description: Option<String>,

        #[arg(short = 'c', long, help = "New category")]
        category: Option<Category>,

        #[arg(short = 'e', long, value_parser = clap::value_parser!(u8).range(1..=5), help = "New effort score from 1 to 5")]
        effort: Option<u8>,

        #[arg(long, help = "New timestamp (RFC3339, YYYY-MM-DD, or '<duration> ago')")]
        date: Option<String>,
    },
    Rm {
        #[arg(help = "Commit id to remove")]
        id: i64,
    },
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },
    Stats {
        #[arg(long, default_value_t = 365, help = "Heatmap window length in days")]
        window_days: usize,

        #[arg(short = 'r', long, help = "Scope statistics to one repository")]
        repo: Option<String>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long = "interactive", alias = "tui", alias = "ui", help = "Enable interactive terminal UI")]
        interactive: bool,
    },
    Insight {
        #[arg(long, help = "Recompute now instead of serving the cached insight")]
        refresh: bool,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    Export {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    Seed,
}

#[derive(Subcommand)]
pub enum RepoCommands {
    Add {
        #[arg(help = "Repository name")]
        name: String,

        #[arg(short = 'd', long, help = "Description")]
        description: Option<String>,
    },
    Ls {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    Rm {
        #[arg(help = "Repository name")]
        name: String,

        #[arg(long, help = "Also delete the repository's commits instead of orphaning them")]
        with_commits: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Commit { title, description, category, effort, repo, date } => {
                crate::commit::exec(self.common, title, description, category, effort, repo, date)
            }
            Commands::Log { category, repo, search, since, until, limit, json, ndjson } => {
                let query = LogQuery { category, repo, search, since, until, limit };
                crate::log::exec(self.common, query, json, ndjson)
            }
            Commands::Edit { id, title, description, category, effort, date } => {
                crate::commit::exec_edit(self.common, id, title, description, category, effort, date)
            }
            Commands::Rm { id } => crate::commit::exec_remove(self.common, id),
            Commands::Repo { command } => match command {
                RepoCommands::Add { name, description } => {
                    crate::repo::exec_add(self.common, name, description)
                }
                RepoCommands::Ls { json } => crate::repo::exec_ls(self.common, json),
                RepoCommands::Rm { name, with_commits } => {
                    crate::repo::exec_rm(self.common, name, with_commits)
                }
            },
            Commands::Stats { window_days, repo, json, ndjson, interactive } => {
                crate::stats::exec(self.common, window_days, repo, json, ndjson, interactive)
            }
            Commands::Insight { refresh, json } => {
                crate::insight::exec(self.common, refresh, json)
            }
            Commands::Export { json, ndjson } => {
                crate::export::exec(self.common, json, ndjson)
            }
            Commands::Seed => crate::seed::exec(self.common),
        }
    }
}
