use crate::cli::CommonArgs;
use crate::model::{Category, NewCommit};
use crate::store::Store;
use anyhow::Context;
use chrono::{Duration, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

struct DemoCommit {
    title: &'static str,
    description: &'static str,
    category: Category,
    effort: u8,
    days_ago: i64,
}

const DEMO_COMMITS: &[DemoCommit] = &[
    DemoCommit {
        title: "Initial project research",
        description: "Compared architecture patterns and wrote up the tradeoffs.",
        category: Category::Learning,
        effort: 3,
        days_ago: 10,
    },
    DemoCommit {
        title: "Set up backend environment",
        description: "Installed the toolchain and bootstrapped the project skeleton.",
        category: Category::Coding,
        effort: 2,
        days_ago: 9,
    },
    DemoCommit {
        title: "Database schema design",
        description: "Sketched the tables and how they reference each other.",
        category: Category::Coding,
        effort: 4,
        days_ago: 8,
    },
    DemoCommit {
        title: "Felt tired, stopped early",
        description: "Low energy day, needed sleep.",
        category: Category::Health,
        effort: 1,
        days_ago: 7,
    },
    DemoCommit {
        title: "Frontend layout",
        description: "First pass at the dashboard layout.",
        category: Category::Coding,
        effort: 3,
        days_ago: 2,
    },
    DemoCommit {
        title: "Refactoring components",
        description: "Cleaned up the messier parts of the timeline view.",
        category: Category::Coding,
        effort: 2,
        days_ago: 1,
    },
    DemoCommit {
        title: "Implement insights",
        description: "Wired up the heuristics that turn history into summaries.",
        category: Category::Coding,
        effort: 5,
        days_ago: 0,
    },
];

/// Populates an empty store with a small demo history so stats and
/// insight output have something to show. Never touches existing data.
pub fn exec(common: CommonArgs) -> anyhow::Result<()> {
    let mut store = Store::open(common.store.as_deref()).context("Failed to open store")?;

    if !store.is_empty().context("Failed to inspect store")? {
        println!("Store already contains data. Skipping seed.");
        return Ok(());
    }

    let repo = store
        .add_repository(
            "learning-dsa",
            Some("Tracking my data structures and algorithms journey"),
        )
        .context("Failed to create demo repository")?;

    let pb = ProgressBar::new(DEMO_COMMITS.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:30.green} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("Seeding demo commits...");

    let now = Utc::now();
    for demo in DEMO_COMMITS {
        store
            .add_commit(&NewCommit {
                title: demo.title.to_string(),
                description: Some(demo.description.to_string()),
                category: demo.category,
                effort: demo.effort,
                timestamp: now - Duration::days(demo.days_ago),
                repository_id: Some(repo.id),
            })
            .context("Failed to seed commit")?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "Seeded repository {} with {} demo commits.",
        style(&repo.name).bold(),
        style(DEMO_COMMITS.len()).cyan()
    );
    println!(
        "Try {} or {} next.",
        style("mindlog stats").cyan(),
        style("mindlog insight").cyan()
    );
    Ok(())
}
