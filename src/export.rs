use crate::cli::CommonArgs;
use crate::model::{Commit, CommitFilter, ExportOutput, Repository, SCHEMA_VERSION};
use crate::store::Store;
use anyhow::Context;
use chrono::Utc;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let store = Store::open(common.store.as_deref()).context("Failed to open store")?;

    let repositories = store
        .list_repositories()
        .context("Failed to load repositories")?;
    let mut commits = store
        .list_commits(&CommitFilter::default())
        .context("Failed to load commits")?;
    // dumps read oldest first
    commits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    if json {
        output_json(&repositories, &commits)?;
    } else if ndjson {
        output_ndjson(&commits)?;
    } else {
        output_summary(&repositories, &commits)?;
    }

    Ok(())
}

fn output_json(repositories: &[Repository], commits: &[Commit]) -> anyhow::Result<()> {
    let output = ExportOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repositories: repositories.to_vec(),
        commits: commits.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// One commit per line; repository metadata travels only in the JSON
/// envelope.
fn output_ndjson(commits: &[Commit]) -> anyhow::Result<()> {
    for commit in commits {
        println!("{}", serde_json::to_string(commit)?);
    }
    Ok(())
}

fn output_summary(repositories: &[Repository], commits: &[Commit]) -> anyhow::Result<()> {
    use console::style;

    println!("{}", style("Export Summary").bold());
    println!("{}", "─".repeat(50));

    println!("Total repositories: {}", style(repositories.len()).cyan());
    println!("Total commits: {}", style(commits.len()).cyan());
    println!(
        "Active days: {}",
        style(crate::stats::active_days(commits)).yellow()
    );

    if !commits.is_empty() {
        let first = &commits[0];
        let last = &commits[commits.len() - 1];
        println!(
            "Date range: {} to {}",
            style(first.timestamp.format("%Y-%m-%d")).dim(),
            style(last.timestamp.format("%Y-%m-%d")).dim()
        );
    }

    println!("\nUse --json or --ndjson flags to export the raw data.");
    Ok(())
}
