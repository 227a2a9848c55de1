use crate::cli::CommonArgs;
use crate::error::Result;
use crate::model::{Category, Commit, CommitFilter, LogOutput, Repository, SCHEMA_VERSION};
use crate::store::Store;
use crate::util::{resolve_range, truncate};
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::collections::HashMap;

/// Raw query as it arrives from the command line; time bounds are still
/// unparsed strings at this point.
pub struct LogQuery {
    pub category: Option<Category>,
    pub repo: Option<String>,
    pub search: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub limit: u32,
}

pub fn exec(common: CommonArgs, query: LogQuery, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let store = Store::open(common.store.as_deref()).context("Failed to open store")?;

    let (since, until) = resolve_range(
        query.since.as_deref(),
        query.until.as_deref(),
        Utc::now(),
    )
    .context("Failed to parse time range")?;

    let mut filter = CommitFilter {
        category: query.category,
        search: query.search.clone(),
        since,
        until,
        limit: Some(query.limit),
        ..CommitFilter::default()
    };
    if let Some(name) = &query.repo {
        let repository = store
            .get_repository_by_name(name)
            .context("Failed to look up repository")?
            .ok_or_else(|| anyhow::anyhow!("No repository named '{name}'"))?;
        filter.repository_id = Some(repository.id);
    }

    let entries = store
        .list_commits(&filter)
        .context("Failed to load commits")?;
    let repositories = store
        .list_repositories()
        .context("Failed to load repositories")?;

    if json {
        output_json(&entries, &query)?;
    } else if ndjson {
        output_ndjson(&entries)?;
    } else {
        output_table(&entries, &repositories);
    }

    Ok(())
}

fn output_json(entries: &[Commit], query: &LogQuery) -> Result<()> {
    let output = LogOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        category: query.category.map(|c| c.to_string()),
        repository: query.repo.clone(),
        search: query.search.clone(),
        since: query.since.clone(),
        until: query.until.clone(),
        entries: entries.to_vec(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_ndjson(entries: &[Commit]) -> Result<()> {
    for entry in entries {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}

fn output_table(entries: &[Commit], repositories: &[Repository]) {
    if entries.is_empty() {
        println!("No commits found.");
        return;
    }

    let repo_names: HashMap<i64, &str> = repositories
        .iter()
        .map(|r| (r.id, r.name.as_str()))
        .collect();

    println!();
    println!(
        "{}",
        style(format!(
            "{:>5}  {:<16} {:<9} {:>3}  {:<14} {}",
            "ID", "DATE", "CATEGORY", "EFF", "REPOSITORY", "TITLE"
        ))
        .bold()
    );
    println!("{}", "─".repeat(96));

    for entry in entries {
        let repo = entry
            .repository_id
            .and_then(|id| repo_names.get(&id).copied())
            .unwrap_or("-");
        println!(
            "{:>5}  {:<16} {:<9} {:>3}  {:<14} {}",
            entry.id,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.category.as_str(),
            entry.effort,
            truncate(repo, 14),
            truncate(&entry.title, 40)
        );
    }

    println!();
    println!(
        "{}",
        style(format!("{} entries shown", entries.len())).dim()
    );
}
