use crate::cli::CommonArgs;
use crate::error::{MindlogError, Result};
use crate::model::{RepoListOutput, SCHEMA_VERSION};
use crate::store::Store;
use crate::util::truncate;
use anyhow::Context;
use chrono::Utc;
use console::style;

pub fn exec_add(
    common: CommonArgs,
    name: String,
    description: Option<String>,
) -> anyhow::Result<()> {
    let name = clean_name(&name)?;

    let mut store = Store::open(common.store.as_deref()).context("Failed to open store")?;
    let repo = store
        .add_repository(&name, description.as_deref())
        .context("Failed to create repository")?;

    println!(
        "Created repository {} {}",
        style(format!("#{}", repo.id)).cyan(),
        style(&repo.name).bold()
    );
    Ok(())
}

pub fn exec_ls(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let store = Store::open(common.store.as_deref()).context("Failed to open store")?;
    let repositories = store
        .list_repositories()
        .context("Failed to load repositories")?;

    if json {
        let output = RepoListOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            repositories,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if repositories.is_empty() {
        println!("No repositories yet. Create one with 'mindlog repo add <name>'.");
        return Ok(());
    }

    println!();
    println!(
        "{}",
        style(format!(
            "{:>4}  {:<20} {:<12} {}",
            "ID", "NAME", "CREATED", "DESCRIPTION"
        ))
        .bold()
    );
    println!("{}", "─".repeat(80));
    for repo in &repositories {
        println!(
            "{:>4}  {:<20} {:<12} {}",
            repo.id,
            truncate(&repo.name, 20),
            repo.created_at.format("%Y-%m-%d"),
            truncate(repo.description.as_deref().unwrap_or("-"), 40)
        );
    }
    Ok(())
}

pub fn exec_rm(common: CommonArgs, name: String, with_commits: bool) -> anyhow::Result<()> {
    let mut store = Store::open(common.store.as_deref()).context("Failed to open store")?;
    let affected = store
        .delete_repository(&name, with_commits)
        .context("Failed to remove repository")?;

    if with_commits {
        println!(
            "Removed repository {} and {} commits",
            style(&name).bold(),
            style(affected).cyan()
        );
    } else {
        println!(
            "Removed repository {} ({} commits left unaffiliated)",
            style(&name).bold(),
            style(affected).cyan()
        );
    }
    Ok(())
}

fn clean_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(MindlogError::Parse(
            "Repository name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}
