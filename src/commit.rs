use crate::cli::CommonArgs;
use crate::error::{MindlogError, Result};
use crate::model::{Category, CommitPatch, NewCommit};
use crate::store::Store;
use crate::util::parse_when;
use anyhow::Context;
use chrono::Utc;
use console::style;

pub fn exec(
    common: CommonArgs,
    title: String,
    description: Option<String>,
    category: Category,
    effort: u8,
    repo: Option<String>,
    date: Option<String>,
) -> anyhow::Result<()> {
    let title = clean_title(&title)?;

    let mut store = Store::open(common.store.as_deref()).context("Failed to open store")?;

    let repository_id = match &repo {
        Some(name) => Some(resolve_repo(&store, name)?),
        None => None,
    };

    let now = Utc::now();
    let timestamp = match &date {
        Some(raw) => parse_when(raw, now).context("Failed to parse --date")?,
        None => now,
    };

    let commit = store
        .add_commit(&NewCommit {
            title,
            description,
            category,
            effort,
            timestamp,
            repository_id,
        })
        .context("Failed to record commit")?;

    println!(
        "Recorded commit {} {} [{} / effort {}]",
        style(format!("#{}", commit.id)).cyan(),
        style(&commit.title).bold(),
        commit.category,
        commit.effort
    );
    Ok(())
}

pub fn exec_edit(
    common: CommonArgs,
    id: i64,
    title: Option<String>,
    description: Option<String>,
    category: Option<Category>,
    effort: Option<u8>,
    date: Option<String>,
) -> anyhow::Result<()> {
    if title.is_none()
        && description.is_none()
        && category.is_none()
        && effort.is_none()
        && date.is_none()
    {
        anyhow::bail!(
            "Nothing to change; pass at least one of --title, --description, --category, --effort, --date"
        );
    }

    let title = title.map(|t| clean_title(&t)).transpose()?;
    let timestamp = date
        .map(|raw| parse_when(&raw, Utc::now()))
        .transpose()
        .context("Failed to parse --date")?;

    let mut store = Store::open(common.store.as_deref()).context("Failed to open store")?;
    let commit = store
        .update_commit(
            id,
            &CommitPatch {
                title,
                description,
                category,
                effort,
                timestamp,
            },
        )
        .context("Failed to update commit")?;

    println!(
        "Updated commit {} {}",
        style(format!("#{}", commit.id)).cyan(),
        style(&commit.title).bold()
    );
    Ok(())
}

pub fn exec_remove(common: CommonArgs, id: i64) -> anyhow::Result<()> {
    let mut store = Store::open(common.store.as_deref()).context("Failed to open store")?;
    store.delete_commit(id).context("Failed to remove commit")?;

    println!("Removed commit {}", style(format!("#{id}")).cyan());
    Ok(())
}

fn clean_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(MindlogError::Parse(
            "Commit title must not be empty".to_string(),
        ));
    }
    Ok(title.to_string())
}

fn resolve_repo(store: &Store, name: &str) -> Result<i64> {
    store
        .get_repository_by_name(name)?
        .map(|r| r.id)
        .ok_or_else(|| {
            MindlogError::NotFound(format!(
                "No repository named '{name}' (create it with 'mindlog repo add {name}')"
            ))
        })
}
