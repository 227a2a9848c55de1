use crate::cli::CommonArgs;
use crate::model::CommitFilter;
use crate::store::Store;
use anyhow::Context;
use chrono::Utc;

pub fn exec(
    common: CommonArgs,
    window_days: usize,
    repo: Option<String>,
    json: bool,
    ndjson: bool,
    interactive: bool,
) -> anyhow::Result<()> {
    let store = Store::open(common.store.as_deref()).context("Failed to open store")?;

    let mut filter = CommitFilter::default();
    if let Some(name) = &repo {
        let repository = store
            .get_repository_by_name(name)
            .context("Failed to look up repository")?
            .ok_or_else(|| anyhow::anyhow!("No repository named '{name}'"))?;
        filter.repository_id = Some(repository.id);
    }

    let commits = store.list_commits(&filter).context("Failed to load commits")?;
    let repositories = store
        .list_repositories()
        .context("Failed to load repositories")?;

    let stats = super::compute_aggregates(&commits, &repositories, Utc::now(), window_days);

    if interactive {
        let insight = crate::insight::evaluate(&commits, Utc::now());
        crate::tui::run(stats, insight).context("Failed to run interactive dashboard")?;
    } else if json {
        super::output_json(&stats)?;
    } else if ndjson {
        super::output_ndjson(&stats)?;
    } else {
        super::output_profile(&stats);
    }

    Ok(())
}
