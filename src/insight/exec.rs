use crate::cli::CommonArgs;
use crate::error::{MindlogError, Result};
use crate::model::{CommitFilter, Insight, InsightOutput, Severity, SCHEMA_VERSION};
use crate::store::Store;
use anyhow::Context;
use chrono::Utc;
use console::style;

pub fn exec(common: CommonArgs, refresh: bool, json: bool) -> anyhow::Result<()> {
    let mut store = Store::open(common.store.as_deref()).context("Failed to open store")?;

    let (insight, cached) = if refresh {
        (
            recompute(&mut store).context("Failed to compute insight")?,
            false,
        )
    } else {
        match store
            .load_insight()
            .context("Failed to read cached insight")?
        {
            Some(insight) => (insight, true),
            None => (
                recompute(&mut store).context("Failed to compute insight")?,
                false,
            ),
        }
    };

    if json {
        output_json(&insight, cached)?;
    } else {
        output_panel(&insight, cached);
    }

    Ok(())
}

/// Re-runs the engine over the full history and replaces the cached row.
fn recompute(store: &mut Store) -> Result<Insight> {
    let commits = store.list_commits(&CommitFilter::default())?;
    let insight = super::evaluate(&commits, Utc::now());
    store.store_insight(&insight)?;
    // hand back the stored row so the timestamp matches later cached reads
    store
        .load_insight()?
        .ok_or_else(|| MindlogError::Store("Insight cache write failed".to_string()))
}

fn output_json(insight: &Insight, cached: bool) -> Result<()> {
    let output = InsightOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        cached,
        insight: insight.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_panel(insight: &Insight, cached: bool) {
    let severity = match insight.severity {
        Severity::Low => style(insight.severity.as_str()).green(),
        Severity::Medium => style(insight.severity.as_str()).yellow(),
        Severity::High => style(insight.severity.as_str()).red().bold(),
    };

    println!();
    println!("{} [{}]", style("Insight").bold(), severity);
    println!("{}", "─".repeat(50));
    println!("{}", style(&insight.summary).bold());
    println!();
    for line in &insight.reasoning {
        println!("  • {line}");
    }
    if !insight.related_commits.is_empty() {
        println!();
        println!(
            "{}",
            style(format!(
                "Based on {} related commits.",
                insight.related_commits.len()
            ))
            .dim()
        );
    }

    println!();
    let stamp = insight.generated_at.format("%Y-%m-%d %H:%M UTC");
    if cached {
        println!(
            "{}",
            style(format!(
                "generated {stamp} (cached, use --refresh to recompute)"
            ))
            .dim()
        );
    } else {
        println!("{}", style(format!("generated {stamp}")).dim());
    }
}
