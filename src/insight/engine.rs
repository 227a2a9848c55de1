use crate::model::{Commit, Insight, Severity};
use chrono::{DateTime, Utc};

use super::rules::{RuleInput, MIN_SAMPLE, RULES};

/// Run the rule table against a commit history and return the single
/// most salient observation. Pure: identical `(commits, reference_now)`
/// always yield an identical Insight. Input order does not matter; the
/// engine sorts internally.
pub fn evaluate(commits: &[Commit], reference_now: DateTime<Utc>) -> Insight {
    let mut sorted = commits.to_vec();
    sorted.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });

    // Small samples make statistical claims misleading; skip the table.
    if sorted.len() < MIN_SAMPLE {
        return insufficient_data(sorted.len(), reference_now);
    }

    let input = RuleInput {
        commits: &sorted,
        now: reference_now,
    };
    for rule in RULES {
        if let Some(finding) = (rule.check)(&input) {
            return finding.into_insight(reference_now);
        }
    }

    steady_default(reference_now)
}

fn insufficient_data(count: usize, generated_at: DateTime<Utc>) -> Insight {
    Insight {
        summary: "Not enough data for insights yet".to_string(),
        severity: Severity::Low,
        reasoning: vec![
            format!("Only {count} commits logged; rules need at least {MIN_SAMPLE}."),
            "Keep logging to unlock trend analysis.".to_string(),
        ],
        related_commits: Vec::new(),
        generated_at,
    }
}

fn steady_default(generated_at: DateTime<Utc>) -> Insight {
    Insight {
        summary: "All systems nominal".to_string(),
        severity: Severity::Low,
        reasoning: vec![
            "Steady progress detected.".to_string(),
            "No immediate anomalies.".to_string(),
        ],
        related_commits: Vec::new(),
        generated_at,
    }
}
