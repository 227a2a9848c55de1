use crate::model::{Category, Commit, Insight, Severity};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Statistical rules are skipped entirely below this sample size.
pub const MIN_SAMPLE: usize = 3;
pub const GAP_DAYS: i64 = 7;
pub const KEYWORD_WINDOW: usize = 10;
pub const WELLBEING_KEYWORDS: [&str; 5] = ["sleep", "tired", "anxious", "burnout", "exhausted"];
pub const DOMINANCE_WINDOW_DAYS: i64 = 7;
pub const DOMINANCE_PCT: usize = 70;
pub const BURST_WINDOW_HOURS: i64 = 24;
pub const BURST_THRESHOLD: usize = 5;
pub const BURST_HIGH_THRESHOLD: usize = 10;
pub const MILESTONE_STEP: usize = 50;
pub const EFFORT_WINDOW: usize = 5;
pub const FATIGUE_MEAN: f64 = 4.0;
pub const FATIGUE_MEAN_HIGH: f64 = 4.5;

/// Snapshot handed to every rule. `commits` is sorted newest first;
/// the engine guarantees this before evaluation starts.
pub struct RuleInput<'a> {
    pub commits: &'a [Commit],
    pub now: DateTime<Utc>,
}

pub struct Finding {
    pub summary: String,
    pub severity: Severity,
    pub reasoning: Vec<String>,
    pub related_commits: Vec<i64>,
}

impl Finding {
    pub fn into_insight(self, generated_at: DateTime<Utc>) -> Insight {
        Insight {
            summary: self.summary,
            severity: self.severity,
            reasoning: self.reasoning,
            related_commits: self.related_commits,
            generated_at,
        }
    }
}

pub struct Rule {
    pub name: &'static str,
    pub check: fn(&RuleInput) -> Option<Finding>,
}

/// Priority order. The first rule that matches wins; severity is a
/// property of the match, never a selection criterion.
pub const RULES: &[Rule] = &[
    Rule {
        name: "activity-gap",
        check: activity_gap,
    },
    Rule {
        name: "wellbeing",
        check: wellbeing,
    },
    Rule {
        name: "dominant-category",
        check: dominant_category,
    },
    Rule {
        name: "momentum",
        check: momentum,
    },
    Rule {
        name: "fatigue",
        check: fatigue,
    },
];

fn activity_gap(input: &RuleInput) -> Option<Finding> {
    let last = input.commits.first()?;
    let days = (input.now - last.timestamp).num_days();
    if days <= GAP_DAYS {
        return None;
    }

    Some(Finding {
        summary: "Rust detected".to_string(),
        severity: Severity::High,
        reasoning: vec![
            format!("It's been {days} days since your last commit (gap threshold is {GAP_DAYS})."),
            "Consider smaller tasks to regain momentum.".to_string(),
        ],
        related_commits: vec![last.id],
    })
}

fn wellbeing(input: &RuleInput) -> Option<Finding> {
    let recent = &input.commits[..input.commits.len().min(KEYWORD_WINDOW)];

    let mut flagged: Vec<i64> = Vec::new();
    let mut terms: Vec<&str> = Vec::new();
    for commit in recent {
        let mut text = commit.title.to_lowercase();
        if let Some(description) = &commit.description {
            text.push(' ');
            text.push_str(&description.to_lowercase());
        }

        let mut hit = false;
        for keyword in WELLBEING_KEYWORDS {
            if text.contains(keyword) {
                hit = true;
                if !terms.contains(&keyword) {
                    terms.push(keyword);
                }
            }
        }
        if hit {
            flagged.push(commit.id);
        }
    }

    if flagged.is_empty() {
        return None;
    }

    Some(Finding {
        summary: "Wellbeing check".to_string(),
        severity: Severity::High,
        reasoning: vec![
            format!(
                "{} of your last {} commits mention {}.",
                flagged.len(),
                recent.len(),
                terms.join(", ")
            ),
            "Prioritize rest.".to_string(),
        ],
        related_commits: flagged,
    })
}

fn dominant_category(input: &RuleInput) -> Option<Finding> {
    let cutoff = input.now - Duration::days(DOMINANCE_WINDOW_DAYS);
    let window: Vec<&Commit> = input
        .commits
        .iter()
        .filter(|c| c.timestamp >= cutoff && c.timestamp <= input.now)
        .collect();
    if window.len() < MIN_SAMPLE {
        return None;
    }

    let mut counts: HashMap<Category, usize> = HashMap::new();
    for commit in &window {
        *counts.entry(commit.category).or_insert(0) += 1;
    }
    let (top, top_count) = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.as_str().cmp(a.0.as_str())))
        .map(|(category, count)| (*category, *count))?;

    let pct = top_count * 100 / window.len();
    if pct <= DOMINANCE_PCT {
        return None;
    }

    let related = window
        .iter()
        .filter(|c| c.category == top)
        .map(|c| c.id)
        .collect();

    Some(Finding {
        summary: format!(
            "Locked in: {top} at {pct}% of the last {DOMINANCE_WINDOW_DAYS} days"
        ),
        severity: Severity::Medium,
        reasoning: vec![
            format!(
                "{top}: {top_count} of {} recent commits ({pct}%).",
                window.len()
            ),
            "This indicates a strong focus session or possibly getting stuck.".to_string(),
        ],
        related_commits: related,
    })
}

fn momentum(input: &RuleInput) -> Option<Finding> {
    let cutoff = input.now - Duration::hours(BURST_WINDOW_HOURS);
    let burst: Vec<&Commit> = input
        .commits
        .iter()
        .filter(|c| c.timestamp >= cutoff && c.timestamp <= input.now)
        .collect();

    if burst.len() >= BURST_THRESHOLD {
        let severity = if burst.len() >= BURST_HIGH_THRESHOLD {
            Severity::High
        } else {
            Severity::Medium
        };
        return Some(Finding {
            summary: format!(
                "On a roll: {} commits in the last {BURST_WINDOW_HOURS} hours",
                burst.len()
            ),
            severity,
            reasoning: vec![
                format!(
                    "{} commits landed in the last {BURST_WINDOW_HOURS} hours (burst threshold is {BURST_THRESHOLD}).",
                    burst.len()
                ),
                format!("Total history now stands at {} commits.", input.commits.len()),
            ],
            related_commits: burst.iter().map(|c| c.id).collect(),
        });
    }

    let total = input.commits.len();
    if total > 0 && total % MILESTONE_STEP == 0 {
        return Some(Finding {
            summary: format!("Milestone: {total} commits logged"),
            severity: Severity::Low,
            reasoning: vec![format!(
                "The log just crossed a multiple of {MILESTONE_STEP} with {total} total commits."
            )],
            related_commits: Vec::new(),
        });
    }

    None
}

fn fatigue(input: &RuleInput) -> Option<Finding> {
    if input.commits.len() < EFFORT_WINDOW {
        return None;
    }
    let recent = &input.commits[..EFFORT_WINDOW];
    let mean = recent.iter().map(|c| f64::from(c.effort)).sum::<f64>() / EFFORT_WINDOW as f64;
    if mean <= FATIGUE_MEAN {
        return None;
    }

    let severity = if mean >= FATIGUE_MEAN_HIGH {
        Severity::High
    } else {
        Severity::Medium
    };

    Some(Finding {
        summary: format!(
            "Fatigue risk: average effort {mean:.1} over the last {EFFORT_WINDOW} commits"
        ),
        severity,
        reasoning: vec![
            format!(
                "Mean effort {mean:.1} across your {EFFORT_WINDOW} most recent commits (threshold {FATIGUE_MEAN:.1})."
            ),
            "Sustained high effort is an early burnout signal.".to_string(),
        ],
        related_commits: recent.iter().map(|c| c.id).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn commit(id: i64, hours_ago: i64, category: Category, effort: u8) -> Commit {
        Commit {
            id,
            title: format!("entry {id}"),
            description: None,
            category,
            effort,
            timestamp: now() - Duration::hours(hours_ago),
            repository_id: None,
        }
    }

    fn input(commits: &[Commit]) -> RuleInput<'_> {
        RuleInput {
            commits,
            now: now(),
        }
    }

    #[test]
    fn gap_fires_after_a_quiet_week() {
        let commits = vec![commit(1, 10 * 24, Category::Coding, 3)];
        let finding = activity_gap(&input(&commits)).unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert!(finding.reasoning[0].contains("10 days"));
        assert_eq!(finding.related_commits, vec![1]);

        let fresh = vec![commit(1, 5, Category::Coding, 3)];
        assert!(activity_gap(&input(&fresh)).is_none());
    }

    #[test]
    fn wellbeing_scans_title_and_description() {
        let mut commits = vec![
            commit(1, 1, Category::Coding, 3),
            commit(2, 2, Category::Health, 1),
            commit(3, 3, Category::Coding, 3),
        ];
        commits[1].title = "Felt tired, stopped early".to_string();
        commits[2].description = Some("Could not sleep afterwards".to_string());

        let finding = wellbeing(&input(&commits)).unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.related_commits, vec![2, 3]);
        assert!(finding.reasoning[0].contains("2 of your last 3"));
        assert!(finding.reasoning[0].contains("tired"));
    }

    #[test]
    fn wellbeing_only_scans_recent_commits() {
        let mut commits: Vec<Commit> = (0..12)
            .map(|i| commit(i, i, Category::Coding, 3))
            .collect();
        // outside the 10-commit window
        commits[11].title = "burnout".to_string();
        assert!(wellbeing(&input(&commits)).is_none());
    }

    #[test]
    fn dominant_category_cites_share() {
        // 8 Coding of 10 commits inside the trailing 7 days
        let mut commits: Vec<Commit> = (0..8)
            .map(|i| commit(i, 12 * i, Category::Coding, 3))
            .collect();
        commits.push(commit(8, 100, Category::Learning, 2));
        commits.push(commit(9, 110, Category::Health, 2));

        let finding = dominant_category(&input(&commits)).unwrap();
        assert_eq!(finding.severity, Severity::Medium);
        assert!(finding.summary.contains("Coding"));
        assert!(finding.summary.contains("80%"));
        assert_eq!(finding.reasoning[0], "Coding: 8 of 10 recent commits (80%).");
        assert_eq!(finding.related_commits.len(), 8);
    }

    #[test]
    fn dominant_category_needs_real_concentration() {
        // 7 of 10 is exactly 70%, which does not exceed the threshold
        let mut commits: Vec<Commit> = (0..7)
            .map(|i| commit(i, 10 * i, Category::Coding, 3))
            .collect();
        commits.extend((7..10).map(|i| commit(i, 10 * i, Category::Learning, 3)));
        assert!(dominant_category(&input(&commits)).is_none());
    }

    #[test]
    fn dominant_category_skips_small_windows() {
        let commits = vec![
            commit(1, 1, Category::Coding, 3),
            commit(2, 2, Category::Coding, 3),
        ];
        assert!(dominant_category(&input(&commits)).is_none());
    }

    #[test]
    fn burst_scales_severity_with_margin() {
        let five: Vec<Commit> = (0..5)
            .map(|i| {
                commit(
                    i,
                    i,
                    if i % 2 == 0 { Category::Coding } else { Category::Learning },
                    3,
                )
            })
            .collect();
        let finding = momentum(&input(&five)).unwrap();
        assert_eq!(finding.severity, Severity::Medium);
        assert!(finding.summary.contains("5 commits"));

        let ten: Vec<Commit> = (0..10)
            .map(|i| {
                commit(
                    i,
                    i,
                    if i % 2 == 0 { Category::Coding } else { Category::Learning },
                    3,
                )
            })
            .collect();
        let finding = momentum(&input(&ten)).unwrap();
        assert_eq!(finding.severity, Severity::High);
    }

    #[test]
    fn milestone_fires_on_round_totals() {
        // one commit a day, far enough apart that no burst triggers
        let commits: Vec<Commit> = (0..50)
            .map(|i| {
                commit(
                    i,
                    30 + 24 * i,
                    if i % 2 == 0 { Category::Coding } else { Category::Learning },
                    3,
                )
            })
            .collect();
        let finding = momentum(&input(&commits)).unwrap();
        assert_eq!(finding.severity, Severity::Low);
        assert!(finding.summary.contains("50 commits"));

        let off_milestone = &commits[..49];
        assert!(momentum(&input(off_milestone)).is_none());
    }

    #[test]
    fn fatigue_cites_mean_and_sample_size() {
        let efforts = [5, 5, 4, 5, 5];
        let commits: Vec<Commit> = efforts
            .iter()
            .enumerate()
            .map(|(i, effort)| {
                commit(
                    i as i64,
                    24 * i as i64,
                    if i % 2 == 0 { Category::Coding } else { Category::Learning },
                    *effort,
                )
            })
            .collect();

        let finding = fatigue(&input(&commits)).unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert!(finding.summary.contains("4.8"));
        assert!(finding.reasoning[0].contains("4.8"));
        assert!(finding.reasoning[0].contains('5'));
        assert_eq!(finding.related_commits.len(), 5);
    }

    #[test]
    fn fatigue_medium_below_high_margin() {
        // mean 4.2 sits between the medium and high cut lines
        let efforts = [4, 4, 4, 5, 4];
        let commits: Vec<Commit> = efforts
            .iter()
            .enumerate()
            .map(|(i, effort)| commit(i as i64, 24 * i as i64, Category::Coding, *effort))
            .collect();

        let finding = fatigue(&input(&commits)).unwrap();
        assert_eq!(finding.severity, Severity::Medium);
    }

    #[test]
    fn fatigue_ignores_moderate_effort() {
        let commits: Vec<Commit> = (0..5)
            .map(|i| commit(i, 24 * i, Category::Coding, 3))
            .collect();
        assert!(fatigue(&input(&commits)).is_none());
    }
}
