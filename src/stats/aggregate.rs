use crate::model::{
    Category, CategoryStat, Commit, HeatmapPoint, ProfileStats, RepoSummary, Repository,
    SCHEMA_VERSION,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_WINDOW_DAYS: usize = 365;

/// Dense day-by-day activity calendar: exactly `window_days` points, one
/// per UTC calendar day, ending at `reference_now`'s day, oldest first.
/// Days without commits still appear with a zero count.
pub fn build_heatmap(
    commits: &[Commit],
    reference_now: DateTime<Utc>,
    window_days: usize,
) -> Vec<HeatmapPoint> {
    let end = reference_now.date_naive();
    let Some(start) = end.checked_sub_days(Days::new(window_days.saturating_sub(1) as u64)) else {
        return Vec::new();
    };

    // Sparse counts first, dense materialization second.
    let mut by_day: HashMap<NaiveDate, u32> = HashMap::new();
    for commit in commits {
        let day = commit.day();
        if day < start || day > end {
            continue;
        }
        *by_day.entry(day).or_insert(0) += 1;
    }

    start
        .iter_days()
        .take(window_days)
        .map(|date| {
            let count = by_day.get(&date).copied().unwrap_or(0);
            HeatmapPoint {
                date,
                count,
                level: HeatmapPoint::level_for(count),
            }
        })
        .collect()
}

/// One entry per category present, ordered by count descending, ties by
/// category name. Categories with no commits never appear.
pub fn category_breakdown(commits: &[Commit]) -> Vec<CategoryStat> {
    let mut counts: HashMap<Category, u32> = HashMap::new();
    for commit in commits {
        *counts.entry(commit.category).or_insert(0) += 1;
    }

    let mut stats: Vec<CategoryStat> = counts
        .into_iter()
        .map(|(category, count)| CategoryStat { category, count })
        .collect();
    stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    stats
}

/// One summary per repository, zero-commit repositories included.
/// Commits whose repository_id matches no known repository are
/// unaffiliated and ignored here (they still count in the global
/// breakdowns). Ordered by total commits descending, ties by name.
pub fn repo_summaries(commits: &[Commit], repositories: &[Repository]) -> Vec<RepoSummary> {
    struct RepoAccum {
        total: u32,
        last: Option<DateTime<Utc>>,
        categories: HashMap<Category, u32>,
    }

    let mut accum: HashMap<i64, RepoAccum> = repositories
        .iter()
        .map(|repo| {
            (
                repo.id,
                RepoAccum {
                    total: 0,
                    last: None,
                    categories: HashMap::new(),
                },
            )
        })
        .collect();

    for commit in commits {
        let Some(repo_id) = commit.repository_id else {
            continue;
        };
        let Some(entry) = accum.get_mut(&repo_id) else {
            continue;
        };
        entry.total += 1;
        entry.last = Some(match entry.last {
            Some(prev) => prev.max(commit.timestamp),
            None => commit.timestamp,
        });
        *entry.categories.entry(commit.category).or_insert(0) += 1;
    }

    let mut summaries: Vec<RepoSummary> = repositories
        .iter()
        .map(|repo| {
            let acc = &accum[&repo.id];
            let primary_category = acc
                .categories
                .iter()
                .max_by(|a, b| {
                    a.1.cmp(b.1)
                        .then_with(|| b.0.as_str().cmp(a.0.as_str()))
                })
                .map(|(category, _)| *category);

            RepoSummary {
                id: repo.id,
                name: repo.name.clone(),
                total_commits: acc.total,
                last_activity: acc.last,
                primary_category,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.total_commits
            .cmp(&a.total_commits)
            .then_with(|| a.name.cmp(&b.name))
    });
    summaries
}

/// Number of distinct UTC calendar days with at least one commit.
pub fn active_days(commits: &[Commit]) -> u32 {
    let days: HashSet<NaiveDate> = commits.iter().map(|c| c.day()).collect();
    days.len() as u32
}

pub fn compute_aggregates(
    commits: &[Commit],
    repositories: &[Repository],
    reference_now: DateTime<Utc>,
    window_days: usize,
) -> ProfileStats {
    ProfileStats {
        version: SCHEMA_VERSION,
        generated_at: reference_now,
        window_days,
        total_commits: commits.len() as u64,
        active_days: active_days(commits),
        heatmap: build_heatmap(commits, reference_now, window_days),
        category_breakdown: category_breakdown(commits),
        repo_summaries: repo_summaries(commits, repositories),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn commit(id: i64, timestamp: DateTime<Utc>, category: Category) -> Commit {
        Commit {
            id,
            title: format!("entry {id}"),
            description: None,
            category,
            effort: 3,
            timestamp,
            repository_id: None,
        }
    }

    fn repo(id: i64, name: &str) -> Repository {
        Repository {
            id,
            name: name.to_string(),
            description: None,
            created_at: now() - Duration::days(100),
        }
    }

    #[test]
    fn heatmap_is_dense_and_anchored() {
        let heatmap = build_heatmap(&[], now(), 365);
        assert_eq!(heatmap.len(), 365);
        assert_eq!(heatmap.last().unwrap().date, now().date_naive());
        for pair in heatmap.windows(2) {
            assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
        }
        assert!(heatmap.iter().all(|p| p.count == 0 && p.level == 0));
    }

    #[test]
    fn heatmap_counts_only_window_commits() {
        let commits = vec![
            commit(1, now(), Category::Coding),
            commit(2, now(), Category::Coding),
            commit(3, now() - Duration::days(29), Category::Learning),
            // outside a 30-day window
            commit(4, now() - Duration::days(30), Category::Learning),
            // after the reference instant
            commit(5, now() + Duration::days(2), Category::Other),
        ];

        let heatmap = build_heatmap(&commits, now(), 30);
        assert_eq!(heatmap.len(), 30);
        let total: u32 = heatmap.iter().map(|p| p.count).sum();
        assert_eq!(total, 3);
        assert_eq!(heatmap.last().unwrap().count, 2);
        assert_eq!(heatmap.first().unwrap().count, 1);
    }

    #[test]
    fn identical_timestamps_all_count() {
        let ts = now() - Duration::days(1);
        let commits = vec![
            commit(1, ts, Category::Coding),
            commit(2, ts, Category::Coding),
            commit(3, ts, Category::Coding),
        ];
        let heatmap = build_heatmap(&commits, now(), 7);
        let day = heatmap.iter().find(|p| p.date == ts.date_naive()).unwrap();
        assert_eq!(day.count, 3);
        assert_eq!(day.level, 2);
    }

    #[test]
    fn level_buckets_follow_fixed_policy() {
        assert_eq!(HeatmapPoint::level_for(0), 0);
        assert_eq!(HeatmapPoint::level_for(1), 1);
        assert_eq!(HeatmapPoint::level_for(2), 1);
        assert_eq!(HeatmapPoint::level_for(3), 2);
        assert_eq!(HeatmapPoint::level_for(5), 2);
        assert_eq!(HeatmapPoint::level_for(6), 3);
        assert_eq!(HeatmapPoint::level_for(40), 3);
    }

    #[test]
    fn breakdown_sums_and_orders() {
        let commits = vec![
            commit(1, now(), Category::Coding),
            commit(2, now(), Category::Coding),
            commit(3, now(), Category::Learning),
            commit(4, now(), Category::Health),
            commit(5, now(), Category::Health),
        ];

        let breakdown = category_breakdown(&commits);
        let total: u32 = breakdown.iter().map(|s| s.count).sum();
        assert_eq!(total, commits.len() as u32);
        assert!(breakdown.iter().all(|s| s.count > 0));

        // Coding and Health tie at 2; Coding sorts first by name.
        assert_eq!(breakdown[0].category, Category::Coding);
        assert_eq!(breakdown[1].category, Category::Health);
        assert_eq!(breakdown[2].category, Category::Learning);
    }

    #[test]
    fn empty_input_is_a_normal_state() {
        let stats = compute_aggregates(&[], &[], now(), 365);
        assert_eq!(stats.heatmap.len(), 365);
        assert_eq!(stats.total_commits, 0);
        assert_eq!(stats.active_days, 0);
        assert!(stats.category_breakdown.is_empty());
        assert!(stats.repo_summaries.is_empty());
    }

    #[test]
    fn summaries_cover_every_repository() {
        let repos = vec![repo(1, "learning-dsa"), repo(2, "blog")];
        let mut commits = vec![
            commit(1, now() - Duration::days(3), Category::Learning),
            commit(2, now() - Duration::days(1), Category::Coding),
            commit(3, now(), Category::Learning),
        ];
        commits[0].repository_id = Some(1);
        commits[1].repository_id = Some(1);
        commits[2].repository_id = Some(1);

        let summaries = repo_summaries(&commits, &repos);
        assert_eq!(summaries.len(), 2);

        let dsa = &summaries[0];
        assert_eq!(dsa.name, "learning-dsa");
        assert_eq!(dsa.total_commits, 3);
        assert_eq!(dsa.last_activity, Some(now()));
        assert_eq!(dsa.primary_category, Some(Category::Learning));

        let blog = &summaries[1];
        assert_eq!(blog.total_commits, 0);
        assert_eq!(blog.last_activity, None);
        assert_eq!(blog.primary_category, None);
    }

    #[test]
    fn primary_category_tie_breaks_by_name() {
        let repos = vec![repo(1, "mixed")];
        let mut commits = vec![
            commit(1, now(), Category::Learning),
            commit(2, now(), Category::Coding),
        ];
        commits[0].repository_id = Some(1);
        commits[1].repository_id = Some(1);

        let summaries = repo_summaries(&commits, &repos);
        assert_eq!(summaries[0].primary_category, Some(Category::Coding));
    }

    #[test]
    fn unknown_repository_id_is_unaffiliated() {
        let repos = vec![repo(1, "kept")];
        let mut commits = vec![
            commit(1, now(), Category::Coding),
            commit(2, now() - Duration::days(1), Category::Coding),
            commit(3, now() - Duration::days(2), Category::Coding),
        ];
        // repository 5 was deleted; its commits linger
        commits[0].repository_id = Some(5);
        commits[1].repository_id = Some(5);
        commits[2].repository_id = Some(5);

        let summaries = repo_summaries(&commits, &repos);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_commits, 0);

        // still visible globally
        assert_eq!(category_breakdown(&commits)[0].count, 3);
        assert_eq!(active_days(&commits), 3);
    }

    #[test]
    fn active_days_dedupes_calendar_days() {
        let commits = vec![
            commit(1, now(), Category::Coding),
            commit(2, now() - Duration::hours(2), Category::Learning),
            commit(3, now() - Duration::days(1), Category::Coding),
        ];
        assert_eq!(active_days(&commits), 2);
    }
}
