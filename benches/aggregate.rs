use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use mindlog::model::{Category, Commit, Repository};
use mindlog::stats::{build_heatmap, category_breakdown, compute_aggregates};
use std::hint::black_box;

fn synthetic_commits(n: usize) -> (Vec<Commit>, DateTime<Utc>) {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let categories = [
        Category::Coding,
        Category::Learning,
        Category::Health,
        Category::Planning,
        Category::Other,
    ];

    let commits: Vec<Commit> = (0..n)
        .map(|i| Commit {
            id: i as i64 + 1,
            title: format!("entry {i}"),
            description: None,
            category: categories[i % categories.len()],
            effort: (i % 5) as u8 + 1,
            timestamp: base + Duration::hours(i as i64 * 7),
            repository_id: Some((i % 3) as i64 + 1),
        })
        .collect();
    let now = commits.last().map(|c| c.timestamp).unwrap_or(base);
    (commits, now)
}

fn synthetic_repos() -> Vec<Repository> {
    (1..=3)
        .map(|id| Repository {
            id,
            name: format!("repo-{id}"),
            description: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        })
        .collect()
}

fn bench_build_heatmap_5k(c: &mut Criterion) {
    let (commits, now) = synthetic_commits(5_000);

    c.bench_function("build_heatmap_5k", |b| {
        b.iter(|| build_heatmap(black_box(&commits), now, 365));
    });
}

fn bench_category_breakdown_5k(c: &mut Criterion) {
    let (commits, _) = synthetic_commits(5_000);

    c.bench_function("category_breakdown_5k", |b| {
        b.iter(|| category_breakdown(black_box(&commits)));
    });
}

fn bench_compute_aggregates_5k(c: &mut Criterion) {
    let (commits, now) = synthetic_commits(5_000);
    let repos = synthetic_repos();

    c.bench_function("compute_aggregates_5k", |b| {
        b.iter(|| compute_aggregates(black_box(&commits), &repos, now, 365));
    });
}

fn bench_insight_evaluate_5k(c: &mut Criterion) {
    let (commits, now) = synthetic_commits(5_000);

    c.bench_function("insight_evaluate_5k", |b| {
        b.iter(|| mindlog::insight::evaluate(black_box(&commits), now));
    });
}

criterion_group!(
    benches,
    bench_build_heatmap_5k,
    bench_category_breakdown_5k,
    bench_compute_aggregates_5k,
    bench_insight_evaluate_5k
);
criterion_main!(benches);
