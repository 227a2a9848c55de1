pub mod aggregate;
pub mod exec;
pub mod output;

pub use aggregate::{
    active_days, build_heatmap, category_breakdown, compute_aggregates, repo_summaries,
    DEFAULT_WINDOW_DAYS,
};
pub use exec::exec;
pub use output::{output_json, output_ndjson, output_profile};
