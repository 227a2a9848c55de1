use crate::error::MindlogError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Coding,
    Learning,
    Health,
    Meeting,
    Planning,
    Other,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Coding => "Coding",
            Category::Learning => "Learning",
            Category::Health => "Health",
            Category::Meeting => "Meeting",
            Category::Planning => "Planning",
            Category::Other => "Other",
            Category::General => "General",
        }
    }

    /// Lenient variant for rows written by older versions, which used
    /// retired names like "Study" or "Wellbeing". Unknown names land in
    /// the General bucket instead of failing the whole query.
    pub fn from_store(s: &str) -> Category {
        Category::from_str(s).unwrap_or(Category::General)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MindlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coding" => Ok(Category::Coding),
            "learning" => Ok(Category::Learning),
            "health" => Ok(Category::Health),
            "meeting" => Ok(Category::Meeting),
            "planning" => Ok(Category::Planning),
            "other" => Ok(Category::Other),
            "general" => Ok(Category::General),
            _ => Err(MindlogError::Parse(format!(
                "Unknown category '{s}' (expected coding, learning, health, meeting, planning, other, or general)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = MindlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(MindlogError::Parse(format!("Unknown severity '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub effort: u8,
    pub timestamp: DateTime<Utc>,
    pub repository_id: Option<i64>,
}

impl Commit {
    /// UTC calendar day this commit falls on. Day boundaries are UTC
    /// everywhere in the crate.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
}

impl HeatmapPoint {
    /// Bucket a daily commit count into a display level. Thresholds are
    /// fixed policy: 0, 1-2, 3-5, 6+.
    pub fn level_for(count: u32) -> u8 {
        match count {
            0 => 0,
            1..=2 => 1,
            3..=5 => 2,
            _ => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: Category,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    pub id: i64,
    pub name: String,
    pub total_commits: u32,
    pub last_activity: Option<DateTime<Utc>>,
    pub primary_category: Option<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileStats {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub window_days: usize,
    pub total_commits: u64,
    pub active_days: u32,
    pub heatmap: Vec<HeatmapPoint>,
    pub category_breakdown: Vec<CategoryStat>,
    pub repo_summaries: Vec<RepoSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub summary: String,
    pub severity: Severity,
    pub reasoning: Vec<String>,
    pub related_commits: Vec<i64>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub cached: bool,
    pub insight: Insight,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub category: Option<String>,
    pub repository: Option<String>,
    pub search: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub entries: Vec<Commit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoListOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repositories: Vec<Repository>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repositories: Vec<Repository>,
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, Default)]
pub struct CommitFilter {
    pub category: Option<Category>,
    pub repository_id: Option<i64>,
    pub search: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct NewCommit {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub effort: u8,
    pub timestamp: DateTime<Utc>,
    pub repository_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CommitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub effort: Option<u8>,
    pub timestamp: Option<DateTime<Utc>>,
}
