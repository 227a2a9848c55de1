use crate::error::{MindlogError, Result};
use crate::model::{
    Category, Commit, CommitFilter, CommitPatch, Insight, NewCommit, Repository, Severity,
    SCHEMA_VERSION,
};
use chrono::{TimeZone, Utc};
use rusqlite::{params, Connection, ToSql};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct Store {
    conn: Connection,
}

/// Default store location: `<data dir>/mindlog/mindlog.db`.
pub fn default_path() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| {
        MindlogError::Store("Could not determine a data directory; pass --store".to_string())
    })?;
    Ok(base.join("mindlog").join("mindlog.db"))
}

impl Store {
    /// Open (or create) the store at `path`, or at the default data
    /// location if `None`.
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let db_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => default_path()?,
        };
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&db_path)?;
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS repositories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                created_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS commits (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                category TEXT NOT NULL,
                effort INTEGER NOT NULL CHECK (effort BETWEEN 1 AND 5),
                timestamp INTEGER NOT NULL,
                repository_id INTEGER REFERENCES repositories(id)
            );
            CREATE TABLE IF NOT EXISTS insights (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                summary TEXT NOT NULL,
                severity TEXT NOT NULL,
                reasoning TEXT NOT NULL,
                related_commits TEXT NOT NULL,
                generated_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_commits_timestamp ON commits(timestamp);
            CREATE INDEX IF NOT EXISTS idx_commits_category ON commits(category);
            CREATE INDEX IF NOT EXISTS idx_commits_repository ON commits(repository_id);
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != SCHEMA_VERSION as i64 {
            return Err(MindlogError::Store(format!(
                "Schema version mismatch: expected {}, found {}",
                SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    pub fn add_commit(&mut self, new: &NewCommit) -> Result<Commit> {
        // Store unix seconds; hand back the truncated timestamp so the
        // returned value matches what a later read will see.
        let secs = new.timestamp.timestamp();
        self.conn.execute(
            "INSERT INTO commits (title, description, category, effort, timestamp, repository_id)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                new.title,
                new.description,
                new.category.as_str(),
                new.effort,
                secs,
                new.repository_id,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(Commit {
            id,
            title: new.title.clone(),
            description: new.description.clone(),
            category: new.category,
            effort: new.effort,
            timestamp: restore_timestamp(secs)?,
            repository_id: new.repository_id,
        })
    }

    pub fn get_commit(&self, id: i64) -> Result<Option<Commit>> {
        let result = self.conn.query_row(
            "SELECT id, title, description, category, effort, timestamp, repository_id
             FROM commits WHERE id = ?",
            params![id],
            row_to_commit,
        );
        match result {
            Ok(commit) => Ok(Some(commit)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_commit(&mut self, id: i64, patch: &CommitPatch) -> Result<Commit> {
        let mut commit = self
            .get_commit(id)?
            .ok_or_else(|| MindlogError::NotFound(format!("No commit with id {id}")))?;

        if let Some(title) = &patch.title {
            commit.title = title.clone();
        }
        if let Some(description) = &patch.description {
            commit.description = Some(description.clone());
        }
        if let Some(category) = patch.category {
            commit.category = category;
        }
        if let Some(effort) = patch.effort {
            commit.effort = effort;
        }
        if let Some(timestamp) = patch.timestamp {
            commit.timestamp = restore_timestamp(timestamp.timestamp())?;
        }

        self.conn.execute(
            "UPDATE commits SET title = ?, description = ?, category = ?, effort = ?, timestamp = ?
             WHERE id = ?",
            params![
                commit.title,
                commit.description,
                commit.category.as_str(),
                commit.effort,
                commit.timestamp.timestamp(),
                id,
            ],
        )?;
        Ok(commit)
    }

    pub fn delete_commit(&mut self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM commits WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(MindlogError::NotFound(format!("No commit with id {id}")));
        }
        Ok(())
    }

    pub fn list_commits(&self, filter: &CommitFilter) -> Result<Vec<Commit>> {
        let mut query = String::from(
            "SELECT id, title, description, category, effort, timestamp, repository_id
             FROM commits
             WHERE 1=1",
        );
        let mut to_bind: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(category) = filter.category {
            query.push_str(" AND category = ?");
            to_bind.push(Box::new(category.as_str().to_string()));
        }
        if let Some(repo_id) = filter.repository_id {
            query.push_str(" AND repository_id = ?");
            to_bind.push(Box::new(repo_id));
        }
        if let Some(search) = &filter.search {
            query.push_str(" AND (title LIKE ? OR description LIKE ?)");
            let pattern = format!("%{search}%");
            to_bind.push(Box::new(pattern.clone()));
            to_bind.push(Box::new(pattern));
        }
        if let Some(since) = &filter.since {
            query.push_str(" AND timestamp >= ?");
            to_bind.push(Box::new(since.timestamp()));
        }
        if let Some(until) = &filter.until {
            query.push_str(" AND timestamp <= ?");
            to_bind.push(Box::new(until.timestamp()));
        }
        query.push_str(" ORDER BY timestamp DESC, id DESC");
        if let Some(limit) = filter.limit {
            query.push_str(" LIMIT ?");
            to_bind.push(Box::new(limit));
        }

        let mut stmt = self.conn.prepare(&query)?;
        let bind_refs: Vec<&dyn ToSql> = to_bind.iter().map(|b| b.as_ref()).collect();
        let rows = stmt.query_map(bind_refs.as_slice(), row_to_commit)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn count_commits(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM commits", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn add_repository(&mut self, name: &str, description: Option<&str>) -> Result<Repository> {
        let created_at = restore_timestamp(Utc::now().timestamp())?;
        let result = self.conn.execute(
            "INSERT INTO repositories (name, description, created_at) VALUES (?, ?, ?)",
            params![name, description, created_at.timestamp()],
        );
        match result {
            Ok(_) => Ok(Repository {
                id: self.conn.last_insert_rowid(),
                name: name.to_string(),
                description: description.map(|d| d.to_string()),
                created_at,
            }),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(MindlogError::Store(format!("Repository '{name}' already exists")))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_repository_by_name(&self, name: &str) -> Result<Option<Repository>> {
        let result = self.conn.query_row(
            "SELECT id, name, description, created_at FROM repositories WHERE name = ?",
            params![name],
            row_to_repository,
        );
        match result {
            Ok(repo) => Ok(Some(repo)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_repositories(&self) -> Result<Vec<Repository>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, created_at FROM repositories ORDER BY name",
        )?;
        let rows = stmt.query_map([], row_to_repository)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Delete a repository. Its commits are orphaned (repository_id set
    /// to NULL) unless `with_commits` is set, in which case they are
    /// deleted too. Returns the number of commits affected.
    pub fn delete_repository(&mut self, name: &str, with_commits: bool) -> Result<usize> {
        let repo = self
            .get_repository_by_name(name)?
            .ok_or_else(|| MindlogError::NotFound(format!("No repository named '{name}'")))?;

        let tx = self.conn.transaction()?;
        let affected = if with_commits {
            tx.execute("DELETE FROM commits WHERE repository_id = ?", params![repo.id])?
        } else {
            tx.execute(
                "UPDATE commits SET repository_id = NULL WHERE repository_id = ?",
                params![repo.id],
            )?
        };
        tx.execute("DELETE FROM repositories WHERE id = ?", params![repo.id])?;
        tx.commit()?;
        Ok(affected)
    }

    pub fn load_insight(&self) -> Result<Option<Insight>> {
        let result = self.conn.query_row(
            "SELECT summary, severity, reasoning, related_commits, generated_at
             FROM insights WHERE id = 1",
            [],
            |row| {
                let severity_text: String = row.get(1)?;
                let severity = Severity::from_str(&severity_text).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        1,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;

                let reasoning_json: String = row.get(2)?;
                let reasoning: Vec<String> =
                    serde_json::from_str(&reasoning_json).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            2,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;

                let related_json: String = row.get(3)?;
                let related_commits: Vec<i64> =
                    serde_json::from_str(&related_json).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;

                let ts: i64 = row.get(4)?;
                let generated_at = Utc.timestamp_opt(ts, 0).single().ok_or_else(|| {
                    rusqlite::Error::InvalidColumnType(
                        4,
                        "generated_at".to_string(),
                        rusqlite::types::Type::Integer,
                    )
                })?;

                Ok(Insight {
                    summary: row.get(0)?,
                    severity,
                    reasoning,
                    related_commits,
                    generated_at,
                })
            },
        );
        match result {
            Ok(insight) => Ok(Some(insight)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn store_insight(&mut self, insight: &Insight) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO insights (id, summary, severity, reasoning, related_commits, generated_at)
             VALUES (1, ?, ?, ?, ?, ?)",
            params![
                insight.summary,
                insight.severity.as_str(),
                serde_json::to_string(&insight.reasoning)?,
                serde_json::to_string(&insight.related_commits)?,
                insight.generated_at.timestamp(),
            ],
        )?;
        Ok(())
    }

    pub fn is_empty(&self) -> Result<bool> {
        let repos: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM repositories", [], |row| row.get(0))?;
        Ok(repos == 0 && self.count_commits()? == 0)
    }
}

fn restore_timestamp(secs: i64) -> Result<chrono::DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| MindlogError::Store(format!("Invalid timestamp: {secs}")))
}

fn row_to_commit(row: &rusqlite::Row<'_>) -> rusqlite::Result<Commit> {
    let ts: i64 = row.get(5)?;
    let timestamp = Utc.timestamp_opt(ts, 0).single().ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(5, "timestamp".to_string(), rusqlite::types::Type::Integer)
    })?;
    let category: String = row.get(3)?;

    Ok(Commit {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: Category::from_store(&category),
        effort: row.get(4)?,
        timestamp,
        repository_id: row.get(6)?,
    })
}

fn row_to_repository(row: &rusqlite::Row<'_>) -> rusqlite::Result<Repository> {
    let ts: i64 = row.get(3)?;
    let created_at = Utc.timestamp_opt(ts, 0).single().ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(3, "created_at".to_string(), rusqlite::types::Type::Integer)
    })?;

    Ok(Repository {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn open_temp() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(Some(dir.path().join("test.db"))).unwrap();
        (dir, store)
    }

    fn sample(title: &str, category: Category, offset_hours: i64) -> NewCommit {
        NewCommit {
            title: title.to_string(),
            description: None,
            category,
            effort: 3,
            timestamp: Utc::now() - Duration::hours(offset_hours),
            repository_id: None,
        }
    }

    #[test]
    fn commit_round_trip() {
        let (_dir, mut store) = open_temp();
        let created = store.add_commit(&sample("read a paper", Category::Learning, 1)).unwrap();
        let fetched = store.get_commit(created.id).unwrap().unwrap();
        assert_eq!(fetched.title, "read a paper");
        assert_eq!(fetched.category, Category::Learning);
        assert_eq!(fetched.timestamp, created.timestamp);
    }

    #[test]
    fn missing_commit_is_none() {
        let (_dir, store) = open_temp();
        assert!(store.get_commit(42).unwrap().is_none());
    }

    #[test]
    fn update_is_partial() {
        let (_dir, mut store) = open_temp();
        let created = store.add_commit(&sample("draft", Category::Coding, 2)).unwrap();

        let patch = CommitPatch {
            effort: Some(5),
            ..Default::default()
        };
        let updated = store.update_commit(created.id, &patch).unwrap();
        assert_eq!(updated.effort, 5);
        assert_eq!(updated.title, "draft");
        assert_eq!(updated.timestamp, created.timestamp);
    }

    #[test]
    fn delete_missing_commit_errors() {
        let (_dir, mut store) = open_temp();
        assert!(matches!(
            store.delete_commit(7),
            Err(MindlogError::NotFound(_))
        ));
    }

    #[test]
    fn list_filters_category_and_search() {
        let (_dir, mut store) = open_temp();
        store.add_commit(&sample("fix parser bug", Category::Coding, 3)).unwrap();
        store.add_commit(&sample("gym session", Category::Health, 2)).unwrap();
        store
            .add_commit(&NewCommit {
                description: Some("parser rewrite notes".to_string()),
                ..sample("evening review", Category::Coding, 1)
            })
            .unwrap();

        let coding = store
            .list_commits(&CommitFilter {
                category: Some(Category::Coding),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(coding.len(), 2);

        let parser = store
            .list_commits(&CommitFilter {
                search: Some("parser".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(parser.len(), 2);

        // newest first
        let all = store.list_commits(&CommitFilter::default()).unwrap();
        assert_eq!(all[0].title, "evening review");
        assert_eq!(all[2].title, "fix parser bug");
    }

    #[test]
    fn list_respects_limit_and_range() {
        let (_dir, mut store) = open_temp();
        for i in 0..5 {
            store.add_commit(&sample(&format!("entry {i}"), Category::Other, i * 24)).unwrap();
        }

        let limited = store
            .list_commits(&CommitFilter {
                limit: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(limited.len(), 2);

        let recent = store
            .list_commits(&CommitFilter {
                since: Some(Utc::now() - Duration::hours(30)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn duplicate_repository_name_rejected() {
        let (_dir, mut store) = open_temp();
        store.add_repository("learning-dsa", None).unwrap();
        let err = store.add_repository("learning-dsa", Some("again"));
        assert!(matches!(err, Err(MindlogError::Store(_))));
    }

    #[test]
    fn repo_delete_orphans_by_default() {
        let (_dir, mut store) = open_temp();
        let repo = store.add_repository("sideproject", None).unwrap();
        store
            .add_commit(&NewCommit {
                repository_id: Some(repo.id),
                ..sample("wired up ci", Category::Coding, 1)
            })
            .unwrap();

        let affected = store.delete_repository("sideproject", false).unwrap();
        assert_eq!(affected, 1);
        assert_eq!(store.count_commits().unwrap(), 1);
        let all = store.list_commits(&CommitFilter::default()).unwrap();
        assert_eq!(all[0].repository_id, None);
    }

    #[test]
    fn repo_delete_with_commits_cascades() {
        let (_dir, mut store) = open_temp();
        let repo = store.add_repository("scratch", None).unwrap();
        store
            .add_commit(&NewCommit {
                repository_id: Some(repo.id),
                ..sample("throwaway", Category::Other, 1)
            })
            .unwrap();

        let affected = store.delete_repository("scratch", true).unwrap();
        assert_eq!(affected, 1);
        assert_eq!(store.count_commits().unwrap(), 0);
    }

    #[test]
    fn insight_cache_round_trip() {
        let (_dir, mut store) = open_temp();
        assert!(store.load_insight().unwrap().is_none());

        let insight = Insight {
            summary: "Steady progress.".to_string(),
            severity: Severity::Low,
            reasoning: vec!["Looks fine.".to_string()],
            related_commits: vec![1, 2],
            generated_at: restore_timestamp(Utc::now().timestamp()).unwrap(),
        };
        store.store_insight(&insight).unwrap();
        let loaded = store.load_insight().unwrap().unwrap();
        assert_eq!(loaded, insight);

        // replaces, never accumulates
        store.store_insight(&insight).unwrap();
        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM insights", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn legacy_category_reads_as_general() {
        let (_dir, mut store) = open_temp();
        store
            .conn
            .execute(
                "INSERT INTO commits (title, description, category, effort, timestamp)
                 VALUES ('old entry', NULL, 'Wellbeing', 2, ?)",
                params![Utc::now().timestamp()],
            )
            .unwrap();
        let all = store.list_commits(&CommitFilter::default()).unwrap();
        assert_eq!(all[0].category, Category::General);
    }

    #[test]
    fn schema_version_mismatch_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        {
            let store = Store::open(Some(&path)).unwrap();
            store.conn.execute_batch("PRAGMA user_version = 99;").unwrap();
        }
        assert!(matches!(
            Store::open(Some(&path)),
            Err(MindlogError::Store(_))
        ));
    }
}
