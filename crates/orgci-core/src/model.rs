//! Aggregated CI results handed to the presentation layer.
//!
//! All three types are built once per request and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The latest run of one workflow on a repo's head commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowResult {
    /// Workflow name as defined in the workflow file.
    pub name: String,
    /// Link to the workflow run, when the platform supplied one.
    pub url: Option<String>,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
    /// Lower-cased conclusion, or status when there is no conclusion yet.
    pub status: String,
}

/// CI state of a single repository's head commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoResult {
    pub name: String,
    pub url: String,
    /// Abbreviated commit id of the resolved branch head.
    pub commit: String,
    pub commit_url: String,
    /// Never empty; sorted newest first.
    pub workflows: Vec<WorkflowResult>,
}

impl RepoResult {
    /// Oldest workflow creation time. This is the repo ordering key.
    pub fn oldest_run_at(&self) -> Option<DateTime<Utc>> {
        self.workflows.iter().map(|w| w.created_at).min()
    }

    /// Newest workflow creation time.
    pub fn newest_run_at(&self) -> Option<DateTime<Utc>> {
        self.workflows.iter().map(|w| w.created_at).max()
    }
}

/// CI state for every displayable repository of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgResult {
    pub org_name: String,
    /// Sorted by [`RepoResult::oldest_run_at`], newest first.
    pub repos: Vec<RepoResult>,
}

impl OrgResult {
    pub fn repo(&self, name: &str) -> Option<&RepoResult> {
        self.repos.iter().find(|r| r.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wf(name: &str, secs: i64) -> WorkflowResult {
        WorkflowResult {
            name: name.to_string(),
            url: None,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            status: "success".to_string(),
        }
    }

    #[test]
    fn test_oldest_and_newest_run() {
        let repo = RepoResult {
            name: "api".to_string(),
            url: "https://github.com/acme/api".to_string(),
            commit: "abc1234".to_string(),
            commit_url: "https://github.com/acme/api/commit/abc1234".to_string(),
            workflows: vec![wf("ci", 300), wf("lint", 100), wf("docs", 200)],
        };
        assert_eq!(repo.oldest_run_at(), Some(Utc.timestamp_opt(100, 0).unwrap()));
        assert_eq!(repo.newest_run_at(), Some(Utc.timestamp_opt(300, 0).unwrap()));
    }

    #[test]
    fn test_serializes_timestamps_as_rfc3339() {
        let json = serde_json::to_value(wf("ci", 0)).unwrap();
        assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");
        assert!(json["url"].is_null());
    }
}
