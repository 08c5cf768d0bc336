//! Dashboard-ready view of an [`OrgResult`].
//!
//! Joins the aggregated data with the [`StatusClassifier`] and the relative
//! time formatter so a presentation layer only has to lay out fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classifier::{Severity, StatusClassifier};
use crate::model::{OrgResult, RepoResult};
use crate::reltime::format_relative;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowRow {
    pub name: String,
    pub url: Option<String>,
    /// Raw normalized token, e.g. `"in_progress"`.
    pub status: String,
    pub severity: Severity,
    pub icon: String,
    pub age: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoSummary {
    pub name: String,
    pub url: String,
    pub commit: String,
    pub commit_url: String,
    /// Most severe bucket across the repo's workflows.
    pub severity: Severity,
    pub icon: String,
    /// Age of the newest workflow run.
    pub age: String,
    pub workflows: Vec<WorkflowRow>,
}

impl RepoSummary {
    pub fn build(repo: &RepoResult, classifier: &StatusClassifier, now: DateTime<Utc>) -> Self {
        let severity = classifier.repo_severity(repo);
        let workflows = repo
            .workflows
            .iter()
            .map(|w| {
                let severity = classifier.classify(&w.status);
                WorkflowRow {
                    name: w.name.clone(),
                    url: w.url.clone(),
                    status: w.status.clone(),
                    severity,
                    icon: classifier.icon(severity).to_string(),
                    age: format_relative(w.created_at, now),
                }
            })
            .collect();

        Self {
            name: repo.name.clone(),
            url: repo.url.clone(),
            commit: repo.commit.clone(),
            commit_url: repo.commit_url.clone(),
            severity,
            icon: classifier.icon(severity).to_string(),
            age: repo
                .newest_run_at()
                .map(|ts| format_relative(ts, now))
                .unwrap_or_default(),
            workflows,
        }
    }
}

/// Per-organization view with bucket counts.
#[derive(Debug, Clone, Serialize)]
pub struct OrgSummary {
    pub org_name: String,
    pub generated_at: DateTime<Utc>,
    /// Same order as [`OrgResult::repos`].
    pub repos: Vec<RepoSummary>,
    pub counts: BTreeMap<String, usize>,
}

impl OrgSummary {
    pub fn build(result: &OrgResult, classifier: &StatusClassifier, now: DateTime<Utc>) -> Self {
        let repos: Vec<RepoSummary> = result
            .repos
            .iter()
            .map(|repo| RepoSummary::build(repo, classifier, now))
            .collect();

        let mut counts = BTreeMap::new();
        for repo in &repos {
            *counts.entry(repo.severity.as_str().to_string()).or_insert(0) += 1;
        }

        Self {
            org_name: result.org_name.clone(),
            generated_at: now,
            repos,
            counts,
        }
    }

    /// Number of repos whose overall bucket is `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.counts.get(severity.as_str()).copied().unwrap_or(0)
    }

    /// `true` when there is at least one repo and every repo passed.
    pub fn all_passing(&self) -> bool {
        !self.repos.is_empty() && self.repos.iter().all(|r| r.severity == Severity::Passed)
    }
}
