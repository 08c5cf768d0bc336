//! Flattens nested repository → branch → commit → check-suite data into
//! [`WorkflowResult`] rows.
//!
//! Missing data is never an error here. A repo that cannot produce at least
//! one workflow row is reported as a [`SkipReason`] and dropped by the caller.

use std::collections::HashSet;
use std::fmt;

use crate::gateway::wire::{BranchRef, CheckSuiteNode, CommitNode, RepositoryNode};
use crate::model::WorkflowResult;

/// Status stored when a check suite reports neither conclusion nor status.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Caller-supplied rules deciding which repositories are hidden.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    repos: HashSet<String>,
    skip_archived: bool,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            repos: HashSet::new(),
            skip_archived: true,
        }
    }
}

impl ExclusionRules {
    /// Exclude the given repository names (exact match).
    pub fn new<I, S>(repos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            repos: repos.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Whether archived repositories are hidden (default `true`).
    pub fn with_skip_archived(mut self, skip_archived: bool) -> Self {
        self.skip_archived = skip_archived;
        self
    }

    pub fn is_excluded(&self, repo: &str) -> bool {
        self.repos.contains(repo)
    }

    pub fn skips_archived(&self) -> bool {
        self.skip_archived
    }
}

/// Why a repository produced no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Excluded,
    Archived,
    /// No candidate branch resolved to a commit.
    NoBranch,
    /// The head commit has no check-suite list, or an empty one.
    NoCheckSuites,
    /// Check suites exist but none has a workflow run attached yet.
    NoWorkflowRuns,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excluded => "excluded",
            Self::Archived => "archived",
            Self::NoBranch => "no_branch",
            Self::NoCheckSuites => "no_check_suites",
            Self::NoWorkflowRuns => "no_workflow_runs",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow rows for one repository's resolved head commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRepo {
    pub branch: String,
    pub commit: String,
    pub commit_url: String,
    /// Never empty; sorted newest first.
    pub workflows: Vec<WorkflowResult>,
}

/// Branch candidates in resolution order: default branch, `main`, `master`.
pub fn branch_candidates(repo: &RepositoryNode) -> [Option<&BranchRef>; 3] {
    [
        repo.default_branch_ref.as_ref(),
        repo.main.as_ref(),
        repo.master.as_ref(),
    ]
}

/// First candidate whose head commit resolves.
pub fn resolve_branch<'a, I>(candidates: I) -> Option<&'a BranchRef>
where
    I: IntoIterator<Item = Option<&'a BranchRef>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|branch| branch.head_commit().is_some())
}

/// Conclusion when present, otherwise status, lower-cased.
pub fn effective_status(status: Option<&str>, conclusion: Option<&str>) -> String {
    non_blank(conclusion)
        .or_else(|| non_blank(status))
        .unwrap_or(UNKNOWN_STATUS)
        .to_lowercase()
}

fn non_blank(token: Option<&str>) -> Option<&str> {
    token.map(str::trim).filter(|t| !t.is_empty())
}

/// Row for one check suite, or `None` while no workflow run is attached.
pub fn normalize_check_suite(suite: &CheckSuiteNode) -> Option<WorkflowResult> {
    let run = suite.workflow_run.as_ref()?;
    let workflow = run.workflow.as_ref()?;
    Some(WorkflowResult {
        name: workflow.name.clone(),
        url: run.url.clone(),
        created_at: run.created_at,
        status: effective_status(suite.status.as_deref(), suite.conclusion.as_deref()),
    })
}

/// Rows for every check suite of `commit`, newest first.
pub fn normalize_commit(commit: &CommitNode) -> Result<Vec<WorkflowResult>, SkipReason> {
    let suites = match &commit.check_suites {
        Some(conn) if !conn.nodes.is_empty() => &conn.nodes,
        _ => return Err(SkipReason::NoCheckSuites),
    };

    let mut workflows: Vec<WorkflowResult> =
        suites.iter().filter_map(normalize_check_suite).collect();
    if workflows.is_empty() {
        return Err(SkipReason::NoWorkflowRuns);
    }
    workflows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(workflows)
}

/// Apply exclusion rules, resolve the branch and flatten its check suites.
pub fn normalize_repo(
    repo: &RepositoryNode,
    rules: &ExclusionRules,
) -> Result<NormalizedRepo, SkipReason> {
    if rules.is_excluded(&repo.name) {
        return Err(SkipReason::Excluded);
    }
    if repo.is_archived && rules.skips_archived() {
        return Err(SkipReason::Archived);
    }

    let branch = resolve_branch(branch_candidates(repo)).ok_or(SkipReason::NoBranch)?;
    let commit = branch.head_commit().ok_or(SkipReason::NoBranch)?;
    let workflows = normalize_commit(commit)?;

    Ok(NormalizedRepo {
        branch: branch.name.clone(),
        commit: commit.abbreviated_oid.clone().unwrap_or_default(),
        commit_url: commit.commit_url.clone().unwrap_or_default(),
        workflows,
    })
}
