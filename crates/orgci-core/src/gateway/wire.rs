//! Decoded shape of the organization check-suite query.
//!
//! Every nested level is optional: GitHub returns `null` for empty repos,
//! for refs that do not exist, and for check suites without a workflow run.
//! Null entries inside `nodes` lists are dropped while decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A GraphQL connection reduced to its `nodes` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default = "Vec::new", deserialize_with = "non_null_nodes")]
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

fn non_null_nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let nodes: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(nodes.unwrap_or_default().into_iter().flatten().collect())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgNode {
    pub login: String,
    /// Display name; many organizations leave it unset.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub repositories: Connection<RepositoryNode>,
}

impl OrgNode {
    /// Display name, falling back to the login.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.login.as_str(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub default_branch_ref: Option<BranchRef>,
    /// `refs/heads/main`, queried as a fallback candidate.
    #[serde(default)]
    pub main: Option<BranchRef>,
    /// `refs/heads/master`, queried as a fallback candidate.
    #[serde(default)]
    pub master: Option<BranchRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchRef {
    pub name: String,
    /// Empty object when the ref points at something other than a commit.
    #[serde(default)]
    pub target: Option<CommitNode>,
}

impl BranchRef {
    /// Head commit, when it carries both an id and a URL.
    pub fn head_commit(&self) -> Option<&CommitNode> {
        self.target
            .as_ref()
            .filter(|c| c.abbreviated_oid.is_some() && c.commit_url.is_some())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    #[serde(default)]
    pub abbreviated_oid: Option<String>,
    #[serde(default)]
    pub commit_url: Option<String>,
    #[serde(default)]
    pub check_suites: Option<Connection<CheckSuiteNode>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSuiteNode {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub workflow_run: Option<WorkflowRunNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunNode {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub workflow: Option<WorkflowNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowNode {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_nodes_are_dropped() {
        let conn: Connection<WorkflowNode> =
            serde_json::from_value(json!({ "nodes": [null, { "name": "ci" }, null] })).unwrap();
        assert_eq!(conn.nodes.len(), 1);
        assert_eq!(conn.nodes[0].name, "ci");

        let conn: Connection<WorkflowNode> =
            serde_json::from_value(json!({ "nodes": null })).unwrap();
        assert!(conn.nodes.is_empty());
    }

    #[test]
    fn test_non_commit_target_has_no_head_commit() {
        let branch: BranchRef =
            serde_json::from_value(json!({ "name": "v1.0", "target": {} })).unwrap();
        assert!(branch.target.is_some());
        assert!(branch.head_commit().is_none());
    }

    #[test]
    fn test_display_name_falls_back_to_login() {
        let org: OrgNode = serde_json::from_value(json!({ "login": "acme", "name": null })).unwrap();
        assert_eq!(org.display_name(), "acme");

        let org: OrgNode =
            serde_json::from_value(json!({ "login": "acme", "name": "Acme Corp" })).unwrap();
        assert_eq!(org.display_name(), "Acme Corp");
    }

    #[test]
    fn test_repository_decodes_nested_check_suites() {
        let repo: RepositoryNode = serde_json::from_value(json!({
            "name": "api",
            "url": "https://github.com/acme/api",
            "isArchived": false,
            "defaultBranchRef": {
                "name": "main",
                "target": {
                    "abbreviatedOid": "abc1234",
                    "commitUrl": "https://github.com/acme/api/commit/abc1234",
                    "checkSuites": { "nodes": [{
                        "status": "COMPLETED",
                        "conclusion": "SUCCESS",
                        "workflowRun": {
                            "createdAt": "2024-05-01T12:00:00Z",
                            "url": "https://github.com/acme/api/actions/runs/1",
                            "workflow": { "name": "CI" }
                        }
                    }]}
                }
            }
        }))
        .unwrap();

        let commit = repo.default_branch_ref.as_ref().unwrap().head_commit().unwrap();
        let suites = &commit.check_suites.as_ref().unwrap().nodes;
        assert_eq!(suites.len(), 1);
        assert_eq!(suites[0].conclusion.as_deref(), Some("SUCCESS"));
        assert!(repo.main.is_none());
    }
}
