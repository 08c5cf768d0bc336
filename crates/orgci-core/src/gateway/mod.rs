//! Upstream query seam.
//!
//! [`QueryGateway`] is the only component that talks to the hosting
//! platform. [`GitHubGateway`] is the production implementation; tests plug
//! in [`crate::fakes::StaticGateway`].

pub mod github;
pub mod wire;

use async_trait::async_trait;

use crate::error::OrgCiResult;

pub use github::{GatewayConfig, GitHubGateway, DEFAULT_GRAPHQL_URL, GITHUB_ACTIONS_APP_ID};
pub use wire::{
    BranchRef, CheckSuiteNode, CommitNode, Connection, OrgNode, RepositoryNode, WorkflowNode,
    WorkflowRunNode,
};

/// Injectable source of nested organization CI data.
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Run the organization query once.
    ///
    /// Any failure (transport, authorization, unknown organization) is an
    /// `Err`; an organization without repositories is `Ok` with empty lists.
    async fn fetch_organization(&self, org: &str) -> OrgCiResult<OrgNode>;
}
