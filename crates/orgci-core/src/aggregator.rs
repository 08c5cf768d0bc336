//! Organization-wide CI aggregation.
//!
//! [`OrgAggregator`] runs the single upstream query and hands the decoded
//! tree to [`assemble`], which normalizes every repository and orders them.

use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use crate::error::OrgCiResult;
use crate::gateway::{OrgNode, QueryGateway};
use crate::model::{OrgResult, RepoResult};
use crate::normalizer::{normalize_repo, ExclusionRules};
use crate::obs;

/// Order repos newest first by their *oldest* workflow run.
///
/// The key is the minimum creation time, not the maximum. The sort is stable,
/// so repos with equal keys keep upstream order.
pub fn sort_repos(repos: &mut [RepoResult]) {
    repos.sort_by(|a, b| b.oldest_run_at().cmp(&a.oldest_run_at()));
}

/// Build the [`OrgResult`] for an already fetched organization tree.
///
/// Repos that are excluded or carry no usable workflow data are dropped.
pub fn assemble(org: OrgNode, rules: &ExclusionRules) -> OrgResult {
    let _span = obs::OrgSpan::enter(&org.login);
    let org_name = org.display_name().to_string();

    let mut repos = Vec::with_capacity(org.repositories.nodes.len());
    for repo in &org.repositories.nodes {
        match normalize_repo(repo, rules) {
            Ok(normalized) => repos.push(RepoResult {
                name: repo.name.clone(),
                url: repo.url.clone(),
                commit: normalized.commit,
                commit_url: normalized.commit_url,
                workflows: normalized.workflows,
            }),
            Err(reason) => obs::emit_repo_skipped(&repo.name, reason),
        }
    }
    sort_repos(&mut repos);

    OrgResult { org_name, repos }
}

/// Fetches an organization through a [`QueryGateway`] and aggregates it.
pub struct OrgAggregator {
    gateway: Arc<dyn QueryGateway>,
}

impl OrgAggregator {
    pub fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self { gateway }
    }

    /// Aggregate `org`, keeping the reason when the query fails.
    pub async fn try_aggregate(&self, org: &str, rules: &ExclusionRules) -> OrgCiResult<OrgResult> {
        let started = Instant::now();
        let span = obs::org_span(org);

        async {
            obs::emit_aggregate_started(org);
            let node = self.gateway.fetch_organization(org).await.map_err(|e| {
                obs::emit_aggregate_failed(org, &e);
                e
            })?;

            let total = node.repositories.nodes.len();
            let result = assemble(node, rules);
            obs::emit_aggregate_finished(
                org,
                result.repos.len(),
                total - result.repos.len(),
                started.elapsed().as_millis() as u64,
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Aggregate `org`; `None` when the upstream query failed.
    ///
    /// `Some` with no repos means the organization exists but nothing is
    /// displayable.
    pub async fn aggregate(&self, org: &str, rules: &ExclusionRules) -> Option<OrgResult> {
        self.try_aggregate(org, rules).await.ok()
    }
}
