//! Structured observability hooks for the aggregation lifecycle.
//!
//! Events are emitted through `tracing`; filter them with `RUST_LOG`
//! (for example `RUST_LOG=orgci_core=debug` to see every skipped repo).

use tracing::{debug, info, warn};

use crate::normalizer::SkipReason;

/// Span tagging every event of one aggregation with its organization.
///
/// Async callers attach it with `tracing::Instrument`; synchronous code
/// uses [`OrgSpan`].
pub fn org_span(org: &str) -> tracing::Span {
    tracing::info_span!("orgci.aggregate", org = %org)
}

/// RAII guard for the synchronous assembly step.
///
/// Enters an `orgci.assemble` span, which nests under [`org_span`] when
/// called from the async path. Not `Send`: never hold it across an `.await`.
pub struct OrgSpan {
    _span: tracing::span::EnteredSpan,
}

impl OrgSpan {
    pub fn enter(org: &str) -> Self {
        Self {
            _span: tracing::debug_span!("orgci.assemble", org = %org).entered(),
        }
    }
}

pub fn emit_aggregate_started(org: &str) {
    info!(event = "aggregate.started", org = %org);
}

/// Emit event: aggregation finished with kept and skipped repo counts.
pub fn emit_aggregate_finished(org: &str, repos: usize, skipped: usize, duration_ms: u64) {
    info!(
        event = "aggregate.finished",
        org = %org,
        repos = repos,
        skipped = skipped,
        duration_ms = duration_ms,
    );
}

/// Emit event: upstream query failed and the aggregation yields nothing.
pub fn emit_aggregate_failed(org: &str, error: &dyn std::fmt::Display) {
    warn!(event = "aggregate.failed", org = %org, error = %error);
}

/// Emit event: the query resolved the organization but also reported errors.
pub fn emit_partial_response(org: &str, errors: usize, first: &str) {
    warn!(event = "query.partial", org = %org, errors = errors, first_error = %first);
}

pub fn emit_repo_skipped(repo: &str, reason: SkipReason) {
    debug!(event = "repo.skipped", repo = %repo, reason = %reason);
}
