//! orgci core library
//!
//! Aggregates GitHub Actions status across every repository of an
//! organization and collapses it into one prioritized signal per repo.
//!
//! Pipeline: [`QueryGateway`] → [`normalizer`] → [`aggregator`]. The
//! [`StatusClassifier`] and [`format_relative`] are pure helpers applied to
//! the aggregated [`OrgResult`], directly or through [`OrgSummary`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use orgci_core::{ExclusionRules, GatewayConfig, GitHubGateway, OrgAggregator};
//!
//! let gateway = GitHubGateway::new(GatewayConfig::new(token))?;
//! let aggregator = OrgAggregator::new(Arc::new(gateway));
//! match aggregator.aggregate("acme", &ExclusionRules::new([".github"])).await {
//!     Some(result) => println!("{} repos", result.repos.len()),
//!     None => eprintln!("organization not found or query failed"),
//! }
//! ```

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fakes;
pub mod gateway;
pub mod model;
pub mod normalizer;
pub mod obs;
pub mod reltime;
pub mod summary;
pub mod telemetry;

pub use aggregator::{assemble, sort_repos, OrgAggregator};
pub use classifier::{
    Severity, StatusClassifier, DEFAULT_ICONS, DEFAULT_PRECEDENCE, DEFAULT_STATUS_TABLE,
};
pub use config::DashboardConfig;
pub use error::{OrgCiError, OrgCiResult};
pub use gateway::{GatewayConfig, GitHubGateway, OrgNode, QueryGateway};
pub use model::{OrgResult, RepoResult, WorkflowResult};
pub use normalizer::{
    effective_status, normalize_repo, resolve_branch, ExclusionRules, NormalizedRepo, SkipReason,
};
pub use reltime::{format_relative, time_ago};
pub use summary::{OrgSummary, RepoSummary, WorkflowRow};
pub use telemetry::init_tracing;

/// orgci version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
