//! One-shot CI status snapshot for a GitHub organization.
//!
//! Reads `.env` and the environment (see [`orgci_core::DashboardConfig`]),
//! aggregates `ORGCI_DEFAULT_ORG` once and prints the summary as JSON.
//! Set `ORGCI_LOG_FORMAT=json` for JSON log lines on stderr.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use orgci_core::{
    init_tracing, DashboardConfig, GitHubGateway, OrgAggregator, OrgSummary, StatusClassifier,
};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let json_logs = std::env::var("ORGCI_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    init_tracing(json_logs, Level::INFO);

    let config = DashboardConfig::from_env().context("failed to load configuration")?;
    let org = config
        .default_org
        .clone()
        .context("ORGCI_DEFAULT_ORG not set")?;
    if config.auto_refresh {
        info!("auto refresh is a dashboard setting; orgci-report takes a single snapshot");
    }

    let gateway =
        GitHubGateway::new(config.gateway_config()).context("failed to build GitHub client")?;
    let aggregator = OrgAggregator::new(Arc::new(gateway));

    let Some(result) = aggregator.aggregate(&org, &config.exclusion_rules()).await else {
        bail!("organization '{org}' not found or the GitHub query failed");
    };

    let summary = OrgSummary::build(&result, &StatusClassifier::default(), Utc::now());
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to serialize summary")?
    );
    Ok(())
}
