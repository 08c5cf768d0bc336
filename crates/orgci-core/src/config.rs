//! Environment-driven configuration for callers of the pipeline.

use std::time::Duration;

use serde::Serialize;

use crate::error::{OrgCiError, OrgCiResult};
use crate::gateway::{GatewayConfig, DEFAULT_GRAPHQL_URL, GITHUB_ACTIONS_APP_ID};
use crate::normalizer::ExclusionRules;

/// Dashboard settings.
///
/// Reads:
/// - `GITHUB_TOKEN` (required)
/// - `ORGCI_DEFAULT_ORG` (optional)
/// - `ORGCI_EXCLUDED_REPOS` (optional, comma-separated)
/// - `ORGCI_AUTO_REFRESH` (optional, default: "false")
/// - `ORGCI_GRAPHQL_URL` (optional, default: GitHub's endpoint)
/// - `ORGCI_APP_ID` (optional, default: GitHub Actions)
/// - `ORGCI_TIMEOUT_SECS` (optional, default: 30)
/// - `ORGCI_PUBLIC_ONLY` (optional, default: "true")
#[derive(Debug, Clone, Serialize)]
pub struct DashboardConfig {
    #[serde(skip_serializing)]
    pub token: String,
    pub default_org: Option<String>,
    pub excluded_repos: Vec<String>,
    pub auto_refresh: bool,
    pub graphql_url: String,
    pub app_id: u64,
    pub timeout_secs: u64,
    pub public_only: bool,
}

impl DashboardConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            default_org: None,
            excluded_repos: Vec::new(),
            auto_refresh: false,
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            app_id: GITHUB_ACTIONS_APP_ID,
            timeout_secs: 30,
            public_only: true,
        }
    }

    pub fn from_env() -> OrgCiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> OrgCiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("GITHUB_TOKEN")
            .ok_or_else(|| OrgCiError::Config("GITHUB_TOKEN not set".to_string()))?;
        let mut config = Self::new(token);

        config.default_org = get("ORGCI_DEFAULT_ORG");
        if let Some(list) = get("ORGCI_EXCLUDED_REPOS") {
            config.excluded_repos = parse_list(&list);
        }
        if let Some(flag) = get("ORGCI_AUTO_REFRESH") {
            config.auto_refresh = parse_bool("ORGCI_AUTO_REFRESH", &flag)?;
        }
        if let Some(url) = get("ORGCI_GRAPHQL_URL") {
            config.graphql_url = url;
        }
        if let Some(app_id) = get("ORGCI_APP_ID") {
            config.app_id = parse_number("ORGCI_APP_ID", &app_id)?;
        }
        if let Some(secs) = get("ORGCI_TIMEOUT_SECS") {
            config.timeout_secs = parse_number("ORGCI_TIMEOUT_SECS", &secs)?;
        }
        if let Some(flag) = get("ORGCI_PUBLIC_ONLY") {
            config.public_only = parse_bool("ORGCI_PUBLIC_ONLY", &flag)?;
        }
        Ok(config)
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.token.clone())
            .with_endpoint(self.graphql_url.clone())
            .with_app_id(self.app_id)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_public_only(self.public_only)
    }

    pub fn exclusion_rules(&self) -> ExclusionRules {
        ExclusionRules::new(self.excluded_repos.iter().cloned())
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(key: &str, raw: &str) -> OrgCiResult<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(OrgCiError::Config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

fn parse_number(key: &str, raw: &str) -> OrgCiResult<u64> {
    raw.parse()
        .map_err(|_| OrgCiError::Config(format!("{key}: expected a number, got '{raw}'")))
}
