//! GitHub GraphQL gateway.
//!
//! Issues a single query per organization. No retry and no pagination past
//! the first 100 repositories: one failed attempt fails the aggregation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::wire::OrgNode;
use super::QueryGateway;
use crate::error::{OrgCiError, OrgCiResult};
use crate::obs;

/// GitHub's public GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// App id of GitHub Actions; check suites from other apps are filtered out.
pub const GITHUB_ACTIONS_APP_ID: u64 = 15368;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ORG_CHECK_SUITES_QUERY: &str = r#"
query OrgCheckSuites($org: String!, $appId: Int!, $privacy: RepositoryPrivacy) {
  organization(login: $org) {
    login
    name
    repositories(first: 100, privacy: $privacy, orderBy: {field: PUSHED_AT, direction: DESC}) {
      nodes {
        name
        url
        isArchived
        defaultBranchRef { ...HeadCheckSuites }
        main: ref(qualifiedName: "refs/heads/main") { ...HeadCheckSuites }
        master: ref(qualifiedName: "refs/heads/master") { ...HeadCheckSuites }
      }
    }
  }
}

fragment HeadCheckSuites on Ref {
  name
  target {
    ... on Commit {
      abbreviatedOid
      commitUrl
      checkSuites(first: 100, filterBy: {appId: $appId}) {
        nodes {
          status
          conclusion
          workflowRun {
            createdAt
            url
            workflow { name }
          }
        }
      }
    }
  }
}
"#;

/// Connection settings for [`GitHubGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Full GraphQL endpoint URL.
    pub endpoint: String,
    /// Personal access token or app installation token.
    pub token: String,
    /// Only check suites created by this app are returned.
    pub app_id: u64,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// List public repositories only (default `true`).
    pub public_only: bool,
}

impl GatewayConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_GRAPHQL_URL.to_string(),
            token: token.into(),
            app_id: GITHUB_ACTIONS_APP_ID,
            timeout: DEFAULT_TIMEOUT,
            public_only: true,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_app_id(mut self, app_id: u64) -> Self {
        self.app_id = app_id;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_public_only(mut self, public_only: bool) -> Self {
        self.public_only = public_only;
        self
    }

    /// `privacy` query variable; `None` lists every repo the token can see.
    fn privacy(&self) -> Option<&'static str> {
        self.public_only.then_some("PUBLIC")
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<OrganizationData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct OrganizationData {
    #[serde(default)]
    organization: Option<OrgNode>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// [`QueryGateway`] backed by the GitHub GraphQL API.
#[derive(Debug, Clone)]
pub struct GitHubGateway {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl GitHubGateway {
    pub fn new(config: GatewayConfig) -> OrgCiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("orgci/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Turn a decoded GraphQL envelope into the organization node.
    ///
    /// Errors alongside a resolved organization are partial-data gaps (for
    /// example repos hidden by SAML enforcement): they are logged and the
    /// visible part is kept. Without an organization the first error wins.
    fn organization_from(org: &str, response: GraphQlResponse) -> OrgCiResult<OrgNode> {
        let organization = response.data.and_then(|d| d.organization);
        match (organization, response.errors.first()) {
            (Some(node), Some(first)) => {
                obs::emit_partial_response(org, response.errors.len(), &first.message);
                Ok(node)
            }
            (Some(node), None) => Ok(node),
            (None, Some(first)) => Err(OrgCiError::GraphQl(first.message.clone())),
            (None, None) => Err(OrgCiError::OrganizationNotFound(org.to_string())),
        }
    }
}

#[async_trait]
impl QueryGateway for GitHubGateway {
    async fn fetch_organization(&self, org: &str) -> OrgCiResult<OrgNode> {
        let body = serde_json::json!({
            "query": ORG_CHECK_SUITES_QUERY,
            "variables": {
                "org": org,
                "appId": self.config.app_id,
                "privacy": self.config.privacy(),
            },
        });

        debug!(org = %org, endpoint = %self.config.endpoint, "sending organization query");
        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.token)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let message = response.text().await.unwrap_or_default();
            return Err(OrgCiError::Unauthorized(message));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OrgCiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let decoded: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| OrgCiError::InvalidResponse(e.to_string()))?;
        Self::organization_from(org, decoded)
    }
}
