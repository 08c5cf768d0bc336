//! End-to-end aggregation over an in-memory gateway.
//!
//! Covers:
//! - excluded and empty repos never reach the result
//! - conclusion beats status, lower-cased
//! - workflow and repo ordering
//! - query failure yields absence, not an empty result

use orgci_core::fakes::StaticGateway;
use orgci_core::{
    ExclusionRules, OrgAggregator, OrgNode, OrgSummary, Severity, StatusClassifier,
};
use serde_json::{json, Value};

fn suite(status: &str, conclusion: Option<&str>, created_at: &str, workflow: &str) -> Value {
    json!({
        "status": status,
        "conclusion": conclusion,
        "workflowRun": {
            "createdAt": created_at,
            "url": format!("https://github.com/acme/runs/{workflow}"),
            "workflow": { "name": workflow }
        }
    })
}

fn repo(name: &str, check_suites: Value) -> Value {
    json!({
        "name": name,
        "url": format!("https://github.com/acme/{name}"),
        "isArchived": false,
        "defaultBranchRef": {
            "name": "main",
            "target": {
                "abbreviatedOid": "0a1b2c3",
                "commitUrl": format!("https://github.com/acme/{name}/commit/0a1b2c3"),
                "checkSuites": check_suites
            }
        }
    })
}

fn org(repos: Vec<Value>) -> OrgNode {
    serde_json::from_value(json!({
        "login": "acme",
        "name": null,
        "repositories": { "nodes": repos }
    }))
    .expect("fixture decodes")
}

#[tokio::test]
async fn excluded_repo_is_left_out() {
    let gateway = StaticGateway::with(org(vec![
        repo(
            "a",
            json!({ "nodes": [suite("COMPLETED", Some("SUCCESS"), "2024-05-01T10:00:00Z", "ci")] }),
        ),
        repo(
            "b",
            json!({ "nodes": [suite("COMPLETED", Some("FAILURE"), "2024-05-01T11:00:00Z", "ci")] }),
        ),
    ]));
    let agg = OrgAggregator::new(gateway.clone());

    let result = agg
        .aggregate("acme", &ExclusionRules::new(["b"]))
        .await
        .expect("query succeeds");

    assert_eq!(result.org_name, "acme");
    let names: Vec<&str> = result.repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a"]);
    assert_eq!(result.repos[0].workflows[0].status, "success");
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn upstream_failure_is_absence() {
    let gateway = StaticGateway::unreachable("simulated transport error");
    let agg = OrgAggregator::new(gateway.clone());

    let result = agg.aggregate("acme", &ExclusionRules::default()).await;

    assert!(result.is_none());
    assert_eq!(gateway.calls(), 1, "no retry after a failed query");
}

#[tokio::test]
async fn empty_or_missing_check_suites_exclude_repo() {
    let gateway = StaticGateway::with(org(vec![
        repo("empty", json!({ "nodes": [] })),
        repo("missing", Value::Null),
        repo(
            "pending-only",
            json!({ "nodes": [{ "status": "QUEUED", "conclusion": null, "workflowRun": null }] }),
        ),
        repo(
            "ok",
            json!({ "nodes": [suite("IN_PROGRESS", None, "2024-05-01T10:00:00Z", "ci")] }),
        ),
    ]));
    let agg = OrgAggregator::new(gateway);

    let result = agg.aggregate("acme", &ExclusionRules::default()).await.unwrap();

    assert_eq!(result.repos.len(), 1);
    assert_eq!(result.repos[0].name, "ok");
    assert!(result.repos.iter().all(|r| !r.workflows.is_empty()));
}

#[tokio::test]
async fn conclusion_overrides_status_everywhere() {
    let gateway = StaticGateway::with(org(vec![repo(
        "mixed",
        json!({ "nodes": [
            suite("COMPLETED", Some("TIMED_OUT"), "2024-05-01T10:00:00Z", "build"),
            suite("COMPLETED", Some("Cancelled"), "2024-05-01T09:00:00Z", "deploy"),
            suite("WAITING", None, "2024-05-01T08:00:00Z", "release"),
        ]}),
    )]));
    let agg = OrgAggregator::new(gateway);

    let result = agg.aggregate("acme", &ExclusionRules::default()).await.unwrap();
    let statuses: Vec<&str> = result.repos[0]
        .workflows
        .iter()
        .map(|w| w.status.as_str())
        .collect();

    assert_eq!(statuses, vec!["timed_out", "cancelled", "waiting"]);
}

#[tokio::test]
async fn workflows_and_repos_are_ordered() {
    let gateway = StaticGateway::with(org(vec![
        // Newest single run overall, but its oldest run is the oldest of all.
        repo(
            "spread",
            json!({ "nodes": [
                suite("COMPLETED", Some("SUCCESS"), "2024-05-01T00:00:00Z", "old"),
                suite("COMPLETED", Some("SUCCESS"), "2024-05-09T00:00:00Z", "new"),
            ]}),
        ),
        repo(
            "recent",
            json!({ "nodes": [suite("COMPLETED", Some("SUCCESS"), "2024-05-05T00:00:00Z", "ci")] }),
        ),
        repo(
            "middle",
            json!({ "nodes": [suite("COMPLETED", Some("SUCCESS"), "2024-05-03T00:00:00Z", "ci")] }),
        ),
    ]));
    let agg = OrgAggregator::new(gateway);

    let result = agg.aggregate("acme", &ExclusionRules::default()).await.unwrap();

    let names: Vec<&str> = result.repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["recent", "middle", "spread"]);

    for repo in &result.repos {
        assert!(repo
            .workflows
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }
    let keys: Vec<_> = result.repos.iter().map(|r| r.oldest_run_at()).collect();
    assert!(keys.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn summary_reports_most_severe_bucket() {
    let gateway = StaticGateway::with(org(vec![
        repo(
            "green",
            json!({ "nodes": [suite("COMPLETED", Some("SUCCESS"), "2024-05-02T00:00:00Z", "ci")] }),
        ),
        repo(
            "red",
            json!({ "nodes": [
                suite("COMPLETED", Some("SUCCESS"), "2024-05-01T00:00:00Z", "lint"),
                suite("COMPLETED", Some("STARTUP_FAILURE"), "2024-05-01T01:00:00Z", "ci"),
            ]}),
        ),
        repo(
            "odd",
            json!({ "nodes": [suite("COMPLETED", Some("SOMETHING_NEW"), "2024-05-03T00:00:00Z", "ci")] }),
        ),
    ]));
    let agg = OrgAggregator::new(gateway);
    let result = agg.aggregate("acme", &ExclusionRules::default()).await.unwrap();

    let summary = OrgSummary::build(&result, &StatusClassifier::default(), chrono::Utc::now());

    let severity_of = |name: &str| {
        summary
            .repos
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.severity)
            .unwrap()
    };
    assert_eq!(severity_of("green"), Severity::Passed);
    assert_eq!(severity_of("red"), Severity::Failed);
    assert_eq!(severity_of("odd"), Severity::Unknown);
    assert_eq!(summary.count(Severity::Failed), 1);
}
