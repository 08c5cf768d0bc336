//! Severity classification of raw status/conclusion tokens.
//!
//! The token → bucket mapping, the bucket precedence and the bucket icons are
//! plain data tables. Callers revise them by passing different tables to
//! [`StatusClassifier::new`]; the selection logic never changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::RepoResult;

/// Coarse, ordered category of a workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Failed,
    ActionRequired,
    Running,
    Queued,
    Cancelled,
    Unknown,
    Neutral,
    Skipped,
    Passed,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failed => "failed",
            Self::ActionRequired => "action_required",
            Self::Running => "running",
            Self::Queued => "queued",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
            Self::Neutral => "neutral",
            Self::Skipped => "skipped",
            Self::Passed => "passed",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GitHub check-suite statuses and conclusions, lower-cased.
pub const DEFAULT_STATUS_TABLE: &[(&str, Severity)] = &[
    ("requested", Severity::Queued),
    ("queued", Severity::Queued),
    ("waiting", Severity::Queued),
    ("pending", Severity::Queued),
    ("in_progress", Severity::Running),
    ("completed", Severity::Passed),
    ("success", Severity::Passed),
    ("failure", Severity::Failed),
    ("timed_out", Severity::Failed),
    ("startup_failure", Severity::Failed),
    ("action_required", Severity::ActionRequired),
    ("cancelled", Severity::Cancelled),
    ("neutral", Severity::Neutral),
    ("skipped", Severity::Skipped),
    ("stale", Severity::Skipped),
];

/// Most severe first.
pub const DEFAULT_PRECEDENCE: &[Severity] = &[
    Severity::Failed,
    Severity::ActionRequired,
    Severity::Running,
    Severity::Queued,
    Severity::Cancelled,
    Severity::Unknown,
    Severity::Neutral,
    Severity::Skipped,
    Severity::Passed,
];

pub const DEFAULT_ICONS: &[(Severity, &str)] = &[
    (Severity::Failed, "❌"),
    (Severity::ActionRequired, "⚠️"),
    (Severity::Running, "🔄"),
    (Severity::Queued, "⏳"),
    (Severity::Cancelled, "🚫"),
    (Severity::Unknown, "❔"),
    (Severity::Neutral, "⚪"),
    (Severity::Skipped, "⏭️"),
    (Severity::Passed, "✅"),
];

/// Maps status tokens to [`Severity`] and picks a repository's overall bucket.
#[derive(Debug, Clone)]
pub struct StatusClassifier {
    table: HashMap<String, Severity>,
    precedence: Vec<Severity>,
    icons: HashMap<Severity, String>,
    fallback: Severity,
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_TABLE, DEFAULT_PRECEDENCE)
    }
}

impl StatusClassifier {
    /// Build from a token table and a precedence list (most severe first).
    pub fn new(table: &[(&str, Severity)], precedence: &[Severity]) -> Self {
        Self {
            table: table
                .iter()
                .map(|(token, severity)| (token.to_lowercase(), *severity))
                .collect(),
            precedence: precedence.to_vec(),
            icons: DEFAULT_ICONS
                .iter()
                .map(|(severity, icon)| (*severity, icon.to_string()))
                .collect(),
            fallback: Severity::Unknown,
        }
    }

    /// Bucket for tokens missing from the table.
    pub fn with_fallback(mut self, fallback: Severity) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_icons(mut self, icons: &[(Severity, &str)]) -> Self {
        self.icons = icons
            .iter()
            .map(|(severity, icon)| (*severity, icon.to_string()))
            .collect();
        self
    }

    pub fn fallback(&self) -> Severity {
        self.fallback
    }

    /// Bucket for a raw token; case-insensitive, never fails.
    pub fn classify(&self, token: &str) -> Severity {
        let key = token.trim().to_lowercase();
        self.table.get(&key).copied().unwrap_or(self.fallback)
    }

    /// Least severe bucket of the precedence list.
    pub fn least_severe(&self) -> Severity {
        self.precedence.last().copied().unwrap_or(self.fallback)
    }

    /// Most severe bucket among `statuses`, per the precedence list.
    ///
    /// Falls back to [`least_severe`](Self::least_severe) when no bucket of
    /// `statuses` appears in the precedence list.
    pub fn most_severe<'a, I>(&self, statuses: I) -> Severity
    where
        I: IntoIterator<Item = &'a str>,
    {
        statuses
            .into_iter()
            .map(|s| self.classify(s))
            .filter_map(|severity| {
                self.precedence
                    .iter()
                    .position(|p| *p == severity)
                    .map(|rank| (rank, severity))
            })
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, severity)| severity)
            .unwrap_or_else(|| self.least_severe())
    }

    /// Overall bucket displayed for a repository.
    pub fn repo_severity(&self, repo: &RepoResult) -> Severity {
        self.most_severe(repo.workflows.iter().map(|w| w.status.as_str()))
    }

    /// Display icon for a bucket; empty when the icon table has no entry.
    pub fn icon(&self, severity: Severity) -> &str {
        self.icons.get(&severity).map(String::as_str).unwrap_or("")
    }
}
