//! In-memory gateway for tests and offline demos.
//!
//! [`StaticGateway`] answers every query from a canned organization tree or
//! fails every query with a transport error, without touching the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{OrgCiError, OrgCiResult};
use crate::gateway::{OrgNode, QueryGateway};

#[derive(Debug)]
enum Canned {
    Org(OrgNode),
    Unreachable(String),
}

/// [`QueryGateway`] returning a fixed answer and counting calls.
#[derive(Debug)]
pub struct StaticGateway {
    canned: Canned,
    calls: AtomicUsize,
}

impl StaticGateway {
    /// Every query returns a clone of `org`.
    pub fn with(org: OrgNode) -> Arc<Self> {
        Arc::new(Self {
            canned: Canned::Org(org),
            calls: AtomicUsize::new(0),
        })
    }

    /// Every query fails with [`OrgCiError::Transport`].
    pub fn unreachable(reason: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            canned: Canned::Unreachable(reason.into()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of queries issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryGateway for StaticGateway {
    async fn fetch_organization(&self, _org: &str) -> OrgCiResult<OrgNode> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.canned {
            Canned::Org(org) => Ok(org.clone()),
            Canned::Unreachable(reason) => Err(OrgCiError::Transport(reason.clone())),
        }
    }
}
