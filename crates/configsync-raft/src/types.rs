//! Core type definitions shared across the sync subsystem.

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::Url;

use configsync_proto::{Config, ForwardRoute};

use crate::cluster::router::LeaderAddress;
use crate::error::SyncError;

/// The node-local replicated document, shared between the sync manager and
/// the log's apply callback.
pub type SharedConfig = Arc<RwLock<Config>>;

/// Create a shared document.
pub fn shared_config(config: Config) -> SharedConfig {
    Arc::new(RwLock::new(config))
}

/// Outcome of applying a committed command to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAck {
    /// The document changed.
    Applied,
    /// The command was valid but left the document as it was.
    Unchanged,
}

/// A command bound for the leader's config API.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardRequest {
    /// Leader host and API port.
    pub target: LeaderAddress,
    /// The caller's token, sent as a bearer token.
    pub token: String,
    /// Method and resource path.
    pub route: ForwardRoute,
    /// JSON body: the bare payload.
    pub body: Option<serde_json::Value>,
}

impl ForwardRequest {
    /// Build the request URL under the given API prefix.
    ///
    /// Route segments that the URL parser would collapse (empty, `.`, `..`)
    /// are rejected rather than dropped.
    pub fn url(&self, api_prefix: &str) -> Result<Url, SyncError> {
        if let Some(segment) = self
            .route
            .segments
            .iter()
            .find(|s| matches!(s.as_str(), "" | "." | ".."))
        {
            return Err(SyncError::InvalidProjectId(segment.clone()));
        }

        let mut url = Url::parse(&format!("http://{}/", self.target))
            .map_err(|e| SyncError::InvalidLeaderAddress(format!("{}: {}", self.target, e)))?;

        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidLeaderAddress(self.target.to_string()))?
            .pop_if_empty()
            .extend(api_prefix.split('/').filter(|s| !s.is_empty()))
            .extend(&self.route.segments);

        Ok(url)
    }
}
