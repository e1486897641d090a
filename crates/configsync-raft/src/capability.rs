//! Capabilities the sync manager consumes.
//!
//! The consensus engine, the forwarding transport and the admin policy are
//! all external. The sync manager reaches them only through these traits.

use std::time::Duration;

use async_trait::async_trait;

use configsync_proto::{ClusterRoute, Config, OperationMode, Project};

use crate::error::{LogError, SyncError};
use crate::types::{ApplyAck, ForwardRequest};

/// Client side of the replicated log.
#[async_trait]
pub trait ReplicatedLog: Send + Sync {
    /// Confirm that this node is the leader. Any error means it is not.
    async fn verify_leader(&self) -> Result<(), LogError>;

    /// Address of the current leader, if one is known.
    fn leader(&self) -> Option<ClusterRoute>;

    /// Append a command and wait until the log has applied it.
    ///
    /// `None` leaves the bound to the engine.
    async fn apply(&self, command: Vec<u8>, timeout: Option<Duration>)
        -> Result<ApplyAck, LogError>;

    /// Number of known cluster members.
    fn num_nodes(&self) -> usize;
}

/// Sends a command to the leader's config API.
#[async_trait]
pub trait CommandForwarder: Send + Sync {
    async fn send(&self, request: ForwardRequest) -> Result<(), SyncError>;
}

/// Policy gate consulted before a project change is committed.
pub trait AdminValidator: Send + Sync {
    /// Return `true` if `project` may be written on top of `current`.
    fn validate_sync_operation(&self, current: &Config, project: &Project) -> bool;
}

/// Validator that accepts every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AdminValidator for AllowAll {
    fn validate_sync_operation(&self, _current: &Config, _project: &Project) -> bool {
        true
    }
}

/// Limits the number of projects a community cluster may hold.
///
/// Updates to an existing project are always accepted. Enterprise clusters
/// are not limited.
#[derive(Debug, Clone, Copy)]
pub struct ProjectQuota {
    max_projects: usize,
}

impl ProjectQuota {
    /// Create a quota allowing `max_projects` projects.
    pub fn new(max_projects: usize) -> Self {
        Self { max_projects }
    }

    /// The configured limit.
    pub fn max_projects(&self) -> usize {
        self.max_projects
    }
}

impl Default for ProjectQuota {
    fn default() -> Self {
        Self::new(1)
    }
}

impl AdminValidator for ProjectQuota {
    fn validate_sync_operation(&self, current: &Config, project: &Project) -> bool {
        if current.operation_config.mode == OperationMode::Enterprise {
            return true;
        }
        if current.contains_project(&project.id) {
            return true;
        }
        current.project_count() < self.max_projects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configsync_proto::OperationConfig;

    fn config_with(ids: &[&str], mode: OperationMode) -> Config {
        Config {
            projects: ids.iter().map(|id| Project::new(*id, *id)).collect(),
            operation_config: OperationConfig::new(mode),
            ..Default::default()
        }
    }

    #[test]
    fn test_allow_all() {
        let config = config_with(&["a", "b"], OperationMode::Community);
        assert!(AllowAll.validate_sync_operation(&config, &Project::new("c", "c")));
    }

    #[test]
    fn test_quota_rejects_new_project_over_limit() {
        let quota = ProjectQuota::new(1);
        let config = config_with(&["a"], OperationMode::Community);

        assert!(!quota.validate_sync_operation(&config, &Project::new("b", "b")));
    }

    #[test]
    fn test_quota_allows_update_of_existing_project() {
        let quota = ProjectQuota::new(1);
        let config = config_with(&["a"], OperationMode::Community);

        assert!(quota.validate_sync_operation(&config, &Project::new("a", "renamed")));
    }

    #[test]
    fn test_quota_allows_under_limit() {
        let quota = ProjectQuota::new(3);
        let config = config_with(&["a", "b"], OperationMode::Community);

        assert!(quota.validate_sync_operation(&config, &Project::new("c", "c")));
    }

    #[test]
    fn test_enterprise_is_unlimited() {
        let quota = ProjectQuota::default();
        let config = config_with(&["a", "b", "c"], OperationMode::Enterprise);

        assert!(quota.validate_sync_operation(&config, &Project::new("d", "d")));
    }
}
