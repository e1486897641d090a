//! Config sync manager.

use std::sync::Arc;

use tokio::sync::Mutex;

use configsync_proto::{
    Config, DeployConfig, OperationConfig, Project, RaftCommand, StaticConfig,
};

use crate::capability::{AdminValidator, CommandForwarder, ReplicatedLog};
use crate::cluster::router::LeaderAddress;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::types::{shared_config, ForwardRequest, SharedConfig};

/// Type alias for shared sync manager.
pub type SharedSyncManager = Arc<SyncManager>;

/// Routes configuration mutations through the replicated log.
///
/// Every mutation takes the operation lock, then either forwards the payload
/// to the current leader or, on the leader, appends a [`RaftCommand`] to the
/// log. The write path never touches the document; committed entries reach it
/// through the log's apply callback.
///
/// Reads take the same lock, so a read waits behind an in-flight mutation.
/// Only [`SyncManager::get_cluster_size`] skips it.
pub struct SyncManager {
    /// Configuration.
    config: SyncConfig,
    /// Serializes all operations on this node.
    lock: Mutex<()>,
    /// The node-local replicated document.
    document: SharedConfig,
    /// Replicated log client.
    log: Arc<dyn ReplicatedLog>,
    /// Transport used to reach the leader.
    forwarder: Arc<dyn CommandForwarder>,
    /// Policy gate for project changes.
    validator: Arc<dyn AdminValidator>,
}

impl SyncManager {
    /// Create a sync manager with an empty document.
    pub fn new(
        config: SyncConfig,
        log: Arc<dyn ReplicatedLog>,
        forwarder: Arc<dyn CommandForwarder>,
        validator: Arc<dyn AdminValidator>,
    ) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
            document: shared_config(Config::default()),
            log,
            forwarder,
            validator,
        }
    }

    /// Use an existing document handle, typically the one the log's applier
    /// writes to.
    pub fn with_document(mut self, document: SharedConfig) -> Self {
        self.document = document;
        self
    }

    /// The document handle, for wiring an applier.
    pub fn document(&self) -> SharedConfig {
        self.document.clone()
    }

    /// Get the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Replace the static routing section.
    pub async fn set_static_config(
        &self,
        token: &str,
        static_config: StaticConfig,
    ) -> Result<(), SyncError> {
        self.submit(token, RaftCommand::SetStatic(static_config)).await
    }

    /// Merge internal routes into the static routing section.
    pub async fn add_internal_routes(
        &self,
        token: &str,
        static_config: StaticConfig,
    ) -> Result<(), SyncError> {
        self.submit(token, RaftCommand::AddInternalRoute(static_config))
            .await
    }

    /// Replace the cluster operating mode.
    pub async fn set_operation_mode_config(
        &self,
        token: &str,
        operation: OperationConfig,
    ) -> Result<(), SyncError> {
        self.submit(token, RaftCommand::SetOperation(operation)).await
    }

    /// Create or replace a project.
    ///
    /// On the leader the admin validator is consulted before anything is
    /// appended to the log.
    pub async fn set_project_config(&self, token: &str, project: Project) -> Result<(), SyncError> {
        self.submit(token, RaftCommand::SetProject(project)).await
    }

    /// Replace the deployment settings.
    pub async fn set_deploy_config(
        &self,
        token: &str,
        deploy: DeployConfig,
    ) -> Result<(), SyncError> {
        self.submit(token, RaftCommand::SetDeploy(deploy)).await
    }

    /// Delete a project.
    pub async fn delete_config(&self, token: &str, project_id: &str) -> Result<(), SyncError> {
        self.submit(token, RaftCommand::Delete(project_id.to_string()))
            .await
    }

    async fn submit(&self, token: &str, command: RaftCommand) -> Result<(), SyncError> {
        let _guard = self.lock.lock().await;

        if let Err(e) = self.log.verify_leader().await {
            tracing::debug!(kind = %command.kind(), reason = %e, "not the leader, forwarding");
            return self.forward(token, &command).await;
        }

        if let RaftCommand::SetProject(project) = &command {
            let allowed = {
                let current = self.document.read();
                self.validator.validate_sync_operation(&current, project)
            };
            if !allowed {
                tracing::debug!(project = %project.id, "project change rejected by validator");
                return Err(SyncError::PolicyRejected);
            }
        }

        let data = command.encode()?;
        self.log.apply(data, None).await?;

        tracing::debug!(kind = %command.kind(), "command applied to log");
        Ok(())
    }

    async fn forward(&self, token: &str, command: &RaftCommand) -> Result<(), SyncError> {
        let leader = self.log.leader().ok_or(SyncError::NoLeader)?;
        let target = LeaderAddress::parse(&leader)?.with_port(self.config.forward_port);

        let request = ForwardRequest {
            target,
            token: token.to_string(),
            route: command.forward_route(),
            body: command.forward_body()?,
        };

        self.forwarder.send(request).await
    }

    /// Get a project from the local document.
    ///
    /// This reflects what this node has applied so far, which can lag the
    /// leader.
    pub async fn get_config(&self, project_id: &str) -> Result<Project, SyncError> {
        let _guard = self.lock.lock().await;

        let document = self.document.read();
        document
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
            .ok_or_else(|| SyncError::ProjectNotFound(project_id.to_string()))
    }

    /// Snapshot of the local document.
    pub async fn get_global_config(&self) -> Config {
        let _guard = self.lock.lock().await;
        self.document.read().clone()
    }

    /// Overwrite the local document.
    ///
    /// Meant for bootstrap, before the node takes cluster traffic. Later calls
    /// are a forced overwrite, not a merge.
    pub async fn set_global_config(&self, config: Config) {
        let _guard = self.lock.lock().await;
        *self.document.write() = config;
    }

    /// Number of cluster members known to the log.
    pub fn get_cluster_size(&self) -> usize {
        self.log.num_nodes()
    }
}
