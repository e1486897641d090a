//! Applies committed commands to the node-local document.
//!
//! This is the only code path that mutates the replicated document after
//! bootstrap. The log engine calls [`ConfigApplier::apply`] once per committed
//! entry, in log order.

use std::path::PathBuf;

use configsync_core::store_config_to_file;
use configsync_proto::{Config, RaftCommand};

use crate::error::SyncError;
use crate::types::{ApplyAck, SharedConfig};

/// Applies log entries to a [`SharedConfig`].
pub struct ConfigApplier {
    /// The document being maintained.
    document: SharedConfig,
    /// File the document is flushed to after every apply.
    persist_path: Option<PathBuf>,
}

impl ConfigApplier {
    /// Create an applier for the given document.
    pub fn new(document: SharedConfig) -> Self {
        Self {
            document,
            persist_path: None,
        }
    }

    /// Flush the document to `path` after every applied entry.
    pub fn with_persist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persist_path = Some(path.into());
        self
    }

    /// The document this applier maintains.
    pub fn document(&self) -> &SharedConfig {
        &self.document
    }

    /// Decode and apply a raw log entry.
    pub fn apply(&self, entry: &[u8]) -> Result<ApplyAck, SyncError> {
        let command = RaftCommand::decode(entry)?;
        self.apply_command(command)
    }

    /// Apply a decoded command.
    ///
    /// The change is built on a copy and flushed first. The shared document is
    /// only replaced once the flush succeeds, so a failed flush leaves it as it
    /// was.
    pub fn apply_command(&self, command: RaftCommand) -> Result<ApplyAck, SyncError> {
        let kind = command.kind();
        let mut next = self.document.read().clone();
        let ack = apply_to(&mut next, command);

        if let Some(path) = &self.persist_path {
            store_config_to_file(&next, path)?;
        }
        *self.document.write() = next;

        tracing::debug!(kind = %kind, ack = ?ack, "applied command");
        Ok(ack)
    }
}

fn apply_to(document: &mut Config, command: RaftCommand) -> ApplyAck {
    match command {
        RaftCommand::SetStatic(static_config) => {
            document.static_config = static_config;
            ApplyAck::Applied
        }
        RaftCommand::AddInternalRoute(static_config) => {
            document
                .static_config
                .merge_internal_routes(static_config.internal_routes);
            ApplyAck::Applied
        }
        RaftCommand::SetOperation(operation) => {
            document.operation_config = operation;
            ApplyAck::Applied
        }
        RaftCommand::SetProject(project) => {
            document.upsert_project(project);
            ApplyAck::Applied
        }
        RaftCommand::SetDeploy(deploy) => {
            document.deploy = deploy;
            ApplyAck::Applied
        }
        RaftCommand::Delete(id) => match document.remove_project(&id) {
            Some(_) => ApplyAck::Applied,
            None => ApplyAck::Unchanged,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::shared_config;
    use configsync_core::load_config_from_file;
    use configsync_proto::{
        DeployConfig, OperationConfig, OperationMode, Project, Route, RouteTarget, StaticConfig,
    };

    fn applier() -> ConfigApplier {
        ConfigApplier::new(shared_config(Config::default()))
    }

    #[test]
    fn test_set_project_upserts() {
        let applier = applier();
        applier
            .apply_command(RaftCommand::SetProject(Project::new("p1", "one")))
            .unwrap();
        applier
            .apply_command(RaftCommand::SetProject(Project::new("p1", "uno")))
            .unwrap();

        let document = applier.document().read();
        assert_eq!(document.project_count(), 1);
        assert_eq!(document.projects[0].name, "uno");
    }

    #[test]
    fn test_delete_project() {
        let applier = applier();
        applier
            .apply_command(RaftCommand::SetProject(Project::new("p1", "one")))
            .unwrap();

        let ack = applier
            .apply_command(RaftCommand::Delete("p1".into()))
            .unwrap();
        assert_eq!(ack, ApplyAck::Applied);

        let ack = applier
            .apply_command(RaftCommand::Delete("p1".into()))
            .unwrap();
        assert_eq!(ack, ApplyAck::Unchanged);
        assert_eq!(applier.document().read().project_count(), 0);
    }

    #[test]
    fn test_static_and_internal_routes() {
        let applier = applier();
        let static_config = StaticConfig {
            routes: vec![Route::new("web", "/", RouteTarget::new("web", 80))],
            internal_routes: vec![Route::new("a", "/a", RouteTarget::new("a", 80))],
        };
        applier
            .apply_command(RaftCommand::SetStatic(static_config))
            .unwrap();
        applier
            .apply_command(RaftCommand::AddInternalRoute(StaticConfig::internal(vec![
                Route::new("b", "/b", RouteTarget::new("b", 80)),
            ])))
            .unwrap();

        let document = applier.document().read();
        assert_eq!(document.static_config.routes.len(), 1);
        let ids: Vec<_> = document
            .static_config
            .internal_routes
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_operation_and_deploy_replace() {
        let applier = applier();
        let deploy = DeployConfig {
            enabled: true,
            orchestrator: "kubernetes".into(),
            ..Default::default()
        };
        applier
            .apply_command(RaftCommand::SetDeploy(deploy.clone()))
            .unwrap();
        applier
            .apply_command(RaftCommand::SetOperation(OperationConfig::new(
                OperationMode::Enterprise,
            )))
            .unwrap();

        let document = applier.document().read();
        assert_eq!(document.deploy, deploy);
        assert_eq!(document.operation_config.mode, OperationMode::Enterprise);
    }

    #[test]
    fn test_apply_raw_entry() {
        let applier = applier();
        let entry = RaftCommand::SetProject(Project::new("p1", "one"))
            .encode()
            .unwrap();

        assert_eq!(applier.apply(&entry).unwrap(), ApplyAck::Applied);
        assert!(applier.document().read().contains_project("p1"));
    }

    #[test]
    fn test_apply_malformed_entry() {
        let applier = applier();
        let result = applier.apply(b"not a command");

        assert!(matches!(result, Err(SyncError::Protocol(_))));
        assert_eq!(*applier.document().read(), Config::default());
    }

    #[test]
    fn test_persist_after_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let applier = applier().with_persist_path(&path);

        applier
            .apply_command(RaftCommand::SetProject(Project::new("p1", "one")))
            .unwrap();

        let stored = load_config_from_file(&path).unwrap();
        assert_eq!(stored, *applier.document().read());
    }

    #[test]
    fn test_persist_failure_is_reported() {
        let applier = applier().with_persist_path("config.txt");
        let result = applier.apply_command(RaftCommand::Delete("p1".into()));

        assert!(matches!(result, Err(SyncError::Store(_))));
    }

    #[test]
    fn test_persist_failure_leaves_document_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.json");
        let applier = applier().with_persist_path(&path);

        let result = applier.apply_command(RaftCommand::SetProject(Project::new("p1", "one")));

        assert!(matches!(result, Err(SyncError::Store(_))));
        assert_eq!(*applier.document().read(), Config::default());
    }
}
