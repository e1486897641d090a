//! Replicated command types.
//!
//! A [`RaftCommand`] is the unit written to the replicated log. Each variant
//! carries exactly the payload for its kind.

use serde::{Deserialize, Serialize};

use crate::config::{DeployConfig, OperationConfig, Project, StaticConfig};
use crate::error::Error;

/// A configuration mutation replicated through the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum RaftCommand {
    /// Replace the static routing section.
    SetStatic(StaticConfig),

    /// Merge internal routes into the static routing section.
    AddInternalRoute(StaticConfig),

    /// Replace the operating mode.
    SetOperation(OperationConfig),

    /// Create or replace a project.
    SetProject(Project),

    /// Replace the deployment settings.
    SetDeploy(DeployConfig),

    /// Delete the project with this id.
    Delete(String),
}

/// Discriminant of a [`RaftCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    SetStatic,
    AddInternalRoute,
    SetOperation,
    SetProject,
    SetDeploy,
    Delete,
}

impl CommandKind {
    /// Stable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::SetStatic => "set_static",
            CommandKind::AddInternalRoute => "add_internal_route",
            CommandKind::SetOperation => "set_operation",
            CommandKind::SetProject => "set_project",
            CommandKind::SetDeploy => "set_deploy",
            CommandKind::Delete => "delete",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP method used when a command is forwarded to the leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMethod {
    Post,
    Delete,
}

impl ForwardMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardMethod::Post => "POST",
            ForwardMethod::Delete => "DELETE",
        }
    }
}

/// Where a forwarded command lands on the leader's config API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRoute {
    /// HTTP method.
    pub method: ForwardMethod,
    /// Path segments below the config API prefix.
    pub segments: Vec<String>,
}

impl ForwardRoute {
    fn post(segments: &[&str]) -> Self {
        Self {
            method: ForwardMethod::Post,
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The route path joined with `/`.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

impl RaftCommand {
    /// Get the kind of this command.
    pub fn kind(&self) -> CommandKind {
        match self {
            RaftCommand::SetStatic(_) => CommandKind::SetStatic,
            RaftCommand::AddInternalRoute(_) => CommandKind::AddInternalRoute,
            RaftCommand::SetOperation(_) => CommandKind::SetOperation,
            RaftCommand::SetProject(_) => CommandKind::SetProject,
            RaftCommand::SetDeploy(_) => CommandKind::SetDeploy,
            RaftCommand::Delete(_) => CommandKind::Delete,
        }
    }

    /// Serialize the command for the log.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a command read from the log.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(bytes).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// The leader API route this command is forwarded to.
    pub fn forward_route(&self) -> ForwardRoute {
        match self {
            RaftCommand::SetStatic(_) => ForwardRoute::post(&["static"]),
            RaftCommand::AddInternalRoute(_) => ForwardRoute::post(&["static", "internal"]),
            RaftCommand::SetOperation(_) => ForwardRoute::post(&["operation"]),
            RaftCommand::SetProject(_) => ForwardRoute::post(&["projects"]),
            RaftCommand::SetDeploy(_) => ForwardRoute::post(&["deploy"]),
            RaftCommand::Delete(id) => ForwardRoute {
                method: ForwardMethod::Delete,
                segments: vec![id.clone()],
            },
        }
    }

    /// The body sent when forwarding: the bare payload, not the command.
    ///
    /// Deletes carry the id in the path and have no body.
    pub fn forward_body(&self) -> Result<Option<serde_json::Value>, Error> {
        let value = match self {
            RaftCommand::SetStatic(s) | RaftCommand::AddInternalRoute(s) => serde_json::to_value(s),
            RaftCommand::SetOperation(op) => serde_json::to_value(op),
            RaftCommand::SetProject(project) => serde_json::to_value(project),
            RaftCommand::SetDeploy(deploy) => serde_json::to_value(deploy),
            RaftCommand::Delete(_) => return Ok(None),
        };

        value
            .map(Some)
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}
