//! configsync protocol types.
//!
//! This crate defines the replicated configuration document and the commands
//! that mutate it.
//!
//! # Modules
//!
//! - [`config`] - The configuration document schema
//! - [`command`] - The [`RaftCommand`] tagged union written to the log
//! - [`response`] - Leader API response decoding
//! - [`error`] - Protocol error types
//!
//! # Serialization
//!
//! Commands are serialized as JSON with an explicit kind tag:
//!
//! ```ignore
//! use configsync_proto::{Project, RaftCommand};
//!
//! let command = RaftCommand::SetProject(Project::new("shop", "Shop"));
//! let bytes = command.encode()?;
//! assert_eq!(RaftCommand::decode(&bytes)?, command);
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod response;

pub use error::Error;

pub use command::{CommandKind, ForwardMethod, ForwardRoute, RaftCommand};
pub use config::{
    Config, DeployConfig, OperationConfig, OperationMode, Project, RegistryConfig, Route,
    RouteKind, RouteSource, RouteTarget, Secret, StaticConfig,
};
pub use response::ApiResponse;

/// Leader address as reported by the replicated log.
pub type ClusterRoute = String;
