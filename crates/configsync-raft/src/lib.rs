//! configsync Raft - leader-aware configuration sync.
//!
//! This crate keeps one configuration document consistent across a cluster
//! whose writes are ordered by a replicated log:
//! - Mutations on the leader are appended to the log
//! - Mutations on followers are forwarded to the leader's config API
//! - Committed entries are applied to the node-local document
//!
//! # Architecture
//!
//! The log engine, forwarding transport and admin policy are capabilities:
//! - [`ReplicatedLog`] - Leadership, leader address, apply, membership size
//! - [`CommandForwarder`] - Sends a command to the leader ([`HttpForwarder`])
//! - [`AdminValidator`] - Gate for project changes
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use configsync_raft::{
//!     shared_config, AllowAll, ConfigApplier, HttpForwarder, LocalLog, SyncConfig, SyncManager,
//! };
//!
//! let config = SyncConfig::default();
//! let document = shared_config(initial);
//! let log = LocalLog::new(&config.advertise_addr, ConfigApplier::new(document.clone()));
//! let manager = SyncManager::new(
//!     config.clone(),
//!     Arc::new(log),
//!     Arc::new(HttpForwarder::new(&config)?),
//!     Arc::new(AllowAll),
//! )
//! .with_document(document);
//!
//! manager.set_project_config(token, project).await?;
//! ```

pub mod capability;
pub mod cluster;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;

// Re-export main types
pub use capability::{AdminValidator, AllowAll, CommandForwarder, ProjectQuota, ReplicatedLog};
pub use cluster::{HttpForwarder, LeaderAddress, LocalLog, SharedSyncManager, SyncManager};
pub use config::{SyncConfig, DEFAULT_API_PREFIX, DEFAULT_FORWARD_PORT};
pub use error::{LogError, SyncError};
pub use storage::ConfigApplier;
pub use types::{shared_config, ApplyAck, ForwardRequest, SharedConfig};
