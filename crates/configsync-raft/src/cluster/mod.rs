//! Cluster-facing components.
//!
//! This module provides:
//! - [`SyncManager`] - Leader-aware entry point for configuration changes
//! - Leader address parsing and HTTP forwarding
//! - [`LocalLog`] - A single-node log for standalone deployments

pub mod local;
pub mod manager;
pub mod router;

pub use local::LocalLog;
pub use manager::{SharedSyncManager, SyncManager};
pub use router::{HttpForwarder, LeaderAddress};
