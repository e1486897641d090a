//! Error types for configsync-raft.

use thiserror::Error;

/// Errors reported by the replicated log.
#[derive(Debug, Error)]
pub enum LogError {
    /// This node is not the leader.
    #[error("node is not the leader")]
    NotLeader,

    /// The log refused the entry. The message is the engine's own.
    #[error("{0}")]
    Rejected(String),

    /// The log could not be reached.
    #[error("log unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur in the sync subsystem.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Forwarding to the leader failed, or the leader refused the command.
    #[error("{0}")]
    Forward(String),

    /// No leader is known.
    #[error("No leader available")]
    NoLeader,

    /// The leader address reported by the log could not be parsed.
    #[error("Invalid leader address: {0}")]
    InvalidLeaderAddress(String),

    /// A project id that cannot name a resource on the leader's API.
    #[error("Invalid project id: {0:?}")]
    InvalidProjectId(String),

    /// The admin validator refused the change.
    #[error("Please upgrade your instance")]
    PolicyRejected,

    /// The log failed to apply the command.
    #[error(transparent)]
    Log(#[from] LogError),

    /// The requested project is not in the local document.
    #[error("Given project ({0}) is not present in state")]
    ProjectNotFound(String),

    /// Command encoding or decoding failed.
    #[error(transparent)]
    Protocol(#[from] configsync_proto::Error),

    /// Flushing the document to disk failed.
    #[error(transparent)]
    Store(#[from] configsync_core::StoreError),
}
