//! Single-node replicated log.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use configsync_proto::ClusterRoute;

use crate::capability::ReplicatedLog;
use crate::error::LogError;
use crate::storage::applier::ConfigApplier;
use crate::types::ApplyAck;

/// An in-process log for a cluster of one.
///
/// The node is always the leader. Entries are applied in submission order as
/// soon as they are appended.
pub struct LocalLog {
    /// Address reported as the leader.
    advertise_addr: String,
    /// Apply callback for committed entries.
    applier: ConfigApplier,
    /// Index of the last applied entry. Held while applying to keep order.
    applied_index: Mutex<u64>,
}

impl LocalLog {
    /// Create a log that applies entries through `applier`.
    pub fn new(advertise_addr: impl Into<String>, applier: ConfigApplier) -> Self {
        Self {
            advertise_addr: advertise_addr.into(),
            applier,
            applied_index: Mutex::new(0),
        }
    }

    /// Number of entries applied so far.
    pub fn applied_index(&self) -> u64 {
        *self.applied_index.lock()
    }
}

#[async_trait]
impl ReplicatedLog for LocalLog {
    async fn verify_leader(&self) -> Result<(), LogError> {
        Ok(())
    }

    fn leader(&self) -> Option<ClusterRoute> {
        Some(self.advertise_addr.clone())
    }

    async fn apply(
        &self,
        command: Vec<u8>,
        _timeout: Option<Duration>,
    ) -> Result<ApplyAck, LogError> {
        let mut index = self.applied_index.lock();
        let ack = self
            .applier
            .apply(&command)
            .map_err(|e| LogError::Rejected(e.to_string()))?;
        *index += 1;
        Ok(ack)
    }

    fn num_nodes(&self) -> usize {
        1
    }
}
