//! Test doubles for the sync manager's capabilities.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use configsync_proto::{Config, Project};
use configsync_raft::{
    AdminValidator, ApplyAck, CommandForwarder, ForwardRequest, LogError, ReplicatedLog,
    SyncConfig, SyncError, SyncManager,
};

/// Ordered record of capability calls, shared between doubles.
pub type Events = Arc<Mutex<Vec<String>>>;

pub fn events() -> Events {
    Arc::new(Mutex::new(Vec::new()))
}

/// Scripted replicated log.
pub struct MockLog {
    pub leader: bool,
    pub leader_addr: Option<String>,
    pub nodes: usize,
    pub apply_error: Option<String>,
    pub applied: Mutex<Vec<Vec<u8>>>,
    pub timeouts: Mutex<Vec<Option<Duration>>>,
    pub events: Events,
}

impl MockLog {
    pub fn leading(events: Events) -> Self {
        Self {
            leader: true,
            leader_addr: Some("10.0.0.1:7000".into()),
            nodes: 3,
            apply_error: None,
            applied: Mutex::new(Vec::new()),
            timeouts: Mutex::new(Vec::new()),
            events,
        }
    }

    pub fn following(events: Events, leader_addr: Option<&str>) -> Self {
        Self {
            leader: false,
            leader_addr: leader_addr.map(str::to_string),
            ..Self::leading(events)
        }
    }

    pub fn with_apply_error(mut self, message: &str) -> Self {
        self.apply_error = Some(message.to_string());
        self
    }

    pub fn with_nodes(mut self, nodes: usize) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn applied_count(&self) -> usize {
        self.applied.lock().len()
    }
}

#[async_trait]
impl ReplicatedLog for MockLog {
    async fn verify_leader(&self) -> Result<(), LogError> {
        if self.leader {
            Ok(())
        } else {
            Err(LogError::NotLeader)
        }
    }

    fn leader(&self) -> Option<String> {
        self.leader_addr.clone()
    }

    async fn apply(
        &self,
        command: Vec<u8>,
        timeout: Option<Duration>,
    ) -> Result<ApplyAck, LogError> {
        self.events.lock().push("apply".into());
        self.timeouts.lock().push(timeout);
        self.applied.lock().push(command);
        match &self.apply_error {
            Some(message) => Err(LogError::Rejected(message.clone())),
            None => Ok(ApplyAck::Applied),
        }
    }

    fn num_nodes(&self) -> usize {
        self.nodes
    }
}

/// Forwarder that records requests and returns a scripted result.
pub struct MockForwarder {
    pub requests: Mutex<Vec<ForwardRequest>>,
    pub error: Option<String>,
    pub events: Events,
    /// When set, `send` signals `entered` and waits for `release`.
    pub gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl MockForwarder {
    pub fn new(events: Events) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            error: None,
            events,
            gate: None,
        }
    }

    pub fn failing(events: Events, message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::new(events)
        }
    }

    pub fn gated(events: Events, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        Self {
            gate: Some((entered, release)),
            ..Self::new(events)
        }
    }

    pub fn last_request(&self) -> Option<ForwardRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl CommandForwarder for MockForwarder {
    async fn send(&self, request: ForwardRequest) -> Result<(), SyncError> {
        self.events.lock().push("forward".into());
        self.requests.lock().push(request);

        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }

        match &self.error {
            Some(message) => Err(SyncError::Forward(message.clone())),
            None => Ok(()),
        }
    }
}

/// Validator that records calls and returns a fixed answer.
pub struct RecordingValidator {
    pub allow: bool,
    pub events: Events,
    pub seen: Mutex<Vec<(usize, String)>>,
}

impl RecordingValidator {
    pub fn new(events: Events, allow: bool) -> Self {
        Self {
            allow,
            events,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl AdminValidator for RecordingValidator {
    fn validate_sync_operation(&self, current: &Config, project: &Project) -> bool {
        self.events.lock().push("validate".into());
        self.seen
            .lock()
            .push((current.project_count(), project.id.clone()));
        self.allow
    }
}

/// A sync manager wired to the given doubles.
pub fn manager(
    log: Arc<MockLog>,
    forwarder: Arc<MockForwarder>,
    validator: Arc<RecordingValidator>,
) -> SyncManager {
    SyncManager::new(SyncConfig::default(), log, forwarder, validator)
}
