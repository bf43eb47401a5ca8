//! Test doubles for the collaborator traits.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use logsbot_core::{LogsbotError, Result};
use parking_lot::Mutex;

use crate::ports::{
    MessageTransport, OutboundMessage, ThreadData, ThreadInfo, ThreadInfoSource, ThreadStore,
    UserDirectory,
};

/// Records every send; fails for configured recipients.
#[derive(Default)]
pub struct RecordingTransport {
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    sent: Mutex<Vec<(String, OutboundMessage)>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, recipient: &str) -> Self {
        self.failing.insert(recipient.to_string());
        self
    }

    pub fn delayed_for(mut self, recipient: &str, delay: Duration) -> Self {
        self.delays.insert(recipient.to_string(), delay);
        self
    }

    /// Successful sends in completion order.
    pub fn sent(&self) -> Vec<(String, OutboundMessage)> {
        self.sent.lock().clone()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|(r, _)| r == recipient)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(&self, message: &OutboundMessage, recipient: &str) -> Result<()> {
        if let Some(delay) = self.delays.get(recipient) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(recipient) {
            return Err(LogsbotError::Transport {
                recipient: recipient.to_string(),
                reason: "recipient unreachable".to_string(),
            });
        }
        self.sent
            .lock()
            .push((recipient.to_string(), message.clone()));
        Ok(())
    }
}

/// Transport that panics on every send.
pub struct PanickingTransport;

#[async_trait]
impl MessageTransport for PanickingTransport {
    async fn send(&self, _message: &OutboundMessage, recipient: &str) -> Result<()> {
        panic!("transport exploded for {recipient}");
    }
}

/// Names every user with the same string, or fails when `None`.
pub struct FixedUsers(pub Option<String>);

#[async_trait]
impl UserDirectory for FixedUsers {
    async fn name_of(&self, user_id: &str) -> Result<String> {
        self.0
            .clone()
            .ok_or_else(|| LogsbotError::UnknownUser(user_id.to_string()))
    }
}

/// Live source answering with a fixed value, or failing when `None`.
pub struct StaticLive(pub Option<ThreadInfo>);

#[async_trait]
impl ThreadInfoSource for StaticLive {
    async fn thread_info(&self, thread_id: &str) -> Result<ThreadInfo> {
        self.0
            .clone()
            .ok_or_else(|| LogsbotError::Lookup(format!("thread {thread_id} unavailable")))
    }
}

/// Store answering with a fixed value, or failing when `fail` is set.
pub struct StaticStore {
    pub data: Option<ThreadData>,
    pub fail: bool,
}

#[async_trait]
impl ThreadStore for StaticStore {
    async fn thread_data(&self, thread_id: &str) -> Result<Option<ThreadData>> {
        if self.fail {
            return Err(LogsbotError::Lookup(format!("store has no {thread_id}")));
        }
        Ok(self.data.clone())
    }
}
