//! Collaborator traits the pipeline talks to.
//!
//! Every external capability (sending a message, naming a user, looking up
//! a group) sits behind one of these traits so the pipeline can run against
//! the real host or against test doubles.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use logsbot_core::Result;
use serde::{Deserialize, Serialize};

// ── Outbound messages ─────────────────────────────────────────────────────────

/// A file sent alongside a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

impl Attachment {
    /// File name without its directory.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// One message as handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub body: String,
    pub attachment: Option<Arc<Attachment>>,
}

impl OutboundMessage {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            attachment: None,
        }
    }
}

/// Delivers a message to a single recipient.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, message: &OutboundMessage, recipient: &str) -> Result<()>;
}

// ── Lookups ───────────────────────────────────────────────────────────────────

/// Resolves a user id to a display name.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn name_of(&self, user_id: &str) -> Result<String>;
}

/// Group metadata as reported by a live query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadInfo {
    #[serde(default)]
    pub thread_name: Option<String>,
    #[serde(default, rename = "participantIDs")]
    pub participant_ids: Vec<String>,
    #[serde(default)]
    pub is_subscribed: bool,
}

/// Live group metadata; only answers for groups the bot is still in.
#[async_trait]
pub trait ThreadInfoSource: Send + Sync {
    async fn thread_info(&self, thread_id: &str) -> Result<ThreadInfo>;
}

/// Group metadata as last persisted by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadData {
    #[serde(default)]
    pub thread_name: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default, rename = "participantIDs")]
    pub participant_ids: Vec<String>,
}

/// Persisted group metadata; still answers after the bot has left.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    async fn thread_data(&self, thread_id: &str) -> Result<Option<ThreadData>>;
}
