//! Classification of host membership notifications.
//!
//! The host delivers every group-log notification it sees; only the ones
//! where the bot itself joins or leaves a group are interesting. Both
//! [`classify`] and [`is_self_caused`] are pure functions of their input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Log type emitted when participants are added to a thread.
pub const LOG_SUBSCRIBE: &str = "log:subscribe";
/// Log type emitted when a participant leaves or is removed from a thread.
pub const LOG_UNSUBSCRIBE: &str = "log:unsubscribe";

// ── Inbound wire shape ────────────────────────────────────────────────────────

/// A group-log notification exactly as the host runtime delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub log_message_type: String,
    #[serde(default)]
    pub log_message_data: LogMessageData,
    /// Identity of the participant that performed the change.
    #[serde(default)]
    pub author: String,
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Host timestamp; numeric or textual depending on the host version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

/// Payload of a group-log notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMessageData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_participants: Vec<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_participant_fb_id: Option<String>,
}

/// One entry of `addedParticipants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_fb_id: String,
}

impl RawEvent {
    /// Build a subscribe notification in which `author` adds `self_id` to
    /// `thread_id`. Used by the manual `!testlog` trigger.
    pub fn synthetic_self_add(self_id: &str, author: &str, thread_id: &str) -> Self {
        Self {
            log_message_type: LOG_SUBSCRIBE.to_string(),
            log_message_data: LogMessageData {
                added_participants: vec![Participant {
                    user_fb_id: self_id.to_string(),
                }],
                left_participant_fb_id: None,
            },
            author: author.to_string(),
            thread_id: thread_id.to_string(),
            timestamp: None,
        }
    }
}

// ── Classified event ──────────────────────────────────────────────────────────

/// What a notification means for the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipKind {
    Added,
    Removed,
    Other,
}

impl std::fmt::Display for MembershipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipKind::Added => write!(f, "ADDED"),
            MembershipKind::Removed => write!(f, "REMOVED"),
            MembershipKind::Other => write!(f, "OTHER"),
        }
    }
}

/// A notification reduced to the fields the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipEvent {
    pub kind: MembershipKind,
    pub actor_id: String,
    pub thread_id: String,
    pub timestamp_raw: Option<String>,
}

/// Classify `raw` relative to the bot identity `self_id`.
pub fn classify(raw: &RawEvent, self_id: &str) -> MembershipEvent {
    let data = &raw.log_message_data;
    let kind = match raw.log_message_type.as_str() {
        LOG_SUBSCRIBE
            if data
                .added_participants
                .iter()
                .any(|p| p.user_fb_id == self_id) =>
        {
            MembershipKind::Added
        }
        LOG_UNSUBSCRIBE if data.left_participant_fb_id.as_deref() == Some(self_id) => {
            MembershipKind::Removed
        }
        _ => MembershipKind::Other,
    };

    let timestamp_raw = raw.timestamp.as_ref().map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    MembershipEvent {
        kind,
        actor_id: raw.author.clone(),
        thread_id: raw.thread_id.clone(),
        timestamp_raw,
    }
}

/// `true` when the bot itself performed the change.
///
/// Such events are never announced, whatever their classification; otherwise
/// the bot would report its own actions back to itself.
pub fn is_self_caused(event: &MembershipEvent, self_id: &str) -> bool {
    event.actor_id == self_id
}

// ── Tests ─────────────────────────────────────────────────────────────────────
