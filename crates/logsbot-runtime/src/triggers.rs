//! Manual diagnostic triggers typed into a chat.
//!
//! `!testlog`, `!testrestart` and `!teststartup` synthesise the matching
//! event, push it through the same [`Pipeline`] entry points as real events
//! and confirm in the chat they were typed in.

use async_trait::async_trait;
use logsbot_core::events::RawEvent;
use logsbot_core::Result;
use serde::{Deserialize, Serialize};

use crate::pipeline::{EventOutcome, Pipeline};
use crate::ports::{OutboundMessage, UserDirectory};

/// Actor name used for `!testlog`.
pub const TEST_USER_NAME: &str = "Test User";

/// A chat message as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "threadID")]
    pub thread_id: String,
    #[serde(rename = "senderID")]
    pub sender_id: String,
}

/// Recognised diagnostic commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualTrigger {
    TestLog,
    TestRestart,
    TestStartup,
}

impl ManualTrigger {
    /// Match a whole chat body, ignoring case and surrounding whitespace.
    pub fn parse(body: &str) -> Option<Self> {
        match body.trim().to_lowercase().as_str() {
            "!testlog" => Some(ManualTrigger::TestLog),
            "!testrestart" => Some(ManualTrigger::TestRestart),
            "!teststartup" => Some(ManualTrigger::TestStartup),
            _ => None,
        }
    }

    /// Confirmation sent back to the chat.
    pub fn confirmation(self) -> &'static str {
        match self {
            ManualTrigger::TestLog => "✅ Test log triggered!",
            ManualTrigger::TestRestart => "✅ Test restart notification triggered!",
            ManualTrigger::TestStartup => "✅ Test startup notification triggered!",
        }
    }
}

/// Names every user [`TEST_USER_NAME`].
struct TestUsers;

#[async_trait]
impl UserDirectory for TestUsers {
    async fn name_of(&self, _user_id: &str) -> Result<String> {
        Ok(TEST_USER_NAME.to_string())
    }
}

/// Run the trigger in `chat`, if it contains one.
///
/// Returns the trigger that ran. The startup trigger sends a startup notice
/// without consuming the once-per-process startup announcement.
pub async fn handle_chat(pipeline: &Pipeline, chat: &ChatMessage) -> Option<ManualTrigger> {
    let trigger = ManualTrigger::parse(chat.body.as_deref()?)?;
    tracing::info!(
        ?trigger,
        thread_id = %chat.thread_id,
        sender = %chat.sender_id,
        "manual trigger"
    );

    match trigger {
        ManualTrigger::TestLog => {
            let raw =
                RawEvent::synthetic_self_add(pipeline.bot_id(), &chat.sender_id, &chat.thread_id);
            let outcome = pipeline.handle_event_with(&raw, &TestUsers).await;
            if !matches!(outcome, EventOutcome::Delivered(_)) {
                tracing::info!(?outcome, "test log produced no notice");
            }
        }
        ManualTrigger::TestRestart => {
            pipeline.on_restart().await;
        }
        ManualTrigger::TestStartup => {
            pipeline.announce_startup_now().await;
        }
    }

    let reply = OutboundMessage::text(trigger.confirmation());
    if let Err(e) = pipeline.transport().send(&reply, &chat.thread_id).await {
        tracing::warn!(error = %e, thread_id = %chat.thread_id, "could not confirm trigger");
    }

    Some(trigger)
}
