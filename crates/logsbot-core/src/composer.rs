//! Notification composition and rendering.
//!
//! Composition turns a classified event (or a lifecycle transition) into a
//! [`NotificationPayload`]: a title and an ordered list of body lines, all
//! text already resolved through the [`MessageCatalog`]. Turning a payload
//! into the final message body is the job of a [`PayloadRenderer`].

use std::sync::Arc;

use anyhow::anyhow;

use crate::catalog::{MessageCatalog, MessageKey};
use crate::error::Result;
use crate::events::{MembershipEvent, MembershipKind};
use crate::session::LifecycleKind;
use crate::thread::ThreadSnapshot;

/// Status reported for the session that ended on restart.
pub const PREVIOUS_SESSION_STATUS: &str = "Completed";
/// Uptime shown when the previous session start is unknown.
pub const UNKNOWN_UPTIME: &str = "Unknown";

// ── Payload ───────────────────────────────────────────────────────────────────

/// A fully composed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub body_lines: Vec<String>,
}

// ── Composer ──────────────────────────────────────────────────────────────────

/// Deterministic text assembly on top of a [`MessageCatalog`].
#[derive(Clone)]
pub struct NotificationComposer {
    catalog: Arc<dyn MessageCatalog>,
}

impl NotificationComposer {
    pub fn new(catalog: Arc<dyn MessageCatalog>) -> Self {
        Self { catalog }
    }

    /// Compose the notice for the bot joining or leaving a group.
    ///
    /// Lines, in order: the added/removed line naming the actor, the member
    /// count (only when non-zero), the group category (added only), then the
    /// footer with actor ID, group name, group ID and `timestamp`.
    pub fn compose_membership_notice(
        &self,
        event: &MembershipEvent,
        actor_name: &str,
        snapshot: &ThreadSnapshot,
        timestamp: &str,
    ) -> Result<NotificationPayload> {
        let headline = match event.kind {
            MembershipKind::Added => MessageKey::Added,
            MembershipKind::Removed => MessageKey::Kicked,
            MembershipKind::Other => {
                return Err(anyhow!(
                    "no membership notice for unclassified event in thread {}",
                    event.thread_id
                )
                .into())
            }
        };

        let mut body_lines = vec![self.catalog.format(headline, &[actor_name])];

        if snapshot.member_count > 0 {
            let count = snapshot.member_count.to_string();
            body_lines.push(self.catalog.format(MessageKey::CountMembers, &[count.as_str()]));
        }

        if event.kind == MembershipKind::Added {
            body_lines.push(
                self.catalog
                    .format(MessageKey::GroupType, &[snapshot.category.as_str()]),
            );
        }

        body_lines.push(self.catalog.format(
            MessageKey::Footer,
            &[
                event.actor_id.as_str(),
                snapshot.name.as_str(),
                event.thread_id.as_str(),
                timestamp,
            ],
        ));

        Ok(NotificationPayload {
            title: self.catalog.format(MessageKey::Title, &[]),
            body_lines,
        })
    }

    /// Compose a startup or restart notice.
    ///
    /// For a restart, `extra` is the formatted previous uptime; `None` renders
    /// as [`UNKNOWN_UPTIME`]. Startup notices ignore `extra`.
    pub fn compose_lifecycle_notice(
        &self,
        kind: LifecycleKind,
        timestamp: &str,
        extra: Option<&str>,
    ) -> NotificationPayload {
        match kind {
            LifecycleKind::Startup => NotificationPayload {
                title: self.catalog.format(MessageKey::StartupTitle, &[]),
                body_lines: vec![self.catalog.format(MessageKey::StartupMessage, &[timestamp])],
            },
            LifecycleKind::Restart => NotificationPayload {
                title: self.catalog.format(MessageKey::RestartTitle, &[]),
                body_lines: vec![self.catalog.format(
                    MessageKey::RestartMessage,
                    &[
                        extra.unwrap_or(UNKNOWN_UPTIME),
                        PREVIOUS_SESSION_STATUS,
                        timestamp,
                    ],
                )],
            },
        }
    }

    /// Compose the single-line notice sent when the pipeline fails.
    pub fn compose_error_notice(&self, reason: &str) -> NotificationPayload {
        NotificationPayload {
            title: self.catalog.format(MessageKey::Error, &[reason]),
            body_lines: Vec::new(),
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Turns a payload into the message body handed to the transport.
pub trait PayloadRenderer: Send + Sync {
    fn render(&self, payload: &NotificationPayload) -> String;
}

/// Title followed by each body line, newline separated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl PayloadRenderer for PlainRenderer {
    fn render(&self, payload: &NotificationPayload) -> String {
        let mut out = payload.title.clone();
        for line in &payload.body_lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EnglishCatalog;

    fn composer() -> NotificationComposer {
        NotificationComposer::new(Arc::new(EnglishCatalog))
    }

    fn event(kind: MembershipKind) -> MembershipEvent {
        MembershipEvent {
            kind,
            actor_id: "42".to_string(),
            thread_id: "9000".to_string(),
            timestamp_raw: None,
        }
    }

    const TS: &str = "07/03/2024 09:05:02";

    #[test]
    fn test_added_notice_line_order() {
        let snap = ThreadSnapshot::new(Some("Rustaceans"), 12, true);
        let payload = composer()
            .compose_membership_notice(&event(MembershipKind::Added), "Alice", &snap, TS)
            .unwrap();

        assert!(payload.title.contains("Bot Logs"));
        assert_eq!(payload.body_lines.len(), 4);
        assert!(payload.body_lines[0].contains("Added by: Alice"));
        assert_eq!(payload.body_lines[1], "👥 Total Members: 12");
        assert_eq!(payload.body_lines[2], "🏷️ Group Type: Premium Group");
        assert!(payload.body_lines[3].contains("User ID: 42"));
        assert!(payload.body_lines[3].contains("Group Name: Rustaceans"));
        assert!(payload.body_lines[3].contains("Group ID: 9000"));
        assert!(payload.body_lines[3].ends_with(TS));
    }

    #[test]
    fn test_added_notice_omits_zero_member_count() {
        let payload = composer()
            .compose_membership_notice(
                &event(MembershipKind::Added),
                "Alice",
                &ThreadSnapshot::fallback(),
                TS,
            )
            .unwrap();

        assert_eq!(payload.body_lines.len(), 3);
        assert!(!payload.body_lines.iter().any(|l| l.contains("Total Members")));
        assert_eq!(payload.body_lines[1], "🏷️ Group Type: Regular Group");
        assert!(payload.body_lines[2].contains("Group Name: Unnamed Group"));
    }

    #[test]
    fn test_removed_notice_has_no_category() {
        let snap = ThreadSnapshot::new(Some("Rustaceans"), 5, false);
        let payload = composer()
            .compose_membership_notice(&event(MembershipKind::Removed), "Bob", &snap, TS)
            .unwrap();

        assert_eq!(payload.body_lines.len(), 3);
        assert!(payload.body_lines[0].contains("Kicked by: Bob"));
        assert_eq!(payload.body_lines[1], "👥 Total Members: 5");
        assert!(!payload.body_lines.iter().any(|l| l.contains("Group Type")));
    }

    #[test]
    fn test_other_event_is_an_error() {
        let result = composer().compose_membership_notice(
            &event(MembershipKind::Other),
            "Bob",
            &ThreadSnapshot::fallback(),
            TS,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_startup_notice() {
        let payload = composer().compose_lifecycle_notice(LifecycleKind::Startup, TS, None);
        assert!(payload.title.contains("Bot Startup Logs"));
        assert_eq!(payload.body_lines.len(), 1);
        assert!(payload.body_lines[0].contains(&format!("Startup Time: {TS}")));
    }

    #[test]
    fn test_restart_notice_with_uptime() {
        let payload =
            composer().compose_lifecycle_notice(LifecycleKind::Restart, TS, Some("3h 42m"));
        assert!(payload.title.contains("Bot Restart Logs"));
        let body = &payload.body_lines[0];
        assert!(body.contains("Previous Uptime: 3h 42m"));
        assert!(body.contains("Previous Session: Completed"));
        assert!(body.contains(&format!("Restart Time: {TS}")));
    }

    #[test]
    fn test_restart_notice_unknown_uptime() {
        let payload = composer().compose_lifecycle_notice(LifecycleKind::Restart, TS, None);
        assert!(payload.body_lines[0].contains("Previous Uptime: Unknown"));
    }

    #[test]
    fn test_plain_renderer_joins_lines() {
        let payload = NotificationPayload {
            title: "T".to_string(),
            body_lines: vec!["a".to_string(), "b\nc".to_string()],
        };
        assert_eq!(PlainRenderer.render(&payload), "T\na\nb\nc");
    }

    #[test]
    fn test_plain_renderer_title_only() {
        let payload = composer().compose_error_notice("boom");
        assert_eq!(
            PlainRenderer.render(&payload),
            "❌ Error processing bot log event: boom"
        );
    }
}
