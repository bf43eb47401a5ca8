//! Concurrent fan-out of one notification to every operator recipient.
//!
//! Each recipient gets its own task. All tasks are awaited and every outcome
//! is collected; one failing (or panicking) delivery never cancels or hides
//! another.

use std::sync::Arc;

use futures::future::join_all;
use logsbot_core::composer::{NotificationPayload, PayloadRenderer};

use crate::ports::{Attachment, MessageTransport, OutboundMessage};

// ── Report types ──────────────────────────────────────────────────────────────

/// Result of delivering to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Ok,
    Err(String),
}

impl DeliveryOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, DeliveryOutcome::Ok)
    }
}

/// One entry of a [`DeliveryReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientOutcome {
    pub recipient: String,
    pub outcome: DeliveryOutcome,
}

/// Aggregate of one dispatch call; entries follow the recipient order.
///
/// `success_count + failure_count` always equals the number of recipients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub success_count: usize,
    pub failure_count: usize,
    pub per_recipient: Vec<RecipientOutcome>,
}

impl DeliveryReport {
    fn from_outcomes(per_recipient: Vec<RecipientOutcome>) -> Self {
        let success_count = per_recipient.iter().filter(|r| r.outcome.is_ok()).count();
        Self {
            success_count,
            failure_count: per_recipient.len() - success_count,
            per_recipient,
        }
    }

    /// Outcome recorded for `recipient`, if it was part of the dispatch.
    pub fn outcome_for(&self, recipient: &str) -> Option<&DeliveryOutcome> {
        self.per_recipient
            .iter()
            .find(|r| r.recipient == recipient)
            .map(|r| &r.outcome)
    }
}

// ── FanoutDispatcher ──────────────────────────────────────────────────────────

/// Renders a payload once and delivers it to every recipient concurrently.
#[derive(Clone)]
pub struct FanoutDispatcher {
    transport: Arc<dyn MessageTransport>,
    renderer: Arc<dyn PayloadRenderer>,
}

impl FanoutDispatcher {
    pub fn new(transport: Arc<dyn MessageTransport>, renderer: Arc<dyn PayloadRenderer>) -> Self {
        Self {
            transport,
            renderer,
        }
    }

    /// Deliver `payload` to every entry of `recipients`.
    ///
    /// Waits until every delivery has settled. An empty recipient list is a
    /// no-op that yields an all-zero report.
    pub async fn dispatch(
        &self,
        payload: &NotificationPayload,
        recipients: &[String],
        attachment: Option<Arc<Attachment>>,
    ) -> DeliveryReport {
        if recipients.is_empty() {
            tracing::error!("no operator recipients configured; notification dropped");
            return DeliveryReport::default();
        }

        if let Some(att) = &attachment {
            tracing::debug!(file = %att.file_name(), "using attachment");
        }

        let message = Arc::new(OutboundMessage {
            body: self.renderer.render(payload),
            attachment,
        });

        let tasks = recipients.iter().map(|recipient| {
            let transport = Arc::clone(&self.transport);
            let message = Arc::clone(&message);
            let recipient = recipient.clone();
            tokio::spawn(async move { transport.send(&message, &recipient).await })
        });

        let settled = join_all(tasks).await;

        let outcomes = recipients
            .iter()
            .zip(settled)
            .map(|(recipient, joined)| {
                let outcome = match joined {
                    Ok(Ok(())) => {
                        tracing::info!(recipient = %recipient, "notification delivered");
                        DeliveryOutcome::Ok
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(recipient = %recipient, error = %e, "delivery failed");
                        DeliveryOutcome::Err(e.to_string())
                    }
                    Err(e) => {
                        tracing::warn!(recipient = %recipient, error = %e, "delivery task aborted");
                        DeliveryOutcome::Err(format!("delivery task aborted: {e}"))
                    }
                };
                RecipientOutcome {
                    recipient: recipient.clone(),
                    outcome,
                }
            })
            .collect();

        let report = DeliveryReport::from_outcomes(outcomes);
        if report.failure_count > 0 {
            tracing::warn!(
                successful = report.success_count,
                failed = report.failure_count,
                "notification partially delivered"
            );
        } else {
            tracing::info!(
                successful = report.success_count,
                "notification delivered to all recipients"
            );
        }
        report
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
