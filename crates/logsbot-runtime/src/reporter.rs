//! Last-resort error notice to the primary operator.

use std::sync::Arc;

use logsbot_core::composer::{NotificationComposer, PayloadRenderer};
use logsbot_core::LogsbotError;

use crate::ports::{MessageTransport, OutboundMessage};

/// Sends a single error notice when the pipeline fails.
///
/// Never fails itself: if the notice cannot be sent, that is only logged.
#[derive(Clone)]
pub struct ErrorReporter {
    transport: Arc<dyn MessageTransport>,
    composer: NotificationComposer,
    renderer: Arc<dyn PayloadRenderer>,
}

impl ErrorReporter {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        composer: NotificationComposer,
        renderer: Arc<dyn PayloadRenderer>,
    ) -> Self {
        Self {
            transport,
            composer,
            renderer,
        }
    }

    /// Log `error` and make one attempt to tell `primary` about it.
    pub async fn report_failure(&self, error: &LogsbotError, primary: Option<&str>) {
        tracing::error!(error = %error, "notification pipeline failed");

        let Some(primary) = primary else {
            tracing::warn!("no primary recipient configured; error notice skipped");
            return;
        };

        let payload = self.composer.compose_error_notice(&error.to_string());
        let message = OutboundMessage::text(self.renderer.render(&payload));
        if let Err(e) = self.transport.send(&message, primary).await {
            tracing::error!(error = %e, recipient = primary, "could not send error notice");
        }
    }
}
