//! Line-oriented bridge to the host runtime.
//!
//! Inbound: one JSON host message per stdin line. Outbound: one JSON line
//! per delivery on stdout. Malformed input is logged and skipped; nothing a
//! host sends can stop the bridge.

use async_trait::async_trait;
use logsbot_core::events::RawEvent;
use logsbot_core::Result;
use logsbot_runtime::pipeline::Pipeline;
use logsbot_runtime::ports::{MessageTransport, OutboundMessage};
use logsbot_runtime::triggers::{handle_chat, ChatMessage};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

// ── Inbound ───────────────────────────────────────────────────────────────────

/// Process lifecycle signal from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleSignal {
    Ready,
    Restart,
}

/// Anything the host can send on one line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HostMessage {
    Event(RawEvent),
    Chat(ChatMessage),
    Lifecycle { lifecycle: LifecycleSignal },
}

/// Parse one input line; blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<HostMessage>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

/// Route one input line to the pipeline.
pub async fn handle_line(pipeline: &Pipeline, line: &str) {
    let message = match parse_line(line) {
        Ok(Some(message)) => message,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed host message");
            return;
        }
    };

    match message {
        HostMessage::Event(raw) => {
            let outcome = pipeline.handle_event(&raw).await;
            tracing::debug!(?outcome, thread_id = %raw.thread_id, "event handled");
        }
        HostMessage::Chat(chat) => {
            handle_chat(pipeline, &chat).await;
        }
        HostMessage::Lifecycle { lifecycle } => match lifecycle {
            LifecycleSignal::Ready => {
                if pipeline.on_ready().await.is_none() {
                    tracing::debug!("startup already announced");
                }
            }
            LifecycleSignal::Restart => {
                pipeline.on_restart().await;
            }
        },
    }
}

/// Feed every line of `reader` to the pipeline until EOF.
pub async fn run<R>(pipeline: &Pipeline, reader: R) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        match std::str::from_utf8(&buf) {
            Ok(line) => handle_line(pipeline, line).await,
            Err(e) => tracing::warn!(error = %e, "skipping host message that is not UTF-8"),
        }
    }
    tracing::info!("host input closed");
    Ok(())
}

// ── Outbound ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboundLine<'a> {
    #[serde(rename = "recipientID")]
    recipient_id: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<String>,
}

/// Writes each delivery as a JSON line for the host to send.
pub struct LineTransport<W> {
    writer: Mutex<W>,
}

impl<W> LineTransport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> MessageTransport for LineTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, message: &OutboundMessage, recipient: &str) -> Result<()> {
        let line = OutboundLine {
            recipient_id: recipient,
            body: &message.body,
            attachment: message
                .attachment
                .as_ref()
                .map(|a| a.path.display().to_string()),
        };
        let mut encoded = serde_json::to_vec(&line)?;
        encoded.push(b'\n');

        // One lock per line keeps concurrent deliveries from interleaving.
        let mut writer = self.writer.lock().await;
        writer.write_all(&encoded).await?;
        writer.flush().await?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
