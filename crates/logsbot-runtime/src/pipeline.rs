//! The event-to-notification pipeline.
//!
//! [`Pipeline`] owns all mutable state (the rate-limit table and the session
//! tracker) together with its collaborators, so independent instances never
//! share anything. Membership events flow through
//! classify → self filter → rate limit → name lookup → enrichment → compose
//! → fan-out. Lifecycle transitions skip straight to compose → fan-out.
//!
//! No public entry point returns an error: failures either degrade to a
//! partial result or are handed to the [`ErrorReporter`].

use std::sync::Arc;

use chrono::Utc;
use logsbot_core::catalog::{EnglishCatalog, MessageCatalog};
use logsbot_core::composer::{
    NotificationComposer, NotificationPayload, PayloadRenderer, PlainRenderer,
};
use logsbot_core::events::{classify, is_self_caused, MembershipEvent, MembershipKind, RawEvent};
use logsbot_core::rate_limit::{RateLimiter, DEFAULT_COOLDOWN_MS, DEFAULT_MAX_TRACKED};
use logsbot_core::session::{LifecycleIntent, LifecycleKind, SessionTracker};
use logsbot_core::time_utils::TimezoneHandler;
use logsbot_core::Result;

use crate::attachment::AttachmentResolver;
use crate::dispatcher::{DeliveryReport, FanoutDispatcher};
use crate::enricher::ThreadEnricher;
use crate::ports::{MessageTransport, ThreadInfoSource, ThreadStore, UserDirectory};
use crate::reporter::ErrorReporter;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Static configuration of one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The bot's own identity.
    pub bot_id: String,
    /// Operator recipients; the first one also receives error notices.
    pub recipients: Vec<String>,
    pub cooldown_ms: u64,
    pub max_tracked_threads: usize,
    /// IANA timezone used for printed timestamps.
    pub timezone: String,
    /// Directories searched for the notification attachment.
    pub asset_dirs: Vec<std::path::PathBuf>,
}

impl PipelineConfig {
    pub fn new(bot_id: impl Into<String>, recipients: Vec<String>) -> Self {
        Self {
            bot_id: bot_id.into(),
            recipients,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            max_tracked_threads: DEFAULT_MAX_TRACKED,
            timezone: "UTC".to_string(),
            asset_dirs: Vec::new(),
        }
    }
}

/// External capabilities the pipeline relies on.
#[derive(Clone)]
pub struct Collaborators {
    pub transport: Arc<dyn MessageTransport>,
    pub users: Arc<dyn UserDirectory>,
    pub live: Arc<dyn ThreadInfoSource>,
    pub store: Arc<dyn ThreadStore>,
}

/// What happened to one membership event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Not a self add/remove notification.
    Ignored,
    /// The bot performed the change itself.
    SelfCaused,
    /// Another notice for the same thread was sent within the cooldown.
    RateLimited,
    /// The notice was fanned out.
    Delivered(DeliveryReport),
    /// The pipeline failed and the error reporter was invoked.
    Failed,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Owned context for every pipeline invocation.
pub struct Pipeline {
    config: PipelineConfig,
    limiter: RateLimiter,
    sessions: SessionTracker,
    transport: Arc<dyn MessageTransport>,
    users: Arc<dyn UserDirectory>,
    enricher: ThreadEnricher,
    composer: NotificationComposer,
    dispatcher: FanoutDispatcher,
    reporter: ErrorReporter,
    attachments: AttachmentResolver,
    clock: TimezoneHandler,
}

impl Pipeline {
    /// Build a pipeline with the English catalog and plain renderer.
    pub fn new(config: PipelineConfig, collaborators: Collaborators) -> Self {
        Self::with_presentation(
            config,
            collaborators,
            Arc::new(EnglishCatalog),
            Arc::new(PlainRenderer),
        )
    }

    /// Build a pipeline with a custom catalog and renderer.
    pub fn with_presentation(
        config: PipelineConfig,
        collaborators: Collaborators,
        catalog: Arc<dyn MessageCatalog>,
        renderer: Arc<dyn PayloadRenderer>,
    ) -> Self {
        let composer = NotificationComposer::new(catalog);
        let Collaborators {
            transport,
            users,
            live,
            store,
        } = collaborators;

        Self {
            limiter: RateLimiter::with_max_tracked(config.max_tracked_threads),
            sessions: SessionTracker::new(),
            enricher: ThreadEnricher::new(live, store),
            dispatcher: FanoutDispatcher::new(Arc::clone(&transport), Arc::clone(&renderer)),
            reporter: ErrorReporter::new(Arc::clone(&transport), composer.clone(), renderer),
            attachments: AttachmentResolver::new(config.asset_dirs.clone()),
            clock: TimezoneHandler::new(&config.timezone),
            composer,
            transport,
            users,
            config,
        }
    }

    // ── Membership events ─────────────────────────────────────────────────

    /// Run one host notification through the pipeline.
    pub async fn handle_event(&self, raw: &RawEvent) -> EventOutcome {
        self.handle_event_with(raw, self.users.as_ref()).await
    }

    /// Same as [`Pipeline::handle_event`] with a substitute user directory.
    pub(crate) async fn handle_event_with(
        &self,
        raw: &RawEvent,
        users: &dyn UserDirectory,
    ) -> EventOutcome {
        let event = classify(raw, &self.config.bot_id);

        if event.kind == MembershipKind::Other {
            tracing::debug!(
                log_type = %raw.log_message_type,
                thread_id = %event.thread_id,
                "event ignored"
            );
            return EventOutcome::Ignored;
        }

        if is_self_caused(&event, &self.config.bot_id) {
            tracing::debug!(thread_id = %event.thread_id, "self-caused event suppressed");
            return EventOutcome::SelfCaused;
        }

        if !self
            .limiter
            .admit(&event.thread_id, Utc::now(), self.config.cooldown_ms)
        {
            tracing::debug!(thread_id = %event.thread_id, "event rate limited");
            return EventOutcome::RateLimited;
        }

        match self.notify_membership(&event, users).await {
            Ok(report) => EventOutcome::Delivered(report),
            Err(e) => {
                self.reporter
                    .report_failure(&e, self.primary_recipient())
                    .await;
                EventOutcome::Failed
            }
        }
    }

    async fn notify_membership(
        &self,
        event: &MembershipEvent,
        users: &dyn UserDirectory,
    ) -> Result<DeliveryReport> {
        let actor_name = users.name_of(&event.actor_id).await?;

        let snapshot = match event.kind {
            MembershipKind::Added => self.enricher.enrich_added(&event.thread_id).await,
            _ => self.enricher.enrich_removed(&event.thread_id).await,
        };

        let time = self.clock.format_log_time(Utc::now());
        let payload = self
            .composer
            .compose_membership_notice(event, &actor_name, &snapshot, &time)?;

        tracing::info!(
            kind = %event.kind,
            actor = %event.actor_id,
            thread_id = %event.thread_id,
            group = %snapshot.name,
            members = snapshot.member_count,
            category = %snapshot.category,
            host_timestamp = event.timestamp_raw.as_deref().unwrap_or("-"),
            "membership notice composed"
        );

        Ok(self.broadcast(&payload).await)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Announce process startup; only the first call per instance sends.
    pub async fn on_ready(&self) -> Option<DeliveryReport> {
        let intent = self.sessions.on_startup(Utc::now())?;
        Some(self.announce(&intent).await)
    }

    /// Announce a restart with the uptime of the session that just ended.
    pub async fn on_restart(&self) -> DeliveryReport {
        let intent = self.sessions.on_restart(Utc::now());
        self.announce(&intent).await
    }

    /// Send a startup notice without touching session state.
    pub(crate) async fn announce_startup_now(&self) -> DeliveryReport {
        let intent = LifecycleIntent {
            kind: LifecycleKind::Startup,
            at: Utc::now(),
            previous_uptime: None,
        };
        self.announce(&intent).await
    }

    async fn announce(&self, intent: &LifecycleIntent) -> DeliveryReport {
        let time = self.clock.format_log_time(intent.at);
        let payload = self.composer.compose_lifecycle_notice(
            intent.kind,
            &time,
            intent.previous_uptime.as_deref(),
        );
        tracing::info!(kind = ?intent.kind, time = %time, "lifecycle notice composed");
        self.broadcast(&payload).await
    }

    // ── Shared helpers ────────────────────────────────────────────────────

    async fn broadcast(&self, payload: &NotificationPayload) -> DeliveryReport {
        let attachment = self.attachments.resolve().await;
        self.dispatcher
            .dispatch(payload, &self.config.recipients, attachment)
            .await
    }

    /// The bot identity this pipeline filters against.
    pub fn bot_id(&self) -> &str {
        &self.config.bot_id
    }

    /// Recipient of error notices.
    pub fn primary_recipient(&self) -> Option<&str> {
        self.config.recipients.first().map(String::as_str)
    }

    /// Session state, for diagnostics.
    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub(crate) fn transport(&self) -> &Arc<dyn MessageTransport> {
        &self.transport
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
