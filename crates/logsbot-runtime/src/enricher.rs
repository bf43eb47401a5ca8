//! Best-effort group metadata lookup.
//!
//! A bot that was just added can query the group live; a bot that was just
//! removed cannot, so removals read the host's persisted copy instead. Both
//! paths swallow lookup failures and hand back [`ThreadSnapshot::fallback`].

use std::sync::Arc;

use logsbot_core::thread::ThreadSnapshot;
use logsbot_core::Result;

use crate::fallback::try_or_default;
use crate::ports::{ThreadInfoSource, ThreadStore};

/// Looks up group metadata from the live source or the persisted store.
#[derive(Clone)]
pub struct ThreadEnricher {
    live: Arc<dyn ThreadInfoSource>,
    store: Arc<dyn ThreadStore>,
}

impl ThreadEnricher {
    pub fn new(live: Arc<dyn ThreadInfoSource>, store: Arc<dyn ThreadStore>) -> Self {
        Self { live, store }
    }

    /// Metadata for a group the bot just joined, queried live.
    pub async fn enrich_added(&self, thread_id: &str) -> ThreadSnapshot {
        try_or_default(
            "live thread lookup",
            self.lookup_live(thread_id),
            ThreadSnapshot::fallback(),
        )
        .await
    }

    /// Metadata for a group the bot just left, read from the store.
    pub async fn enrich_removed(&self, thread_id: &str) -> ThreadSnapshot {
        try_or_default(
            "stored thread lookup",
            self.lookup_stored(thread_id),
            ThreadSnapshot::fallback(),
        )
        .await
    }

    async fn lookup_live(&self, thread_id: &str) -> Result<ThreadSnapshot> {
        let info = self.live.thread_info(thread_id).await?;
        Ok(ThreadSnapshot::new(
            info.thread_name.as_deref(),
            info.participant_ids.len(),
            info.is_subscribed,
        ))
    }

    /// The member count prefers the stored member list and falls back to the
    /// stored participant ids.
    async fn lookup_stored(&self, thread_id: &str) -> Result<ThreadSnapshot> {
        let Some(data) = self.store.thread_data(thread_id).await? else {
            tracing::debug!(thread_id, "no stored data for thread");
            return Ok(ThreadSnapshot::fallback());
        };
        let member_count = if data.members.is_empty() {
            data.participant_ids.len()
        } else {
            data.members.len()
        };
        Ok(ThreadSnapshot::new(
            data.thread_name.as_deref(),
            member_count,
            false,
        ))
    }
}
