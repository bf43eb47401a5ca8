mod bootstrap;
mod bridge;
mod directory;

use std::sync::Arc;

use anyhow::Result;
use logsbot_core::settings::{data_dir, Settings};
use logsbot_runtime::pipeline::{Collaborators, Pipeline, PipelineConfig};

use crate::bridge::LineTransport;
use crate::directory::SnapshotDirectory;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level)?;
    if let Err(e) = bootstrap::ensure_directories(&data_dir()) {
        tracing::warn!(error = %e, "could not create data directories");
    }

    tracing::info!("logsbot v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Bot: {}, recipients: {}, timezone: {}, cooldown: {}ms",
        settings.bot_id,
        settings.recipients.len(),
        settings.timezone,
        settings.cooldown_ms
    );
    if settings.recipients.is_empty() {
        tracing::warn!("no recipients configured; notices will be dropped");
    }

    let directory = match SnapshotDirectory::load(settings.directory.clone()).await {
        Ok(directory) => directory,
        Err(e) => {
            tracing::warn!(error = %e, "directory unreadable; starting with an empty snapshot");
            SnapshotDirectory::new(settings.directory.clone())
        }
    };
    let directory = Arc::new(directory);
    let transport = Arc::new(LineTransport::new(tokio::io::stdout()));

    let config = PipelineConfig {
        cooldown_ms: settings.cooldown_ms,
        max_tracked_threads: settings.max_tracked_threads,
        timezone: settings.timezone.clone(),
        asset_dirs: settings.asset_dirs.clone(),
        ..PipelineConfig::new(settings.bot_id.clone(), settings.recipients.clone())
    };
    let pipeline = Pipeline::new(
        config,
        Collaborators {
            transport,
            users: directory.clone(),
            live: directory.clone(),
            store: directory,
        },
    );

    pipeline.on_ready().await;

    tokio::select! {
        result = bridge::run(&pipeline, tokio::io::stdin()) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
        }
    }

    tracing::info!("logsbot stopped");
    Ok(())
}
