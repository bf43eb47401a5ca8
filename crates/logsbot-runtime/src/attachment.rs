//! Discovery of the optional image attached to every notification.
//!
//! Candidates are probed per extension, then per directory, and the first
//! readable file wins. Having no attachment is normal, not an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::ports::Attachment;

/// Base file name probed in every directory.
pub const ATTACHMENT_STEM: &str = "log";
/// Extensions in order of preference.
pub const ATTACHMENT_EXTENSIONS: &[&str] = &["gif", "jpg", "png"];

/// Finds the notification attachment in a list of directories.
#[derive(Debug, Clone, Default)]
pub struct AttachmentResolver {
    dirs: Vec<PathBuf>,
}

impl AttachmentResolver {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Every candidate path, in probe order.
    ///
    /// With directories `tmp` and `assets` this is `tmp/log.gif`,
    /// `assets/log.gif`, `tmp/log.jpg`, `assets/log.jpg`, `tmp/log.png`,
    /// `assets/log.png`.
    pub fn candidates(&self) -> Vec<PathBuf> {
        ATTACHMENT_EXTENSIONS
            .iter()
            .flat_map(|ext| {
                self.dirs
                    .iter()
                    .map(move |dir| dir.join(format!("{ATTACHMENT_STEM}.{ext}")))
            })
            .collect()
    }

    /// Load the first existing candidate.
    pub async fn resolve(&self) -> Option<Arc<Attachment>> {
        for path in self.candidates() {
            if !is_file(&path).await {
                continue;
            }
            match tokio::fs::read(&path).await {
                Ok(data) => {
                    tracing::debug!(path = %path.display(), "attachment found");
                    return Some(Arc::new(Attachment { path, data }));
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        path = %path.display(),
                        "attachment unreadable; trying next candidate"
                    );
                }
            }
        }
        None
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
