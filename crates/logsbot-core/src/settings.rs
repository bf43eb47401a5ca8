use clap::{CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LogsbotError, Result};
use crate::rate_limit::{DEFAULT_COOLDOWN_MS, DEFAULT_MAX_TRACKED};
use crate::time_utils::{resolve_timezone, TimezoneHandler};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Announce when the bot joins or leaves a group
#[derive(Parser, Debug, Clone)]
#[command(
    name = "logsbot",
    about = "Announce when the bot joins or leaves a group",
    version
)]
pub struct Settings {
    /// The bot's own user id
    #[arg(long, env = "LOGSBOT_BOT_ID", default_value = "")]
    pub bot_id: String,

    /// Operator ids that receive notifications (comma separated)
    #[arg(long, env = "LOGSBOT_RECIPIENTS", value_delimiter = ',')]
    pub recipients: Vec<String>,

    /// JSON config file in the host bot format
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Timezone for printed timestamps (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Minimum milliseconds between two notices for the same group
    #[arg(long, default_value_t = DEFAULT_COOLDOWN_MS)]
    pub cooldown_ms: u64,

    /// Rate-limit table size above which expired entries are pruned
    #[arg(long, default_value_t = DEFAULT_MAX_TRACKED)]
    pub max_tracked_threads: usize,

    /// Directory searched for the notification attachment (repeatable)
    #[arg(long = "asset-dir")]
    pub asset_dirs: Vec<PathBuf>,

    /// JSON snapshot of user names and group data
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Logging level
    #[arg(
        long,
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── FileConfig ─────────────────────────────────────────────────────────────────

/// The subset of the host bot's JSON config that logsbot reads.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(rename = "botID", skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
    /// Operator recipients, under the host's `logsbot` key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logsbot: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(rename = "cooldownMs", skip_serializing_if = "Option::is_none")]
    pub cooldown_ms: Option<u64>,
}

impl FileConfig {
    /// Load a config file; unknown keys are ignored.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| LogsbotError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments, merge the optional config file and resolve
    /// defaults.
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Result<Self> {
        let matches = Settings::command().get_matches_from(args);
        let mut settings =
            Settings::from_arg_matches(&matches).map_err(|e| LogsbotError::Config(e.to_string()))?;

        if let Some(path) = settings.config.clone() {
            let file = FileConfig::load_from(&path)?;
            settings.merge_file(file, &matches);
        }

        settings.resolve()
    }

    /// Fill every value not given on the command line or through the
    /// environment from `file`.
    fn merge_file(&mut self, file: FileConfig, matches: &clap::ArgMatches) {
        if !is_arg_explicitly_set(matches, "bot_id") {
            if let Some(v) = file.bot_id {
                self.bot_id = v;
            }
        }
        if !is_arg_explicitly_set(matches, "recipients") {
            if let Some(v) = file.logsbot {
                self.recipients = v;
            }
        }
        if !is_arg_explicitly_set(matches, "timezone") {
            if let Some(v) = file.timezone {
                self.timezone = v;
            }
        }
        if !is_arg_explicitly_set(matches, "cooldown_ms") {
            if let Some(v) = file.cooldown_ms {
                self.cooldown_ms = v;
            }
        }
    }

    /// Validate and resolve sentinel values.
    fn resolve(mut self) -> Result<Self> {
        self.bot_id = self.bot_id.trim().to_string();
        if self.bot_id.is_empty() {
            return Err(LogsbotError::Config(
                "bot id is not configured (--bot-id, LOGSBOT_BOT_ID or botID)".to_string(),
            ));
        }

        self.recipients = self
            .recipients
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        self.timezone = resolve_timezone(&self.timezone);
        if !TimezoneHandler::validate_timezone(&self.timezone) {
            tracing::warn!(timezone = %self.timezone, "unknown timezone; using UTC");
            self.timezone = "UTC".to_string();
        }

        if self.asset_dirs.is_empty() {
            let data = data_dir();
            self.asset_dirs = vec![data.join("tmp"), data.join("assets")];
        }

        if self.debug {
            self.log_level = "DEBUG".to_string();
        }

        Ok(self)
    }

    /// Recipient that receives pipeline error reports.
    pub fn primary_recipient(&self) -> Option<&str> {
        self.recipients.first().map(String::as_str)
    }
}

/// Default data directory, `~/.logsbot`.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".logsbot")
}

// ── Helper: check if an arg was explicitly set ─────────────────────────────────

/// Returns `true` when `name` came from the command line or the environment
/// rather than its default value.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(clap::parser::ValueSource::CommandLine)
            | Some(clap::parser::ValueSource::EnvVariable)
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────
