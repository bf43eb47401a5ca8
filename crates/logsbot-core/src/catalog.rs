//! Message catalog.
//!
//! Notification text is looked up by [`MessageKey`] and filled with
//! positional arguments (`%1`, `%2`, ...). The composer only ever talks to
//! the [`MessageCatalog`] trait, so a different language or wording can be
//! swapped in without touching the pipeline.

/// Every message the notifier can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Title,
    Added,
    Kicked,
    CountMembers,
    GroupType,
    Footer,
    RestartTitle,
    RestartMessage,
    StartupTitle,
    StartupMessage,
    Error,
}

/// Source of localized notification text.
pub trait MessageCatalog: Send + Sync {
    /// Look up `key` and substitute `args` into its placeholders.
    fn format(&self, key: MessageKey, args: &[&str]) -> String;
}

/// Replace `%1..%n` in `template` with `args`.
///
/// A placeholder is `%` followed by every digit after it. Placeholders
/// without a matching argument are left as they are. Inserted arguments are
/// never scanned for placeholders.
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let arg = after[..digits]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| args.get(idx));
        match arg {
            Some(arg) => out.push_str(arg),
            None => out.push_str(&rest[pos..pos + 1 + digits]),
        }
        rest = &after[digits..];
    }
    out.push_str(rest);
    out
}

// ── English catalog ───────────────────────────────────────────────────────────

/// The built-in English texts.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl EnglishCatalog {
    fn template(key: MessageKey) -> &'static str {
        match key {
            MessageKey::Title => "╭───────★────────╮\n     🤖 Bot Logs\n╰───────★────────╯",
            MessageKey::Added => "✅ Bot was added to a new group!\n👑 Added by: %1",
            MessageKey::Kicked => "❌ Bot was removed from a group!\n🚫 Kicked by: %1",
            MessageKey::CountMembers => "👥 Total Members: %1",
            MessageKey::GroupType => "🏷️ Group Type: %1",
            MessageKey::Footer => {
                "🆔 User ID: %1\n👥 Group Name: %2\n🆔 Group ID: %3\n⏰ Time: %4"
            }
            MessageKey::RestartTitle => {
                "╭───────★────────╮\n     🔄 Bot Restart Logs\n╰───────★────────╯"
            }
            MessageKey::RestartMessage => {
                "✨ Bot has been restarted successfully!\n⏰ Previous Uptime: %1\n📊 Previous Session: %2\n🔄 Restart Time: %3"
            }
            MessageKey::StartupTitle => {
                "╭───────★────────╮\n     🟢 Bot Startup Logs\n╰───────★────────╯"
            }
            MessageKey::StartupMessage => {
                "✨ Bot is now online and ready!\n⏰ Startup Time: %1\n📊 Status: ✅ Operational"
            }
            MessageKey::Error => "❌ Error processing bot log event: %1",
        }
    }
}

impl MessageCatalog for EnglishCatalog {
    fn format(&self, key: MessageKey, args: &[&str]) -> String {
        substitute(Self::template(key), args)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_in_order() {
        assert_eq!(substitute("%1 and %2", &["a", "b"]), "a and b");
    }

    #[test]
    fn test_substitute_missing_argument_left_verbatim() {
        assert_eq!(substitute("%1 and %2", &["a"]), "a and %2");
    }

    #[test]
    fn test_substitute_does_not_rescan_arguments() {
        assert_eq!(
            substitute("%1 / %2", &["42", "Promo 100%1 off"]),
            "42 / Promo 100%1 off"
        );
        let text = EnglishCatalog.format(
            MessageKey::Footer,
            &["42", "Promo 100%1 off", "9000", "t"],
        );
        assert!(text.contains("Group Name: Promo 100%1 off\n"));
    }

    #[test]
    fn test_substitute_literal_percent() {
        assert_eq!(substitute("100% sure, %0 and %", &["a"]), "100% sure, %0 and %");
    }

    #[test]
    fn test_substitute_double_digit_placeholder() {
        let args: Vec<String> = (1..=10).map(|i| format!("v{i}")).collect();
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        assert_eq!(substitute("%10|%1", &refs), "v10|v1");
    }

    #[test]
    fn test_english_added() {
        let text = EnglishCatalog.format(MessageKey::Added, &["Alice"]);
        assert!(text.starts_with("✅ Bot was added to a new group!"));
        assert!(text.ends_with("👑 Added by: Alice"));
    }

    #[test]
    fn test_english_footer() {
        let text = EnglishCatalog.format(
            MessageKey::Footer,
            &["42", "Rustaceans", "9000", "01/01/2025 00:00:00"],
        );
        assert_eq!(
            text,
            "🆔 User ID: 42\n👥 Group Name: Rustaceans\n🆔 Group ID: 9000\n⏰ Time: 01/01/2025 00:00:00"
        );
    }

    #[test]
    fn test_english_error() {
        let text = EnglishCatalog.format(MessageKey::Error, &["boom"]);
        assert_eq!(text, "❌ Error processing bot log event: boom");
    }
}
