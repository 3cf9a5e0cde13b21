//! Chat data model and the displayed-timestamp ordering key.

use regex::Regex;
use std::sync::OnceLock;

/// One rendered row of the host's chat panel, as delivered with each
/// mutation notification.
#[derive(Debug, Clone, Default)]
pub struct ChatItem {
    /// Host-assigned per-row identity.
    pub id: String,
    /// Displayed `±mm:ss` timestamp. System/structural rows have none.
    pub timestamp: Option<String>,
    /// Rendered message markup. Rows like membership joins have none.
    pub message_html: Option<String>,
}

/// A chat message parsed from a panel row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    /// Stable while the panel lives, but may be recycled across full
    /// panel rebuilds.
    pub id: String,
    /// Ordering key derived from the displayed timestamp. Multiple chats
    /// may share an `ord`, and it jumps backward when the panel is rebuilt
    /// (e.g. after a seek).
    pub ord: i64,
    /// Rendered markup, injected verbatim into the overlay element. Never
    /// parsed by the engine.
    pub message_html: String,
}

impl Chat {
    /// Parse a panel row into a chat, or `None` for rows the engine does
    /// not see: missing timestamp, missing message, malformed timestamp.
    pub fn from_item(item: &ChatItem) -> Option<Self> {
        let ord = timestamp_to_ord(item.timestamp.as_deref()?)?;
        let message_html = item.message_html.clone().filter(|m| !m.is_empty())?;
        Some(Self {
            id: item.id.clone(),
            ord,
            message_html,
        })
    }
}

/// The last chat confirmed as already shown, the reference point for
/// detecting new messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub id: Option<String>,
    pub ord: i64,
}

impl Default for Cursor {
    fn default() -> Self {
        // i64::MIN stands in for -infinity: everything is newer than a
        // fresh cursor.
        Self {
            id: None,
            ord: i64::MIN,
        }
    }
}

impl Cursor {
    pub fn of(chat: &Chat) -> Self {
        Self {
            id: Some(chat.id.clone()),
            ord: chat.ord,
        }
    }
}

fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(-?)(\d+):([0-5]\d)$").expect("invalid regex"))
}

/// Parse a displayed `±mm:ss` timestamp into an ordering key in seconds.
///
/// The sign applies to the whole value, so `-1:30` is 90 seconds before
/// the stream origin. Malformed or out-of-range text (seconds >= 60,
/// non-numeric fields) yields `None`; the caller skips the single row
/// rather than failing the batch.
pub fn timestamp_to_ord(text: &str) -> Option<i64> {
    let caps = timestamp_regex().captures(text.trim())?;
    let sign: i64 = if &caps[1] == "-" { -1 } else { 1 };
    let mins: i64 = caps[2].parse().ok()?;
    let secs: i64 = caps[3].parse().ok()?;
    Some(sign * (mins * 60 + secs))
}
