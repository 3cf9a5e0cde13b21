//! Chat change detection.
//!
//! The host re-renders its chat panel freely: rows are appended, the whole
//! list is silently reset on seek, and re-renders may reorder rows that
//! share a timestamp. The detector keeps a single cursor (the last chat
//! confirmed as shown) and, per mutation notification, scans the panel's
//! current rows to find the ones that are genuinely new.

use crate::chat::{Chat, ChatItem, Cursor};

/// Upper bound on newer chats collected per pass. Bounds the render burst
/// when a backlog jump or message flood hits in one notification.
pub const NEWER_CHAT_LIMIT: usize = 30;

/// Result of one detection pass.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Chats newer than the cursor, in panel scan order (oldest first).
    pub newer: Vec<Chat>,
    /// False when the batch is start-of-session backlog that must not be
    /// rendered (the cursor still advanced past it).
    pub render: bool,
}

/// Detects which panel rows are new since the last pass.
#[derive(Debug)]
pub struct ChangeDetector {
    cursor: Cursor,
    first_batch: bool,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self {
            cursor: Cursor::default(),
            first_batch: true,
        }
    }

    /// Back to the start-of-session state. Called when the enclosing watch
    /// session is torn down and rebuilt (player swap, container resize).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// One detection pass over the panel's current rows.
    pub fn detect(&mut self, items: &[ChatItem]) -> Detection {
        let scan = scan_items(items, &self.cursor);
        let Some(next_cursor) = scan.newer.last().or(scan.last.as_ref()) else {
            // Panel is genuinely empty; nothing to learn from.
            return Detection {
                newer: Vec::new(),
                render: false,
            };
        };
        // Newer chats move the cursor forward. With none, resync to the
        // last row the panel shows now: after a seek the panel is rebuilt
        // with rows all "older" than a stale cursor, and a cursor that
        // never regressed would stall forever.
        self.cursor = Cursor::of(next_cursor);

        // The synthetic initial notification carries pre-existing backlog,
        // not new activity. Mark it seen but don't render it.
        let render = !self.first_batch;
        self.first_batch = false;
        Detection {
            newer: scan.newer,
            render,
        }
    }
}

struct Scan {
    newer: Vec<Chat>,
    /// Most recent parseable row in the full scan, older rows included.
    last: Option<Chat>,
}

fn scan_items(items: &[ChatItem], cursor: &Cursor) -> Scan {
    let mut newer: Vec<Chat> = Vec::new();
    let mut last: Option<Chat> = None;
    let mut boundary_seen = false;
    for item in items {
        let Some(chat) = Chat::from_item(item) else {
            continue;
        };
        last = Some(chat.clone());
        if chat.ord < cursor.ord {
            continue;
        }
        if chat.ord == cursor.ord {
            if cursor.id.as_deref() == Some(chat.id.as_str()) {
                // The cursor row itself marks the boundary; rows after it
                // with an equal ord are newer.
                boundary_seen = true;
                continue;
            }
            if !boundary_seen {
                continue;
            }
        }
        newer.push(chat);
        if newer.len() >= NEWER_CHAT_LIMIT {
            break;
        }
    }
    Scan { newer, last }
}
