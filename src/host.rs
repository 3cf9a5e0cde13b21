//! Host-page collaborators.
//!
//! The engine never touches the host page directly; it sees the chat panel
//! and the overlay surface only through these interfaces. Discovery of the
//! underlying page structure belongs to the embedder.

use crate::chat::ChatItem;
use crate::error::{Error, Result};
use crate::motion::OverlayElement;

/// Seconds to keep polling for the chat panel before giving up.
pub const DEFAULT_PANEL_TIMEOUT_SECS: u64 = 10;

/// The live chat panel: yields a snapshot of its rendered rows, top to
/// bottom. The host invokes the session once per mutation batch with a
/// fresh snapshot, plus one synthetic initial call carrying backlog.
pub trait ChatPanel {
    fn snapshot(&self) -> Vec<ChatItem>;
}

/// Locates the chat panel within the host page. The panel loads lazily,
/// so a lookup may fail for a while before succeeding.
pub trait ChatPanelLocator {
    type Panel: ChatPanel;

    fn find(&mut self) -> Option<Self::Panel>;
}

/// Overlay surface side of the host: mirrors the live element set into
/// the page's render tree.
pub trait HostHooks {
    /// A new element entered the surface. Returns the rendered width in
    /// px; the engine cannot measure markup itself.
    fn inserted(&mut self, element: &OverlayElement) -> f64;

    /// An element left the visible area (or the session ended) and was
    /// destroyed.
    fn removed(&mut self, element_id: u64);

    /// Overlay opacity changed.
    fn opacity_changed(&mut self, _opacity: f64) {}
}

/// Headless surface: accepts everything and reports a nominal width.
#[derive(Debug, Clone, Copy)]
pub struct NullHooks {
    pub nominal_width: f64,
}

impl Default for NullHooks {
    fn default() -> Self {
        Self {
            nominal_width: 160.0,
        }
    }
}

impl HostHooks for NullHooks {
    fn inserted(&mut self, _element: &OverlayElement) -> f64 {
        self.nominal_width
    }

    fn removed(&mut self, _element_id: u64) {}
}

/// Poll the locator once per frame until the panel appears or the timeout
/// elapses. `next_frame` yields until the next display refresh and returns
/// the current time in ms.
///
/// On timeout the overlay stays inactive; the failure is logged and
/// surfaced to the embedder, never to the host page.
pub fn acquire_chat_panel<L: ChatPanelLocator>(
    locator: &mut L,
    mut next_frame: impl FnMut() -> f64,
    timeout_secs: u64,
) -> Result<L::Panel> {
    let start = next_frame();
    loop {
        if let Some(panel) = locator.find() {
            return Ok(panel);
        }
        let now = next_frame();
        if now - start > timeout_secs as f64 * 1000.0 {
            tracing::warn!(
                timeout_secs,
                "chat panel not found; leaving the overlay inactive"
            );
            return Err(Error::ChatPanelTimeout {
                waited_secs: timeout_secs,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPanel(Vec<ChatItem>);

    impl ChatPanel for FixedPanel {
        fn snapshot(&self) -> Vec<ChatItem> {
            self.0.clone()
        }
    }

    /// Locator that succeeds after a set number of lookups.
    struct SlowLocator {
        remaining: u32,
    }

    impl ChatPanelLocator for SlowLocator {
        type Panel = FixedPanel;

        fn find(&mut self) -> Option<FixedPanel> {
            if self.remaining == 0 {
                Some(FixedPanel(Vec::new()))
            } else {
                self.remaining -= 1;
                None
            }
        }
    }

    #[test]
    fn test_acquire_retries_until_found() {
        let mut locator = SlowLocator { remaining: 3 };
        let mut now = 0.0;
        let panel = acquire_chat_panel(
            &mut locator,
            || {
                now += 16.0;
                now
            },
            10,
        );
        assert!(panel.is_ok());
    }

    #[test]
    fn test_acquire_times_out() {
        let mut locator = SlowLocator { remaining: u32::MAX };
        let mut now = 0.0;
        let result = acquire_chat_panel(
            &mut locator,
            || {
                // A coarse frame clock: 500 ms per frame.
                now += 500.0;
                now
            },
            2,
        );
        assert!(matches!(
            result,
            Err(Error::ChatPanelTimeout { waited_secs: 2 })
        ));
    }
}
