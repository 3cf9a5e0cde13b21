//! Per-frame motion of placed overlay elements.
//!
//! Elements are owned by an [`Animator`] active set and stepped once per
//! frame-clock tick, rather than each element re-arming its own callback;
//! retiring an element is just removing it from the set.

use crate::chat::Chat;
use crate::layout::{Placement, Rect};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a unique overlay element ID.
pub fn next_element_id() -> u64 {
    NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A message flying across the overlay.
#[derive(Debug, Clone)]
pub struct OverlayElement {
    pub id: u64,
    pub chat: Chat,
    pub line_index: usize,
    pub rect: Rect,
    /// Timestamp of the last frame this element observed, in ms.
    last_tick: Option<f64>,
}

impl OverlayElement {
    pub fn new(placement: Placement) -> Self {
        Self {
            id: next_element_id(),
            chat: placement.chat,
            line_index: placement.line_index,
            rect: placement.rect,
            last_tick: None,
        }
    }
}

/// Owns the live element set and advances it once per frame.
#[derive(Debug, Default)]
pub struct Animator {
    elements: Vec<OverlayElement>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: OverlayElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[OverlayElement] {
        &self.elements
    }

    /// Rects of all live elements, the occupancy input for the next
    /// placement pass.
    pub fn live_rects(&self) -> Vec<Rect> {
        self.elements.iter().map(|el| el.rect).collect()
    }

    /// Drop every live element (session teardown / resubscription).
    /// Returns the retired ids so the host surface can be told.
    pub fn clear(&mut self) -> Vec<u64> {
        self.elements.drain(..).map(|el| el.id).collect()
    }

    /// Advance all elements one frame. Paused playback freezes motion but
    /// elements keep observing frames, so there is no jump on resume.
    /// Returns the ids of elements that left the visible area.
    pub fn tick(&mut self, now_ms: f64, paused: bool, speed: f64, container: &Rect) -> Vec<u64> {
        let mut retired = Vec::new();
        self.elements.retain_mut(|el| {
            if el.rect.right() < container.left {
                retired.push(el.id);
                return false;
            }
            let Some(last) = el.last_tick.replace(now_ms) else {
                // First frame only observes the clock.
                return true;
            };
            let elapsed_ms = now_ms - last;
            if elapsed_ms <= 0.0 {
                // Frame-timing anomaly; skip the move, keep the element.
                return true;
            }
            if !paused {
                el.rect.left -= speed * elapsed_ms / 1000.0;
            }
            true
        });
        retired
    }
}
