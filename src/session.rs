//! A watch session: the detector → placement → motion pipeline plus the
//! state that lives exactly as long as one chat subscription.
//!
//! Tearing a session down and rebuilding it (player swap, container
//! resize) discards all "already shown" state, so the next notification
//! is treated as backlog again rather than new activity.

use crate::chat::ChatItem;
use crate::config::ConfigStore;
use crate::detector::ChangeDetector;
use crate::host::HostHooks;
use crate::layout::{self, Rect};
use crate::motion::{Animator, OverlayElement};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub struct Session {
    detector: ChangeDetector,
    animator: Animator,
    config: ConfigStore,
    hooks: Box<dyn HostHooks>,
    container: Rect,
    paused: bool,
    rng: StdRng,
}

impl Session {
    pub fn new(config: ConfigStore, container: Rect, hooks: Box<dyn HostHooks>) -> Self {
        Self::with_rng(config, container, hooks, StdRng::from_entropy())
    }

    /// Like [`Session::new`] with a caller-supplied RNG, so density
    /// outcomes are reproducible.
    pub fn with_rng(
        config: ConfigStore,
        container: Rect,
        hooks: Box<dyn HostHooks>,
        rng: StdRng,
    ) -> Self {
        Self {
            detector: ChangeDetector::new(),
            animator: Animator::new(),
            config,
            hooks,
            container,
            paused: false,
            rng,
        }
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// One chat mutation notification: detect new rows, place them, hand
    /// them to the animator. Runs to completion before the next
    /// notification's batch begins.
    pub fn on_chat_update(&mut self, items: &[ChatItem]) {
        let config = self.config.snapshot();
        if !config.on {
            return;
        }
        let detection = self.detector.detect(items);
        tracing::debug!(
            newer = detection.newer.len(),
            render = detection.render,
            "chat update"
        );
        if !detection.render || detection.newer.is_empty() {
            return;
        }
        let live = self.animator.live_rects();
        let placements = layout::place(
            &detection.newer,
            &live,
            &self.container,
            &config,
            &mut self.rng,
        );
        for placement in placements {
            let mut element = OverlayElement::new(placement);
            element.rect.width = self.hooks.inserted(&element);
            self.animator.insert(element);
        }
    }

    /// One frame-clock tick: advance every flying element and destroy the
    /// ones that left the visible area.
    pub fn on_frame(&mut self, now_ms: f64) {
        let config = self.config.snapshot();
        for id in self
            .animator
            .tick(now_ms, self.paused, config.speed, &self.container)
        {
            self.hooks.removed(id);
        }
    }

    /// Playback state; paused playback freezes motion in place.
    pub fn set_paused(&mut self, paused: bool) {
        tracing::debug!(paused, "playback state changed");
        self.paused = paused;
    }

    /// The host reflowed the overlay's container. All "already shown"
    /// state is deliberately discarded: a resized panel may have been
    /// rebuilt, and a stale cursor would miss or duplicate messages.
    pub fn on_resize(&mut self, container: Rect) {
        tracing::debug!(?container, "container resized; resubscribing");
        self.container = container;
        self.detector.reset();
        for id in self.animator.clear() {
            self.hooks.removed(id);
        }
    }

    /// Forward the configured opacity to the host surface.
    pub fn apply_opacity(&mut self) {
        let opacity = self.config.snapshot().opacity;
        self.hooks.opacity_changed(opacity);
    }

    /// End the session: drop every live element and tell the surface.
    /// In-flight frame callbacks on the host side are not chased; with the
    /// elements gone they have nothing left to update.
    pub fn shutdown(&mut self) {
        tracing::debug!("session shutdown");
        for id in self.animator.clear() {
            self.hooks.removed(id);
        }
    }
}
