//! Overlay configuration and the shared store.
//!
//! Every subsystem reads the config on each operation; writes come from the
//! embedder's settings surface. Components take an immutable snapshot per
//! operation, so a settings write lands between passes instead of tearing
//! one mid-flight.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// What fraction of eligible new messages are actually rendered, trading
/// completeness for visual decluttering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Density {
    /// Render everything, stacking with overlap once the overlay is full.
    All,
    /// Render everything that fits without overlap; drop the rest.
    #[default]
    NoOverlap,
    Dense,
    Moderate,
    Sparse,
}

impl Density {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "nooverlap" | "no-overlap" => Some(Self::NoOverlap),
            "dense" => Some(Self::Dense),
            "moderate" => Some(Self::Moderate),
            "sparse" => Some(Self::Sparse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::NoOverlap => "noOverlap",
            Self::Dense => "dense",
            Self::Moderate => "moderate",
            Self::Sparse => "sparse",
        }
    }

    /// Probability that an eligible message is kept.
    pub fn keep_fraction(self) -> f64 {
        match self {
            Self::All | Self::NoOverlap => 1.0,
            Self::Dense => 0.75,
            Self::Moderate => 0.5,
            Self::Sparse => 0.25,
        }
    }
}

/// Tunable overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DanmakuConfig {
    /// Master switch; a disabled overlay ignores chat updates entirely.
    pub on: bool,
    /// Horizontal scroll speed in px/s.
    pub speed: f64,
    /// Overlay text size in px. Also the clearance an occupied line must
    /// have from the right edge before it accepts another message.
    pub font_size: f64,
    /// Vertical gap between tracks in px.
    pub line_gap: f64,
    pub density: Density,
    /// Overlay surface opacity, passed through to the host surface.
    pub opacity: f64,
}

impl Default for DanmakuConfig {
    fn default() -> Self {
        Self {
            on: true,
            speed: 100.0,
            font_size: 20.0,
            line_gap: 20.0,
            density: Density::NoOverlap,
            opacity: 1.0,
        }
    }
}

impl DanmakuConfig {
    /// Height of one overlay track.
    pub fn track_height(&self) -> f64 {
        self.font_size + self.line_gap
    }

    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Shared config storage: many readers, one settings-surface writer.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    inner: Arc<RwLock<DanmakuConfig>>,
}

impl ConfigStore {
    pub fn new(config: DanmakuConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Current settings as an immutable snapshot.
    pub fn snapshot(&self) -> DanmakuConfig {
        self.inner.read().unwrap().clone()
    }

    /// Apply a settings change. Takes effect on the next operation of each
    /// subsystem.
    pub fn update(&self, apply: impl FnOnce(&mut DanmakuConfig)) {
        apply(&mut self.inner.write().unwrap());
    }
}
