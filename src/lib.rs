//! Danmaku overlay engine.
//!
//! Mirrors a host page's live-chat panel as scrolling comments over a video
//! surface: detects which chat rows are genuinely new, assigns each one a
//! collision-free overlay track, and advances the flying elements frame by
//! frame.

pub mod chat;
pub mod config;
pub mod detector;
pub mod error;
pub mod host;
pub mod layout;
pub mod motion;
pub mod session;

pub use error::{Error, Result};
pub use session::Session;
