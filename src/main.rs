//! Headless demo driver: a synthetic chat panel feeding the overlay
//! pipeline on a fixed frame clock, logging placements and retirements.

use clap::Parser;
use danmaku_sim::chat::ChatItem;
use danmaku_sim::config::{ConfigStore, DanmakuConfig, Density};
use danmaku_sim::host::{ChatPanel, HostHooks};
use danmaku_sim::layout::Rect;
use danmaku_sim::motion::OverlayElement;
use danmaku_sim::{Error, Session};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "danmaku-sim", about = "Headless danmaku overlay simulation")]
struct Args {
    /// Scroll speed in px/s.
    #[arg(long)]
    speed: Option<f64>,

    /// Overlay text size in px.
    #[arg(long)]
    font_size: Option<f64>,

    /// Vertical gap between tracks in px.
    #[arg(long)]
    line_gap: Option<f64>,

    /// Density mode: all, noOverlap, dense, moderate, sparse.
    #[arg(long)]
    density: Option<String>,

    /// Overlay width in px.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Overlay height in px.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// How long to run the simulation.
    #[arg(long, default_value_t = 15)]
    duration_secs: u64,

    /// RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file; CLI flags override it.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Synthetic chat panel growing over simulated stream time.
#[derive(Default)]
struct SimChatPanel {
    items: Vec<ChatItem>,
    next_id: u64,
}

impl SimChatPanel {
    fn push_message(&mut self, stream_secs: i64, text: &str) {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(ChatItem {
            id: format!("msg-{id}"),
            timestamp: Some(format_timestamp(stream_secs)),
            message_html: Some(text.to_string()),
        });
    }
}

impl ChatPanel for SimChatPanel {
    fn snapshot(&self) -> Vec<ChatItem> {
        self.items.clone()
    }
}

/// Displayed `±mm:ss` timestamp for a stream-relative second count.
fn format_timestamp(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.abs();
    format!("{sign}{}:{:02}", secs / 60, secs % 60)
}

/// Surface that logs insertions/removals and sizes messages by length.
struct LogHooks {
    font_size: f64,
}

impl HostHooks for LogHooks {
    fn inserted(&mut self, element: &OverlayElement) -> f64 {
        tracing::info!(
            id = element.id,
            line = element.line_index,
            text = %element.chat.message_html,
            "danmaku spawned"
        );
        // Rough glyph-width estimate; a real surface measures the render.
        element.chat.message_html.chars().count() as f64 * self.font_size * 0.6
    }

    fn removed(&mut self, element_id: u64) {
        tracing::debug!(id = element_id, "danmaku retired");
    }
}

const PHRASES: &[&str] = &[
    "hello from the chat",
    "nice play!",
    "LOL",
    "what just happened",
    "gg",
    "first time watching, this is great",
    "pog",
    "can we get a replay of that",
];

fn build_config(args: &Args) -> Result<DanmakuConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => DanmakuConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => DanmakuConfig::default(),
    };
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if let Some(font_size) = args.font_size {
        config.font_size = font_size;
    }
    if let Some(line_gap) = args.line_gap {
        config.line_gap = line_gap;
    }
    if let Some(density) = &args.density {
        config.density = Density::from_str(density)
            .ok_or_else(|| Error::Other(format!("unknown density mode: {density}")))?;
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    tracing::info!(?config, "starting simulation");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run(args, config));
    Ok(())
}

async fn run(args: Args, config: DanmakuConfig) {
    let container = Rect::new(0.0, 0.0, args.width, args.height);
    let store = ConfigStore::new(config.clone());
    let hooks = LogHooks {
        font_size: config.font_size,
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut session = Session::with_rng(
        store,
        container,
        Box::new(hooks),
        StdRng::seed_from_u64(seed),
    );
    let mut chat_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut panel = SimChatPanel::default();

    // Backlog that the first notification suppresses.
    panel.push_message(-30, "early chat before the stream");
    panel.push_message(-5, "starting soon");
    session.on_chat_update(&panel.snapshot());

    let started = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_millis(16));
    let mut frame: u64 = 0;
    while started.elapsed() < Duration::from_secs(args.duration_secs) {
        ticker.tick().await;
        frame += 1;
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        session.on_frame(now_ms);

        // A mutation notification roughly twice a second.
        if frame % 30 == 0 {
            let stream_secs = started.elapsed().as_secs() as i64;
            for _ in 0..chat_rng.gen_range(1..=3) {
                let phrase = PHRASES[chat_rng.gen_range(0..PHRASES.len())];
                panel.push_message(stream_secs, phrase);
            }
            session.on_chat_update(&panel.snapshot());
            tracing::info!(live = session.animator().elements().len(), "overlay state");
        }
    }
    session.shutdown();
}
