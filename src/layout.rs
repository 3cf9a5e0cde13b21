//! Line placement for new overlay elements.
//!
//! The overlay is divided into fixed-height horizontal tracks. Each
//! placement pass rebuilds the occupancy picture from the currently live
//! elements and greedily assigns every new message the topmost track it
//! can enter without colliding with a message already flying there.

use crate::chat::Chat;
use crate::config::{DanmakuConfig, Density};
use rand::Rng;

/// Axis-aligned rectangle in overlay surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A computed slot for one new message.
#[derive(Debug, Clone)]
pub struct Placement {
    pub chat: Chat,
    pub line_index: usize,
    /// Spawn rect: top of the assigned track, left at the container's right
    /// edge. Width is zero until the host surface measures the rendered
    /// message.
    pub rect: Rect,
}

/// Right edge of the rightmost live element per line, top to bottom.
///
/// Example shape:
/// ```text
/// -------   ---------]
///    ----- -----]
///        ----------]
///             ------]
/// ```
#[derive(Debug, Default)]
pub struct RightmostShape {
    lines: Vec<Option<f64>>,
}

impl RightmostShape {
    /// One scan over the live elements, before any element of the current
    /// batch is placed. New elements only count as occupancy on the next
    /// pass.
    pub fn from_live(live: &[Rect], container: &Rect, track_height: f64) -> Self {
        let mut lines: Vec<Option<f64>> = Vec::new();
        if track_height <= 0.0 {
            return Self { lines };
        }
        for rect in live {
            let line = ((rect.top - container.top) / track_height).round();
            if line < 0.0 {
                // Transient layout state; not occupancy.
                continue;
            }
            let line = line as usize;
            if lines.len() <= line {
                lines.resize(line + 1, None);
            }
            let right = rect.right();
            if lines[line].is_none_or(|prev| right > prev) {
                lines[line] = Some(right);
            }
        }
        Self { lines }
    }

    /// Number of known lines (highest occupied line index + 1).
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn right_of(&self, line: usize) -> Option<f64> {
        self.lines.get(line).copied().flatten()
    }
}

/// Assign a line to each new message so it won't overlap messages already
/// flying, bounding overlay density per the config.
///
/// Dropped messages (density gate, or a full overlay outside `All` mode)
/// still consume their slot computation but are never emitted.
pub fn place(
    new_chats: &[Chat],
    live: &[Rect],
    container: &Rect,
    config: &DanmakuConfig,
    rng: &mut impl Rng,
) -> Vec<Placement> {
    let track_height = config.track_height();
    if track_height <= 0.0 {
        return Vec::new();
    }
    let shape = RightmostShape::from_live(live, container, track_height);

    let mut next_line: i64 = -1;
    let mut overflow_start: Option<usize> = None;
    let mut placements = Vec::new();
    for (i, chat) in new_chats.iter().enumerate() {
        if let Some(start) = overflow_start {
            // Already overflowed: stack from the top in arrival order,
            // overlap accepted.
            let line = (i - start) as i64;
            push_gated(&mut placements, chat, line, container, config, rng);
            continue;
        }

        if next_line >= shape.len() as i64 {
            // The previous message went at the bottom; continue below it.
            next_line += 1;
        } else {
            // Topmost line below the previous pick that can take a message
            // entering from the right: unoccupied, or its rightmost
            // occupant has cleared at least one font-size of space from
            // the right edge.
            let mut chosen = None;
            for line in (next_line + 1)..shape.len() as i64 {
                match shape.right_of(line as usize) {
                    None => {
                        chosen = Some(line);
                        break;
                    }
                    Some(right) if right <= container.right() - config.font_size => {
                        chosen = Some(line);
                        break;
                    }
                    Some(_) => {}
                }
            }
            next_line = chosen.unwrap_or(shape.len() as i64);
        }

        if next_line as f64 * track_height + config.font_size > container.height {
            // The message would land below the visible area.
            if config.density != Density::All {
                // Favor an uncrowded display: drop the rest of this batch.
                break;
            }
            // Too many at once; stack from the top and accept overlap.
            next_line = 0;
            overflow_start = Some(i);
        }

        push_gated(&mut placements, chat, next_line, container, config, rng);
    }
    placements
}

/// The density gate: keep the message only if a uniform draw falls below
/// the mode's keep-fraction.
fn push_gated(
    placements: &mut Vec<Placement>,
    chat: &Chat,
    line: i64,
    container: &Rect,
    config: &DanmakuConfig,
    rng: &mut impl Rng,
) {
    if rng.gen_range(0.0..1.0) >= config.density.keep_fraction() {
        return;
    }
    let line_index = line.max(0) as usize;
    placements.push(Placement {
        chat: chat.clone(),
        line_index,
        rect: Rect::new(
            container.right(),
            container.top + line_index as f64 * config.track_height(),
            0.0,
            config.font_size,
        ),
    });
}
