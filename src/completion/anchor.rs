//! Completion panel placement
//!
//! The renderer knows where text sits on screen; the engine only asks. The
//! panel hangs off the bottom-left corner of the active match span.

use serde::{Deserialize, Serialize};

use super::document::BlockKey;
use super::scanner::MatchProcess;

/// On-screen rectangle, in whatever units the renderer uses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Where the completion panel goes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub top: f64,
    pub left: f64,
}

/// Answers "where is this span on screen" on demand
pub trait SpanMeasurer {
    /// `None` when the span is not laid out (yet)
    fn measure_span(&self, block: &BlockKey, start: usize, end: usize) -> Option<Rect>;
}

impl<F> SpanMeasurer for F
where
    F: Fn(&BlockKey, usize, usize) -> Option<Rect>,
{
    fn measure_span(&self, block: &BlockKey, start: usize, end: usize) -> Option<Rect> {
        self(block, start, end)
    }
}

/// Panel position below the active match, `None` when idle or unmeasurable
pub fn completion_anchor(active: Option<&MatchProcess>, measurer: &impl SpanMeasurer) -> Option<Anchor> {
    let active = active?;
    let rect = measurer.measure_span(&active.block_key, active.trigger_offset, active.caret_offset)?;
    Some(Anchor {
        top: rect.bottom,
        left: rect.left,
    })
}
