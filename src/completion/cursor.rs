//! SelectionCursor: which candidate is highlighted
//!
//! The stored index is always clamped to `[0, count - 1]` against the current
//! candidate list, and resets to 0 whenever the active match changes identity.

use super::scanner::MatchProcess;

/// `max(0, min(index, count - 1))`. An empty list clamps to 0.
pub fn clamp_index(index: isize, count: usize) -> usize {
    if index <= 0 || count == 0 {
        return 0;
    }
    (index as usize).min(count - 1)
}

/// Greatest valid index for a list of `count` candidates
pub fn last_index(count: usize) -> usize {
    clamp_index(isize::MAX, count)
}

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Up,
    Down,
}

/// Highlighted candidate index, tied to one match identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    index: usize,
}

impl SelectionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Re-derive the index after a document change.
    ///
    /// Same match identity keeps the index (clamped to the new list), a new
    /// identity or no match at all resets it to 0.
    pub fn rebase(&mut self, previous: Option<&MatchProcess>, next: Option<&MatchProcess>, count: usize) {
        self.index = match (previous, next) {
            (Some(prev), Some(next)) if prev.same_identity(next) => {
                clamp_index(self.index as isize, count)
            }
            _ => 0,
        };
    }

    /// Move one step and re-clamp
    pub fn navigate(&mut self, nav: Nav, count: usize) {
        let step = match nav {
            Nav::Up => -1,
            Nav::Down => 1,
        };
        self.index = clamp_index(self.index as isize + step, count);
    }

    /// Highlight `index` directly (clamped)
    pub fn select(&mut self, index: usize, count: usize) {
        self.index = clamp_index(index.min(isize::MAX as usize) as isize, count);
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
