//! Active match selection
//!
//! Of all matches across all triggers in the caret's block, the one whose
//! trigger starts last (innermost / most recently opened) is active. Registry
//! validation forbids prefix-overlapping triggers, so two matches never share
//! a trigger offset.

use super::scanner::MatchProcess;

/// The active match: greatest trigger offset, `None` for no matches
pub fn select_active<I>(matches: I) -> Option<MatchProcess>
where
    I: IntoIterator<Item = MatchProcess>,
{
    matches.into_iter().max_by_key(|m| m.trigger_offset)
}
