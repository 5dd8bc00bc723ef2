//! CompletionSession: the editor-facing completion controller
//!
//! # State machine
//! `Idle` (no active match) <-> `Completing` (active match, panel visible)
//!
//! Every document change re-derives everything from scratch:
//! scan all triggers -> pick the active match -> filter candidates -> rebase the
//! highlighted index. Re-entering `Completing` with the same match identity
//! keeps the highlighted index; a different identity resets it to 0.
//!
//! Keyboard events never mutate the document in place: a commit produces a new
//! snapshot which is fed straight back through `on_document_change`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::anchor::{completion_anchor, Anchor, SpanMeasurer};
use super::committer::{commit, commit_active, insert_at_caret};
use super::cursor::{last_index, Nav, SelectionCursor};
use super::decoration::{ranges_to_highlight, Highlight};
use super::document::{BlockKey, DocumentModel};
use super::filter::{candidate_views, candidates, CandidateView};
use super::registry::SpecRegistry;
use super::scanner::{scan_all, MatchProcess};
use super::selector::select_active;
use super::spec::{CompletionItem, SpaceCommit};

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No active match, panel hidden
    Idle,
    /// Active match present, panel visible
    Completing,
}

/// Whether the host should suppress its default handling of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandleValue {
    Handled,
    NotHandled,
}

/// Timing and counts for the last derivation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub scan_us: u64,
    /// Matches found across all triggers (before picking the active one)
    pub match_count: usize,
}

/// Everything the UI needs after an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedState {
    pub active_match: Option<MatchProcess>,
    pub candidates: Vec<CandidateView>,
    pub selected_index: usize,
    pub stats: SessionStats,
}

// =============================================================================
// CompletionSession
// =============================================================================

/// Completion controller for one editing session
#[derive(Debug, Clone)]
pub struct CompletionSession<D: DocumentModel> {
    registry: SpecRegistry,
    document: D,
    active: Option<MatchProcess>,
    candidates: Vec<CompletionItem>,
    cursor: SelectionCursor,
    state: State,
    stats: SessionStats,
}

impl<D: DocumentModel> CompletionSession<D> {
    /// Start a session over `document`, deriving the initial state
    pub fn new(registry: SpecRegistry, document: D) -> Self {
        let mut session = Self {
            registry,
            document: document.clone(),
            active: None,
            candidates: Vec::new(),
            cursor: SelectionCursor::new(),
            state: State::Idle,
            stats: SessionStats::default(),
        };
        session.on_document_change(document);
        session
    }

    /// Re-derive all completion state for a new document snapshot
    pub fn on_document_change(&mut self, document: D) -> DerivedState {
        let started = instant::Instant::now();

        let groups = scan_all(&self.registry, &document);
        let match_count: usize = groups.iter().map(Vec::len).sum();
        let next = select_active(groups.into_iter().flatten());

        let items = next
            .as_ref()
            .and_then(|m| self.registry.by_trigger(&m.trigger).map(|spec| candidates(spec, m)))
            .unwrap_or_default();

        self.cursor.rebase(self.active.as_ref(), next.as_ref(), items.len());
        self.log_transition(next.as_ref());

        self.state = if next.is_some() { State::Completing } else { State::Idle };
        self.document = document;
        self.active = next;
        self.candidates = items;
        self.stats = SessionStats {
            scan_us: started.elapsed().as_micros() as u64,
            match_count,
        };

        self.derived_state()
    }

    /// Highlight the previous candidate. `false` (host keeps the key) when idle.
    pub fn on_up(&mut self) -> bool {
        self.navigate(Nav::Up)
    }

    /// Highlight the next candidate. `false` (host keeps the key) when idle.
    pub fn on_down(&mut self) -> bool {
        self.navigate(Nav::Down)
    }

    /// Enter / Tab / click: commit the highlighted candidate.
    /// `true` if the document changed.
    pub fn on_commit_requested(&mut self) -> bool {
        if self.state != State::Completing {
            return false;
        }
        match commit_active(&self.registry, self.active.as_ref(), self.cursor.index(), &self.document) {
            Some(committed) => {
                self.on_document_change(committed.document);
                true
            }
            None => false,
        }
    }

    /// Commit a specific row (click on a candidate)
    pub fn on_candidate_clicked(&mut self, index: usize) -> bool {
        if self.state != State::Completing || index >= self.candidates.len() {
            return false;
        }
        self.cursor.select(index, self.candidates.len());
        self.on_commit_requested()
    }

    /// Space typed. If the active spec commits on space, commit, insert the
    /// space after the entity and report `Handled`; otherwise the host inserts
    /// the space itself.
    pub fn on_space_typed(&mut self) -> HandleValue {
        let next_document = {
            let Some(active) = self.active.as_ref() else {
                return HandleValue::NotHandled;
            };
            let Some(spec) = self.registry.by_trigger(&active.trigger) else {
                return HandleValue::NotHandled;
            };
            let index = match spec.space_commit {
                SpaceCommit::Off => return HandleValue::NotHandled,
                SpaceCommit::LastCandidate => last_index(self.candidates.len()),
                SpaceCommit::Highlighted => self.cursor.index(),
            };
            let committed = commit(spec, active, index, &self.document);
            insert_at_caret(&committed.document, " ").unwrap_or(committed.document)
        };
        self.on_document_change(next_document);
        HandleValue::Handled
    }

    fn navigate(&mut self, nav: Nav) -> bool {
        if self.state != State::Completing {
            return false;
        }
        self.cursor.navigate(nav, self.candidates.len());
        true
    }

    fn log_transition(&self, next: Option<&MatchProcess>) {
        match (self.active.as_ref(), next) {
            (None, Some(m)) => {
                debug!(trigger = %m.trigger, offset = m.trigger_offset, "completion opened")
            }
            (Some(prev), None) => {
                debug!(trigger = %prev.trigger, offset = prev.trigger_offset, "completion closed")
            }
            (Some(prev), Some(m)) if !prev.same_identity(m) => {
                debug!(trigger = %m.trigger, offset = m.trigger_offset, "active match changed")
            }
            _ => {}
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn derived_state(&self) -> DerivedState {
        DerivedState {
            active_match: self.active.clone(),
            candidates: candidate_views(&self.candidates, self.cursor.index()),
            selected_index: self.cursor.index(),
            stats: self.stats.clone(),
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    pub fn active_match(&self) -> Option<&MatchProcess> {
        self.active.as_ref()
    }

    pub fn candidates(&self) -> &[CompletionItem] {
        &self.candidates
    }

    pub fn selected_index(&self) -> usize {
        self.cursor.index()
    }

    /// Decorations for one block of the current document
    pub fn highlights(&self, block: &BlockKey) -> Vec<Highlight> {
        ranges_to_highlight(&self.registry, &self.document, block, self.active.as_ref())
    }

    /// Where to place the completion panel
    pub fn anchor(&self, measurer: &impl SpanMeasurer) -> Option<Anchor> {
        completion_anchor(self.active.as_ref(), measurer)
    }

    pub fn is_completing(&self) -> bool {
        self.state == State::Completing
    }

    /// Current state name (for debugging)
    pub fn state_name(&self) -> &'static str {
        match self.state {
            State::Idle => "idle",
            State::Completing => "completing",
        }
    }
}
