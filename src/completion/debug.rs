//! Debug dump of the completion state
//!
//! Pretty JSON of every trigger's matches in the caret's block, plus the active
//! match and highlighted index. Pure: reads the session, changes nothing.

use serde::Serialize;

use super::document::DocumentModel;
use super::scanner::{scan_all, MatchProcess};
use super::session::CompletionSession;

#[derive(Serialize)]
struct TriggerDump<'a> {
    trigger: &'a str,
    matches: Vec<MatchProcess>,
}

#[derive(Serialize)]
struct SessionDump<'a> {
    state: &'static str,
    selected_index: usize,
    active_match: Option<&'a MatchProcess>,
    triggers: Vec<TriggerDump<'a>>,
}

/// Human-readable snapshot of what the scanner currently sees
pub fn debug_dump<D: DocumentModel>(session: &CompletionSession<D>) -> String {
    let registry = session.registry();
    let triggers = registry
        .iter()
        .zip(scan_all(registry, session.document()))
        .map(|(spec, matches)| TriggerDump {
            trigger: spec.trigger(),
            matches,
        })
        .collect();

    let dump = SessionDump {
        state: session.state_name(),
        selected_index: session.selected_index(),
        active_match: session.active_match(),
        triggers,
    };

    serde_json::to_string_pretty(&dump).unwrap_or_else(|e| format!("debug dump failed: {e}"))
}
