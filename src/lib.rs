//! KittComplete: Trigger Completion Engine
//!
//! A Rust/WASM implementation of the KittClouds in-line completion pipeline.
//! As the user types, trigger sequences (`@`, `#`, `<>`) followed by a match
//! string open a completion list; committing a candidate replaces the typed
//! text with a structured entity (mention, hashtag, relation).
//!
//! # Architecture
//!
//! ## Completion Components
//! - `spec.rs` - TriggerSpec / CompletionSpec configuration (serde hydrated)
//! - `registry.rs` - SpecRegistry: validated, frozen set of completion specs
//! - `scanner.rs` - MatchScanner: in-progress trigger matches for one block
//! - `selector.rs` - Active match selection (innermost trigger wins)
//! - `filter.rs` - Candidate filtering (case-insensitive prefix + literal fallback)
//! - `cursor.rs` - SelectionCursor: clamped highlighted index
//! - `committer.rs` - Replaces the match with a tagged entity
//! - `session.rs` - CompletionSession: Idle / Completing state machine
//! - `decoration.rs` - Highlight ranges for the renderer
//! - `snapshot.rs` - ContentSnapshot: reference immutable document model
//! - `anchor.rs` - Panel placement from a pull-based span measurer
//! - `debug.rs` - Pretty JSON dump of scanner and session state
//! - `presets.rs` - Demo mention / hashtag / relation specs
//! - `wasm.rs` - CompletionConductor: JS bindings
//!
//! ## Logging
//! - `logging.rs` - tracing -> browser console bridge (`initLogging`)
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { CompletionConductor } from 'kittcomplete';
//!
//! await init();
//!
//! const conductor = CompletionConductor.withDemoSpecs();
//! const state = conductor.onDocumentChange({
//!   blocks: [{ key: 'b0', text: 'hello @Jac', entity_ranges: [] }],
//!   entities: [],
//!   selection: { anchor_key: 'b0', anchor_offset: 10, focus_key: 'b0', focus_offset: 10 },
//! });
//!
//! console.log(state.candidates);       // Jacob Cole, Jacov Kolantarov, Jac
//! conductor.onCommitRequested();       // "hello @Jacob Cole"
//! console.log(conductor.document());
//! ```

pub mod completion;
pub mod logging;

// Public exports - Completion
pub use completion::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("kittcomplete v{}", env!("CARGO_PKG_VERSION"))
}
