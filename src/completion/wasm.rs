//! CompletionConductor: JS-facing wrapper around `CompletionSession`
//!
//! Snapshots, derived state and highlights cross the boundary as plain JS
//! objects through serde-wasm-bindgen. Offsets are char offsets.

use wasm_bindgen::prelude::*;

use super::anchor::Rect;
use super::debug::debug_dump;
use super::document::BlockKey;
use super::presets::demo_registry;
use super::registry::SpecRegistry;
use super::session::{CompletionSession, HandleValue};
use super::snapshot::ContentSnapshot;
use super::spec::{CompletionSpec, CompletionSpecConfig};

#[wasm_bindgen]
pub struct CompletionConductor {
    session: CompletionSession<ContentSnapshot>,
}

#[wasm_bindgen]
impl CompletionConductor {
    /// Build from an array of spec configs
    #[wasm_bindgen(constructor)]
    pub fn js_new(specs: JsValue) -> Result<CompletionConductor, JsValue> {
        let configs: Vec<CompletionSpecConfig> = serde_wasm_bindgen::from_value(specs)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse specs: {}", e)))?;
        let specs = configs
            .into_iter()
            .map(CompletionSpec::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let registry = SpecRegistry::new(specs).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_registry(registry))
    }

    /// Conductor preloaded with the mention / hashtag / relation demo specs
    #[wasm_bindgen(js_name = "withDemoSpecs")]
    pub fn js_with_demo_specs() -> Result<CompletionConductor, JsValue> {
        let registry = demo_registry().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_registry(registry))
    }

    /// Feed a new document snapshot; returns the derived state
    #[wasm_bindgen(js_name = "onDocumentChange")]
    pub fn js_on_document_change(&mut self, snapshot: JsValue) -> Result<JsValue, JsValue> {
        let snapshot: ContentSnapshot = serde_wasm_bindgen::from_value(snapshot)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse snapshot: {}", e)))?;
        let state = self.session.on_document_change(snapshot);
        serde_wasm_bindgen::to_value(&state).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `true` when the key was consumed
    #[wasm_bindgen(js_name = "onUp")]
    pub fn js_on_up(&mut self) -> bool {
        self.session.on_up()
    }

    /// `true` when the key was consumed
    #[wasm_bindgen(js_name = "onDown")]
    pub fn js_on_down(&mut self) -> bool {
        self.session.on_down()
    }

    /// `true` when the document changed; read it back with `document()`
    #[wasm_bindgen(js_name = "onCommitRequested")]
    pub fn js_on_commit_requested(&mut self) -> bool {
        self.session.on_commit_requested()
    }

    #[wasm_bindgen(js_name = "onCandidateClicked")]
    pub fn js_on_candidate_clicked(&mut self, index: usize) -> bool {
        self.session.on_candidate_clicked(index)
    }

    /// `true` when the space was handled (committed and inserted)
    #[wasm_bindgen(js_name = "onSpaceTyped")]
    pub fn js_on_space_typed(&mut self) -> bool {
        self.session.on_space_typed() == HandleValue::Handled
    }

    #[wasm_bindgen(js_name = "document")]
    pub fn js_document(&self) -> JsValue {
        to_js_or_null(self.session.document())
    }

    #[wasm_bindgen(js_name = "derivedState")]
    pub fn js_derived_state(&self) -> JsValue {
        to_js_or_null(&self.session.derived_state())
    }

    #[wasm_bindgen(js_name = "highlights")]
    pub fn js_highlights(&self, block_key: &str) -> JsValue {
        to_js_or_null(&self.session.highlights(&BlockKey::new(block_key)))
    }

    /// Panel position. `measure(blockKey, start, end)` must return
    /// `{top, left, bottom, right}` or null.
    #[wasm_bindgen(js_name = "completionAnchor")]
    pub fn js_completion_anchor(&self, measure: &js_sys::Function) -> JsValue {
        let measurer = |block: &BlockKey, start: usize, end: usize| -> Option<Rect> {
            let result = measure.call3(
                &JsValue::NULL,
                &JsValue::from_str(block.as_str()),
                &JsValue::from_f64(start as f64),
                &JsValue::from_f64(end as f64),
            );
            match result {
                Ok(value) => serde_wasm_bindgen::from_value::<Option<Rect>>(value).unwrap_or_else(|e| {
                    web_sys::console::error_1(&format!("completionAnchor: bad rect: {}", e).into());
                    None
                }),
                Err(e) => {
                    web_sys::console::error_1(&e);
                    None
                }
            }
        };
        match self.session.anchor(&measurer) {
            Some(anchor) => to_js_or_null(&anchor),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = "debugDump")]
    pub fn js_debug_dump(&self) -> String {
        debug_dump(&self.session)
    }

    #[wasm_bindgen(js_name = "stateName")]
    pub fn js_state_name(&self) -> String {
        self.session.state_name().to_string()
    }
}

impl CompletionConductor {
    fn with_registry(registry: SpecRegistry) -> Self {
        Self {
            session: CompletionSession::new(registry, ContentSnapshot::empty()),
        }
    }

    pub fn session(&self) -> &CompletionSession<ContentSnapshot> {
        &self.session
    }
}

fn to_js_or_null<T: serde::Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        web_sys::console::error_1(&format!("serialization failed: {}", e).into());
        JsValue::NULL
    })
}
