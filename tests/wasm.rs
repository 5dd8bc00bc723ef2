//! Browser-side tests for the CompletionConductor bindings
//!
//! Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use kittcomplete::CompletionConductor;
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// Plain JS objects, not `Map`s
fn to_js(value: serde_json::Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap()
}

fn snapshot(text: &str, caret: usize) -> JsValue {
    to_js(json!({
        "blocks": [{ "key": "b0", "text": text, "entity_ranges": [] }],
        "entities": [],
        "selection": { "anchor_key": "b0", "anchor_offset": caret, "focus_key": "b0", "focus_offset": caret },
    }))
}

fn to_json(value: JsValue) -> serde_json::Value {
    serde_wasm_bindgen::from_value(value).unwrap()
}

#[wasm_bindgen_test]
fn test_mention_flow() {
    let mut conductor = CompletionConductor::js_with_demo_specs().unwrap();
    assert_eq!(conductor.js_state_name(), "idle");

    let state = to_json(conductor.js_on_document_change(snapshot("hello @Jac", 10)).unwrap());
    assert_eq!(state["active_match"]["match_string"], "Jac");
    assert_eq!(state["candidates"].as_array().unwrap().len(), 3);
    assert_eq!(conductor.js_state_name(), "completing");

    assert!(conductor.js_on_down());
    assert!(conductor.js_on_commit_requested());

    let doc = to_json(conductor.js_document());
    assert_eq!(doc["blocks"][0]["text"], "hello @Jacov Kolantarov");
    assert_eq!(doc["blocks"][0]["entity_ranges"][0]["offset"], 6);
    assert_eq!(doc["entities"][0]["entity_type"], "mention");
}

#[wasm_bindgen_test]
fn test_space_commit_flow() {
    let mut conductor = CompletionConductor::js_with_demo_specs().unwrap();
    conductor.js_on_document_change(snapshot("#idea", 5)).unwrap();

    assert!(conductor.js_on_space_typed());
    let doc = to_json(conductor.js_document());
    assert_eq!(doc["blocks"][0]["text"], "#idea ");
    assert_eq!(doc["selection"]["focus_offset"], 6);
}

#[wasm_bindgen_test]
fn test_custom_specs_and_errors() {
    let specs = to_js(json!([
        { "name": "tag", "trigger": "+", "entity_type": "tag", "items": [{ "text": "plus" }] }
    ]));
    let mut conductor = CompletionConductor::js_new(specs).unwrap();
    let state = to_json(conductor.js_on_document_change(snapshot("+p", 2)).unwrap());
    assert_eq!(state["candidates"][0]["text"], "plus");

    let bad = to_js(json!([
        { "name": "a", "trigger": "<", "entity_type": "a" },
        { "name": "b", "trigger": "<>", "entity_type": "b" }
    ]));
    assert!(CompletionConductor::js_new(bad).is_err());

    assert!(conductor.js_on_document_change(snapshot("+p", 9)).is_err());
}

#[wasm_bindgen_test]
fn test_highlights_and_anchor() {
    let mut conductor = CompletionConductor::js_with_demo_specs().unwrap();
    conductor.js_on_document_change(snapshot("@Al", 3)).unwrap();

    let highlights = to_json(conductor.js_highlights("b0"));
    assert_eq!(highlights[0]["tag"]["kind"], "active_match");

    let measure = js_sys::Function::new_with_args(
        "block, start, end",
        "return { top: 0, left: start * 10, bottom: 20, right: end * 10 };",
    );
    let anchor = to_json(conductor.js_completion_anchor(&measure));
    assert_eq!(anchor["top"], 20.0);
    assert_eq!(anchor["left"], 0.0);

    assert!(conductor.js_debug_dump().contains("\"state\": \"completing\""));
}
