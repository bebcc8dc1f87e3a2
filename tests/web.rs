//! Browser-side tests for the JS bindings. Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use finmark::wasm::{annotate, color_for, EntityForm, TermForm};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[derive(serde::Deserialize)]
struct Segment {
    kind: String,
    value: String,
}

#[derive(serde::Deserialize)]
struct Annotated {
    segments: Vec<Segment>,
}

#[derive(serde::Deserialize)]
struct State {
    status: String,
}

/// Plain JS objects rather than `Map`s
fn js(value: serde_json::Value) -> JsValue {
    use serde::Serialize;
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap()
}

fn status(state: JsValue) -> String {
    serde_wasm_bindgen::from_value::<State>(state).unwrap().status
}

#[wasm_bindgen_test]
fn test_annotate_free_function() {
    let spans = js(serde_json::json!([
        { "start": 2, "end": 4, "label": "MEDICAL" }
    ]));

    let result: Annotated = serde_wasm_bindgen::from_value(annotate("AB脑梗CD", spans).unwrap()).unwrap();

    let values: Vec<&str> = result.segments.iter().map(|s| s.value.as_str()).collect();
    assert_eq!(values, vec!["AB", "脑梗", "CD"]);
    assert_eq!(result.segments[1].kind, "annotated");
}

#[wasm_bindgen_test]
fn test_annotate_skips_malformed_spans() {
    let spans = js(serde_json::json!([
        { "start": 2, "end": 4, "label": "MEDICAL" },
        { "start": null, "end": 6, "label": "LEGAL" },
        { "start": 0, "end": 4294967298i64, "label": "IT" }
    ]));

    let result: Annotated = serde_wasm_bindgen::from_value(annotate("AB脑梗CD", spans).unwrap()).unwrap();

    let kinds: Vec<&str> = result.segments.iter().map(|s| s.kind.as_str()).collect();
    assert_eq!(kinds, vec!["text", "annotated", "text"]);
    assert_eq!(result.segments[1].value, "脑梗");
}

#[wasm_bindgen_test]
fn test_color_for_matches_palette() {
    assert_eq!(color_for("ORG"), "geekblue");
    assert_eq!(color_for("PERSON"), "green");
}

#[wasm_bindgen_test]
fn test_entity_form_round_trip() {
    let mut form = EntityForm::new(JsValue::NULL).unwrap();
    assert_eq!(form.endpoint(), "http://127.0.0.1:8001/api/ner");

    let id = form.begin("美联储加息").unwrap();
    assert_eq!(status(form.state().unwrap()), "pending");

    let body = r#"[{"text": "美联储", "type": "ORG", "start": 0, "end": 3, "confidence": 0.95}]"#;
    assert!(form.resolve(id, 200, body).unwrap());
    assert_eq!(status(form.state().unwrap()), "ready");
    assert!(form.html().contains("fm-geekblue"));

    form.clear();
    assert_eq!(status(form.state().unwrap()), "idle");
    assert_eq!(form.html(), "");
}

#[wasm_bindgen_test]
fn test_entity_form_stale_and_failure() {
    let mut form = EntityForm::new(JsValue::NULL).unwrap();
    let first = form.begin("one").unwrap();
    let second = form.begin("two").unwrap();

    assert!(!form.resolve(first, 200, "[]").unwrap());
    assert!(form.resolve(second, 500, "").is_err());
    assert_eq!(status(form.state().unwrap()), "failed");
}

#[wasm_bindgen_test]
fn test_entity_form_rejects_blank() {
    let mut form = EntityForm::new(JsValue::NULL).unwrap();
    let err = form.begin("  ").unwrap_err();
    assert_eq!(err.as_string().as_deref(), Some("请输入需要分析的文本内容"));
}

#[wasm_bindgen_test]
fn test_term_form_offline() {
    let config = js(serde_json::json!({ "maxInputChars": 100 }));
    let mut form = TermForm::new(config).unwrap();

    assert!(form.standardize_offline("患者脑梗入院").unwrap());
    assert!(form.html().contains("脑梗死"));
    assert!(form.html().contains("fm-red"));
}
