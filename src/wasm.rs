//! JavaScript bindings for the dashboard forms.
//!
//! # Usage (JavaScript)
//! ```javascript
//! import init, { EntityForm } from 'finmark';
//!
//! await init();
//! const form = new EntityForm({ serviceBaseUrl: 'http://127.0.0.1:8001' });
//!
//! const id = form.begin(text);
//! const res = await fetch(form.endpoint(), { method: 'POST', body: form.requestBody(text) });
//! form.resolve(id, res.status, await res.text());
//!
//! container.innerHTML = form.html();
//! table.rows = form.rows();
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::annotate::{
    annotate as annotate_segments, ColorAssignment, EntityPayload, Palette, Segment, Span, TermPayload,
};
use crate::config::FormConfig;
use crate::error::FinmarkError;
use crate::glossary::Glossary;
use crate::render::{render_html, render_legend};
use crate::report::{ReportRow, TermStats};
use crate::service::{decode_items, request_body, AnalysisKind};
use crate::session::{AnalysisSession, Outcome};

// ==================== HELPERS ====================

/// Serialize with plain JS objects for maps
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn load_config(kind: AnalysisKind, config: JsValue) -> Result<FormConfig, JsValue> {
    let preset = FormConfig::preset(kind);
    if config.is_null() || config.is_undefined() {
        return Ok(preset);
    }
    let overrides: serde_json::Value = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
    Ok(preset.with_overrides(overrides)?)
}

fn applied(outcome: Outcome) -> bool {
    outcome == Outcome::Applied
}

// ==================== ENTITY FORM ====================

/// Named-entity recognition form
#[wasm_bindgen]
pub struct EntityForm {
    config: FormConfig,
    session: AnalysisSession<EntityPayload>,
}

#[wasm_bindgen]
impl EntityForm {
    /// Create the form with optional config overrides
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<EntityForm, JsValue> {
        let config = load_config(AnalysisKind::Entities, config)?;
        let session = AnalysisSession::new(&config);
        Ok(Self { config, session })
    }

    /// Full URL of the `/api/ner` endpoint
    #[wasm_bindgen]
    pub fn endpoint(&self) -> String {
        self.config.endpoint(self.session.kind())
    }

    #[wasm_bindgen(js_name = requestBody)]
    pub fn request_body(&self, text: &str) -> Result<String, JsValue> {
        request_body(text).map_err(|e| FinmarkError::from(e).into())
    }

    /// Start a submission; returns its id. Throws on blank or oversized text.
    #[wasm_bindgen]
    pub fn begin(&mut self, text: &str) -> Result<u32, JsValue> {
        Ok(self.session.begin(text)?)
    }

    /// Feed the raw service response. Returns false if the submission was stale.
    #[wasm_bindgen]
    pub fn resolve(&mut self, id: u32, status: u16, body: &str) -> Result<bool, JsValue> {
        Ok(applied(self.session.resolve(id, status, body)?))
    }

    /// Mark a submission failed (e.g. `fetch` rejected). Returns false if stale.
    #[wasm_bindgen]
    pub fn fail(&mut self, id: u32, reason: &str) -> bool {
        let err = FinmarkError::Transport(reason.to_string());
        applied(self.session.fail(id, &err))
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// `{ status: "idle" | "pending" | "ready" | "failed", ... }`
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.state())
    }

    /// Highlighted text of the current result, or "" when none
    #[wasm_bindgen]
    pub fn html(&self) -> String {
        self.session
            .run()
            .map(|run| render_html(&run.segments))
            .unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn legend(&self) -> String {
        self.session
            .run()
            .map(|run| render_legend(&run.colors))
            .unwrap_or_default()
    }

    /// Detail table rows of the current result
    #[wasm_bindgen]
    pub fn rows(&self) -> Result<JsValue, JsValue> {
        match self.session.run() {
            Some(run) => to_js(&run.rows),
            None => to_js(&Vec::<ReportRow>::new()),
        }
    }
}

// ==================== TERM FORM ====================

/// Term standardization form
#[wasm_bindgen]
pub struct TermForm {
    config: FormConfig,
    session: AnalysisSession<TermPayload>,
    glossary: Glossary,
}

#[wasm_bindgen]
impl TermForm {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TermForm, JsValue> {
        let config = load_config(AnalysisKind::Terms, config)?;
        let session = AnalysisSession::new(&config);
        let glossary = Glossary::builtin()?;
        Ok(Self {
            config,
            session,
            glossary,
        })
    }

    /// Full URL of the `/api/std` endpoint
    #[wasm_bindgen]
    pub fn endpoint(&self) -> String {
        self.config.endpoint(self.session.kind())
    }

    #[wasm_bindgen(js_name = requestBody)]
    pub fn request_body(&self, text: &str) -> Result<String, JsValue> {
        request_body(text).map_err(|e| FinmarkError::from(e).into())
    }

    #[wasm_bindgen]
    pub fn begin(&mut self, text: &str) -> Result<u32, JsValue> {
        Ok(self.session.begin(text)?)
    }

    #[wasm_bindgen]
    pub fn resolve(&mut self, id: u32, status: u16, body: &str) -> Result<bool, JsValue> {
        Ok(applied(self.session.resolve(id, status, body)?))
    }

    #[wasm_bindgen]
    pub fn fail(&mut self, id: u32, reason: &str) -> bool {
        let err = FinmarkError::Transport(reason.to_string());
        applied(self.session.fail(id, &err))
    }

    /// Standardize with the built-in glossary instead of the service
    #[wasm_bindgen(js_name = standardizeOffline)]
    pub fn standardize_offline(&mut self, text: &str) -> Result<bool, JsValue> {
        let id = self.session.begin(text)?;
        let spans = self.glossary.standardize(text);
        Ok(applied(self.session.complete(id, spans)))
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.session.clear();
    }

    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.state())
    }

    #[wasm_bindgen]
    pub fn html(&self) -> String {
        self.session
            .run()
            .map(|run| render_html(&run.segments))
            .unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn legend(&self) -> String {
        self.session
            .run()
            .map(|run| render_legend(&run.colors))
            .unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn rows(&self) -> Result<JsValue, JsValue> {
        match self.session.run() {
            Some(run) => to_js(&run.rows),
            None => to_js(&Vec::<ReportRow>::new()),
        }
    }

    /// `{ totalTerms, standardizedTerms, domains }` for the current result
    #[wasm_bindgen]
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        let stats = self
            .session
            .run()
            .map(|run| TermStats::from_rows(&run.rows))
            .unwrap_or_default();
        to_js(&stats)
    }
}

// ==================== FREE FUNCTIONS ====================

/// Annotate `text` with `spans` (`[{ start, end, label, payload? }]`).
///
/// Returns `{ segments, colors }` using the default palette.
#[wasm_bindgen]
pub fn annotate(text: &str, spans: JsValue) -> Result<JsValue, JsValue> {
    #[derive(serde::Deserialize)]
    struct JsSpan {
        start: i64,
        end: i64,
        label: String,
        #[serde(default)]
        payload: serde_json::Value,
    }

    #[derive(Serialize)]
    struct Annotated {
        segments: Vec<Segment<serde_json::Value>>,
        colors: ColorAssignment,
    }

    // Only the outer array must be well formed; bad items are skipped
    let items: Vec<serde_json::Value> = serde_wasm_bindgen::from_value(spans)
        .map_err(|e| JsValue::from_str(&format!("Invalid spans: {}", e)))?;
    let spans: Vec<Span<serde_json::Value>> = decode_items::<JsSpan>(items)
        .into_iter()
        .map(|s| Span::new(s.start, s.end, s.label, s.payload))
        .collect();

    let mut colors = ColorAssignment::new(Palette::default());
    let segments = annotate_segments(text, &spans, &mut colors);
    to_js(&Annotated { segments, colors })
}

/// Default-palette color name for `label`
#[wasm_bindgen(js_name = colorFor)]
pub fn color_for(label: &str) -> String {
    Palette::default().pick(label).as_str().to_string()
}
