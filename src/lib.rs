//! Finmark: span annotation core for the financial text-analysis dashboard
//!
//! A Rust/WASM implementation of the dashboard's highlighting pipeline. The
//! remote service returns labeled character ranges; this crate turns them into
//! ordered text/annotated segments, colors each label, and builds the detail
//! table from the same color assignment.
//!
//! # Architecture
//! - `annotate/` - Span and Segment types, the annotator, palette and per-run
//!   `ColorAssignment`
//! - `service.rs` - Request/response contract of `/api/ner` and `/api/std`
//! - `session.rs` - Submission lifecycle, last submission wins
//! - `report.rs` - Table rows, confidence bands, term statistics
//! - `render.rs` - HTML fragment and legend output
//! - `glossary.rs` - Offline term standardization demo rules
//! - `config.rs` - Form configuration and presets
//! - `wasm.rs` - `EntityForm` / `TermForm` JS classes
//!
//! # Usage (Rust)
//! ```
//! use finmark::{Annotator, EntityPayload, Span};
//!
//! let spans = vec![Span::new(2, 4, "MEDICAL", EntityPayload { text: "脑梗".into(), confidence: 0.9 })];
//! let run = Annotator::default().run("AB脑梗CD", &spans);
//!
//! let values: Vec<&str> = run.segments.iter().map(|s| s.value()).collect();
//! assert_eq!(values, ["AB", "脑梗", "CD"]);
//! ```

pub mod logging;

pub mod annotate;
pub mod config;
pub mod error;
pub mod glossary;
pub mod render;
pub mod report;
pub mod service;
pub mod session;
pub mod wasm;

pub use annotate::*;
pub use config::FormConfig;
pub use error::{FinmarkError, ServiceError};
pub use glossary::{Glossary, TermRule};
pub use render::{render_html, render_legend};
pub use report::{ConfidenceBand, ConfidenceBands, ReportRow, TermStats};
pub use service::{Analysis, AnalysisKind};
pub use session::{AnalysisSession, Outcome, SessionState, Submission, SubmissionId};

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
    format!("finmark v{}", env!("CARGO_PKG_VERSION"))
}
