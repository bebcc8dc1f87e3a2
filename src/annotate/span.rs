//! Span input types.
//!
//! Offsets are character (Unicode scalar) positions and stay signed: the
//! upstream service reports `-1` when it cannot locate a value, and such spans
//! must be filtered rather than rejected at decode time.

use serde::{Deserialize, Serialize};

// ==================== TYPE DEFINITIONS ====================

/// A labeled character range over the submitted text
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Span<P> {
    pub start: i64,
    pub end: i64,
    pub label: String,
    pub payload: P,
}

impl<P> Span<P> {
    pub fn new(start: i64, end: i64, label: impl Into<String>, payload: P) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            payload,
        }
    }

    /// Offsets as a char range, if they fit inside a text of `char_len` chars
    pub fn char_range(&self, char_len: usize) -> Option<(usize, usize)> {
        // try_from, not `as`: on wasm32 a large offset would wrap into range
        let start = usize::try_from(self.start).ok()?;
        let end = usize::try_from(self.end).ok()?;
        if end <= start || end > char_len {
            return None;
        }
        Some((start, end))
    }
}

/// Data a span carries beyond its offsets and label
pub trait SpanPayload {
    /// Service confidence in [0, 1]
    fn confidence(&self) -> f64;

    /// Text of the span as the service reported it
    fn surface(&self) -> &str;

    /// Replacement text, for payloads that propose one
    fn replacement(&self) -> Option<&str> {
        None
    }

    /// Free-form explanation shown next to the span
    fn note(&self) -> Option<&str> {
        None
    }

    /// Superscript tag shown after the highlighted text
    fn tag<'a>(&'a self, label: &'a str) -> &'a str {
        self.replacement().unwrap_or(label)
    }

    /// Hover text for the highlighted span
    fn tooltip(&self, label: &str) -> Option<String> {
        self.replacement()
            .map(|replacement| format!("标准术语: {} ({})", replacement, label))
    }
}

// ==================== PAYLOADS ====================

/// Named-entity recognition result; the span label is the entity type
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EntityPayload {
    pub text: String,
    pub confidence: f64,
}

impl SpanPayload for EntityPayload {
    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn surface(&self) -> &str {
        &self.text
    }
}

/// Term-standardization result; the span label is the domain
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TermPayload {
    pub original: String,
    pub standard: String,
    pub domain: String,
    pub reason: String,
    pub confidence: f64,
}

impl SpanPayload for TermPayload {
    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn surface(&self) -> &str {
        &self.original
    }

    fn replacement(&self) -> Option<&str> {
        Some(&self.standard)
    }

    fn note(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

// ==================== TESTS ====================
