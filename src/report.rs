//! Tabular listing of a run's spans and term statistics.
//!
//! Rows read colors from the run's `ColorAssignment`, the same one that colored
//! the highlighted text, so the table and the text can never disagree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::annotate::{ColorAssignment, ColorToken, Span, SpanPayload};

// =============================================================================
// Confidence bands
// =============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

/// Thresholds separating the bands (both exclusive lower bounds)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ConfidenceBands {
    /// Default: 0.85
    pub high: f64,
    /// Default: 0.7
    pub medium: f64,
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self {
            high: 0.85,
            medium: 0.7,
        }
    }
}

impl ConfidenceBands {
    pub fn classify(&self, confidence: f64) -> ConfidenceBand {
        if confidence > self.high {
            ConfidenceBand::High
        } else if confidence > self.medium {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Confidence as a one-decimal percentage, clamped to [0, 100]
pub fn format_percent(confidence: f64) -> String {
    let clamped = if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    };
    format!("{:.1}%", clamped * 100.0)
}

// =============================================================================
// Rows
// =============================================================================

/// One line of the detail table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub text: String,
    pub label: String,
    pub color: ColorToken,
    pub start: i64,
    pub end: i64,
    /// "start-end" as displayed
    pub position: String,
    pub confidence: f64,
    pub confidence_percent: String,
    pub band: ConfidenceBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One row per span, in service order.
///
/// Every span is listed, including ones the annotator dropped for overlap or
/// bad offsets; their labels get colors from `colors` like any other.
pub fn build_rows<P: SpanPayload>(
    spans: &[Span<P>],
    colors: &mut ColorAssignment,
    bands: &ConfidenceBands,
) -> Vec<ReportRow> {
    spans
        .iter()
        .map(|span| {
            let confidence = span.payload.confidence();
            ReportRow {
                text: span.payload.surface().to_string(),
                label: span.label.clone(),
                color: colors.color_for(&span.label),
                start: span.start,
                end: span.end,
                position: format!("{}-{}", span.start, span.end),
                confidence,
                confidence_percent: format_percent(confidence),
                band: bands.classify(confidence),
                replacement: span.payload.replacement().map(str::to_string),
                note: span.payload.note().map(str::to_string),
            }
        })
        .collect()
}

// =============================================================================
// Term statistics
// =============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TermStats {
    pub total_terms: usize,
    /// Terms whose standard form differs from the original
    pub standardized_terms: usize,
    pub domains: BTreeMap<String, usize>,
}

impl TermStats {
    /// Statistics over a run's table rows; the row label is the term domain
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        let mut stats = Self {
            total_terms: rows.len(),
            ..Self::default()
        };
        for row in rows {
            if row.replacement.as_deref().is_some_and(|standard| standard != row.text) {
                stats.standardized_terms += 1;
            }
            let domain = if row.label.is_empty() { "DEFAULT" } else { row.label.as_str() };
            *stats.domains.entry(domain.to_string()).or_insert(0) += 1;
        }
        stats
    }
}

// =============================================================================
// Tests
// =============================================================================
