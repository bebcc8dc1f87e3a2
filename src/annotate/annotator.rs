//! Offset-based span annotation.
//!
//! Turns a flat string plus labeled char ranges into an ordered list of plain
//! and annotated segments. Concatenating the segment values always gives back
//! the input text.
//!
//! # Span policy
//! - Spans are walked in ascending `start`, ties kept in input order.
//! - First write wins: a span starting before the end of the previous
//!   annotated span is dropped.
//! - Spans with `start < 0`, `end <= start` or `end` past the text are dropped.
//! - Dropped spans are never an error; the rest of the text still renders.

use serde::Serialize;

use super::palette::{ColorAssignment, Palette};
use super::segment::Segment;
use super::span::{Span, SpanPayload};
use crate::report::{build_rows, ConfidenceBands, ReportRow};

// ==================== ANNOTATE ====================

/// Byte offset of every char start, plus `text.len()` as the final entry
fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

/// Split `text` into segments along `spans`, coloring labels from `colors`
pub fn annotate<P: Clone>(
    text: &str,
    spans: &[Span<P>],
    colors: &mut ColorAssignment,
) -> Vec<Segment<P>> {
    let bounds = char_boundaries(text);
    let char_len = bounds.len() - 1;

    // sort_by_key is stable: equal starts keep input order
    let mut ordered: Vec<&Span<P>> = spans.iter().collect();
    ordered.sort_by_key(|span| span.start);

    let mut segments = Vec::with_capacity(ordered.len() * 2 + 1);
    let mut cursor = 0usize;
    let mut dropped = 0usize;

    for span in ordered {
        let (start, end) = match span.char_range(char_len) {
            Some(range) if range.0 >= cursor => range,
            _ => {
                dropped += 1;
                continue;
            }
        };

        if start > cursor {
            segments.push(Segment::Text {
                value: text[bounds[cursor]..bounds[start]].to_string(),
            });
        }

        segments.push(Segment::Annotated {
            value: text[bounds[start]..bounds[end]].to_string(),
            label: span.label.clone(),
            color: colors.color_for(&span.label),
            payload: span.payload.clone(),
        });
        cursor = end;
    }

    if cursor < char_len {
        segments.push(Segment::Text {
            value: text[bounds[cursor]..].to_string(),
        });
    }

    if dropped > 0 {
        crate::console_debug!(
            "[Annotator] Dropped {} of {} span(s): overlapping or out of range",
            dropped,
            spans.len()
        );
    }

    segments
}

// ==================== ANNOTATOR ====================

/// Everything one submission produces: highlighted segments, the label colors
/// they used, and the table rows colored from the same assignment
#[derive(Serialize, Debug, Clone)]
pub struct AnnotationRun<P> {
    pub segments: Vec<Segment<P>>,
    pub colors: ColorAssignment,
    pub rows: Vec<ReportRow>,
}

/// Annotates submissions, each with a fresh color assignment
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    palette: Palette,
    bands: ConfidenceBands,
}

impl Annotator {
    pub fn new(palette: Palette, bands: ConfidenceBands) -> Self {
        Self { palette, bands }
    }

    /// Annotate one submission.
    ///
    /// The color cache starts empty every call; nothing carries over from a
    /// previous run.
    pub fn run<P: SpanPayload + Clone>(&self, text: &str, spans: &[Span<P>]) -> AnnotationRun<P> {
        let mut colors = ColorAssignment::new(self.palette.clone());
        let segments = annotate(text, spans, &mut colors);
        let rows = build_rows(spans, &mut colors, &self.bands);
        AnnotationRun {
            segments,
            colors,
            rows,
        }
    }
}

// ==================== TESTS ====================
