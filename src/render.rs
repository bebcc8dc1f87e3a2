//! HTML rendering of annotated segments.
//!
//! Output is a fragment meant for a `white-space: pre-wrap` container. Styling
//! is left to the page; each annotated span carries `fm-mark` plus an
//! `fm-<color>` class named after its `ColorToken`.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::annotate::{ColorAssignment, Segment, SpanPayload};

/// Render segments in order as one HTML fragment
pub fn render_html<P: SpanPayload>(segments: &[Segment<P>]) -> String {
    let mut html = String::new();

    for segment in segments {
        match segment {
            Segment::Text { value } => html.push_str(&encode_text(value)),
            Segment::Annotated {
                value,
                label,
                color,
                payload,
            } => {
                html.push_str(&format!(
                    r#"<span class="fm-mark fm-{}" data-label="{}""#,
                    color.as_str(),
                    encode_double_quoted_attribute(label)
                ));
                if let Some(tooltip) = payload.tooltip(label) {
                    html.push_str(&format!(r#" title="{}""#, encode_double_quoted_attribute(&tooltip)));
                }
                html.push('>');
                html.push_str(&encode_text(value));
                html.push_str(&format!(
                    r#"<sup class="fm-tag">{}</sup></span>"#,
                    encode_text(payload.tag(label))
                ));
            }
        }
    }

    html
}

/// One chip per label, in the order the run assigned them
pub fn render_legend(colors: &ColorAssignment) -> String {
    let mut html = String::from(r#"<div class="fm-legend">"#);
    for (label, color) in colors.entries() {
        html.push_str(&format!(
            r#"<span class="fm-chip fm-{}">{}</span>"#,
            color.as_str(),
            encode_text(label)
        ));
    }
    html.push_str("</div>");
    html
}
