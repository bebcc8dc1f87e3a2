use serde::{Deserialize, Serialize};

use super::palette::ColorToken;

/// One contiguous slice of the annotated text
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment<P> {
    Text {
        value: String,
    },
    Annotated {
        value: String,
        label: String,
        color: ColorToken,
        payload: P,
    },
}

impl<P> Segment<P> {
    pub fn value(&self) -> &str {
        match self {
            Segment::Text { value } => value,
            Segment::Annotated { value, .. } => value,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Segment::Text { .. } => None,
            Segment::Annotated { label, .. } => Some(label),
        }
    }

    pub fn color(&self) -> Option<ColorToken> {
        match self {
            Segment::Text { .. } => None,
            Segment::Annotated { color, .. } => Some(*color),
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self, Segment::Annotated { .. })
    }
}

/// Segment values joined back into one string
pub fn concat<P>(segments: &[Segment<P>]) -> String {
    segments.iter().map(Segment::value).collect()
}
