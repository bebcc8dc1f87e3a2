//! Label colors: the fixed palette, the label hash, and the per-run
//! `ColorAssignment` cache.
//!
//! A label's color is content-addressed: the label is hashed and the hash
//! indexes the palette. The assignment caches what it hands out, so a label
//! keeps one color for the lifetime of a run no matter how often it appears.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

// =============================================================================
// ColorToken
// =============================================================================

/// Named display color understood by the dashboard's tag components
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Blue,
    Green,
    Volcano,
    Purple,
    Cyan,
    Gold,
    Magenta,
    Geekblue,
    Orange,
    Red,
    Default,
}

impl ColorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorToken::Blue => "blue",
            ColorToken::Green => "green",
            ColorToken::Volcano => "volcano",
            ColorToken::Purple => "purple",
            ColorToken::Cyan => "cyan",
            ColorToken::Gold => "gold",
            ColorToken::Magenta => "magenta",
            ColorToken::Geekblue => "geekblue",
            ColorToken::Orange => "orange",
            ColorToken::Red => "red",
            ColorToken::Default => "default",
        }
    }
}

/// Hash-indexed pool used when no pin applies
pub const DEFAULT_POOL: [ColorToken; 9] = [
    ColorToken::Blue,
    ColorToken::Green,
    ColorToken::Volcano,
    ColorToken::Purple,
    ColorToken::Cyan,
    ColorToken::Gold,
    ColorToken::Magenta,
    ColorToken::Geekblue,
    ColorToken::Orange,
];

/// Fixed colors for the term-standardization domains
pub const TERM_DOMAIN_PINS: [(&str, ColorToken); 10] = [
    ("MEDICAL", ColorToken::Red),
    ("LEGAL", ColorToken::Blue),
    ("FINANCE", ColorToken::Gold),
    ("金融", ColorToken::Gold),
    ("ENGINEERING", ColorToken::Green),
    ("IT", ColorToken::Purple),
    ("SCIENCE", ColorToken::Cyan),
    ("BUSINESS", ColorToken::Volcano),
    ("EDUCATION", ColorToken::Geekblue),
    ("DEFAULT", ColorToken::Default),
];

// =============================================================================
// Label hash
// =============================================================================

/// 32-bit polynomial hash (`h = h * 31 + unit`) over the label's UTF-16 code
/// units, folded to its absolute value.
///
/// Walking UTF-16 units keeps the result identical to the hash the browser
/// computes with `charCodeAt`, so colors match between JS and WASM renderers.
pub fn label_hash(label: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in label.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}

// =============================================================================
// Palette
// =============================================================================

/// Color pool plus label pins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub pool: Vec<ColorToken>,
    pub pinned: HashMap<String, ColorToken>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            pool: DEFAULT_POOL.to_vec(),
            pinned: HashMap::new(),
        }
    }
}

impl Palette {
    pub fn new(pool: Vec<ColorToken>) -> Self {
        Self {
            pool,
            pinned: HashMap::new(),
        }
    }

    /// Default pool with the term-domain pins applied
    pub fn term_domains() -> Self {
        TERM_DOMAIN_PINS
            .iter()
            .fold(Self::default(), |palette, (label, color)| palette.with_pin(*label, *color))
    }

    /// Pin `label` to `color`, bypassing the hash
    pub fn with_pin(mut self, label: impl Into<String>, color: ColorToken) -> Self {
        self.pinned.insert(label.into(), color);
        self
    }

    /// Uncached color choice for a label
    pub fn pick(&self, label: &str) -> ColorToken {
        if let Some(color) = self.pinned.get(label) {
            return *color;
        }
        if self.pool.is_empty() {
            return ColorToken::Default;
        }
        let idx = label_hash(label) as usize % self.pool.len();
        self.pool[idx]
    }
}

// =============================================================================
// ColorAssignment
// =============================================================================

/// Label -> color mapping owned by one annotation run.
///
/// Entries iterate in first-assignment order. Serializes as a JSON object in
/// that order.
#[derive(Debug, Clone)]
pub struct ColorAssignment {
    palette: Palette,
    order: Vec<(String, ColorToken)>,
    index: HashMap<String, usize>,
}

impl Default for ColorAssignment {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl ColorAssignment {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Color for `label`, computed on first use and cached afterwards
    pub fn color_for(&mut self, label: &str) -> ColorToken {
        if let Some(&idx) = self.index.get(label) {
            return self.order[idx].1;
        }
        let color = self.palette.pick(label);
        self.index.insert(label.to_string(), self.order.len());
        self.order.push((label.to_string(), color));
        color
    }

    /// Cached color, without assigning
    pub fn get(&self, label: &str) -> Option<ColorToken> {
        self.index.get(label).map(|&idx| self.order[idx].1)
    }

    /// Assigned labels in first-assignment order
    pub fn entries(&self) -> impl Iterator<Item = (&str, ColorToken)> {
        self.order.iter().map(|(label, color)| (label.as_str(), *color))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Serialize for ColorAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (label, color) in &self.order {
            map.serialize_entry(label, color)?;
        }
        map.end()
    }
}

/// Free-function form of [`ColorAssignment::color_for`]
pub fn color_for(label: &str, assignment: &mut ColorAssignment) -> ColorToken {
    assignment.color_for(label)
}

// =============================================================================
// Tests
// =============================================================================
