//! Glossary - offline term standardization
//!
//! Matches a fixed set of colloquial terms and proposes their standard forms,
//! producing the same `TermPayload` spans the `/api/std` service returns. Used
//! as demo data when the service is not reachable.
//!
//! Matching is leftmost-longest, so "心梗塞" is one term rather than "心梗"
//! followed by a stray "塞", and "被上诉人" wins over the "上诉人" inside it.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use serde::{Deserialize, Serialize};

use crate::annotate::{Span, TermPayload};
use crate::error::{FinmarkError, Result};

// ==================== RULES ====================

/// One colloquial -> standard term mapping
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TermRule {
    pub pattern: String,
    pub standard: String,
    pub domain: String,
    pub reason: String,
    pub confidence: f64,
}

impl TermRule {
    pub fn new(pattern: &str, standard: &str, domain: &str, reason: &str, confidence: f64) -> Self {
        Self {
            pattern: pattern.to_string(),
            standard: standard.to_string(),
            domain: domain.to_string(),
            reason: reason.to_string(),
            confidence,
        }
    }
}

const MEDICAL_REASON: &str = "标准医学术语";
const LEGAL_REASON: &str = "法律文书标准用语";
const IT_REASON: &str = "技术文档标准术语";

/// Built-in demo rules: (pattern, standard, domain, reason, confidence)
const BUILTIN_RULES: &[(&str, &str, &str, &str, f64)] = &[
    ("心梗", "心肌梗死", "MEDICAL", MEDICAL_REASON, 0.92),
    ("心梗塞", "心肌梗死", "MEDICAL", MEDICAL_REASON, 0.92),
    ("脑梗", "脑梗死", "MEDICAL", MEDICAL_REASON, 0.92),
    ("心衰", "心力衰竭", "MEDICAL", MEDICAL_REASON, 0.92),
    ("高血压", "高血压病", "MEDICAL", MEDICAL_REASON, 0.92),
    ("被告方", "被告", "LEGAL", LEGAL_REASON, 0.85),
    ("原告方", "原告", "LEGAL", LEGAL_REASON, 0.85),
    ("上诉人", "上诉方", "LEGAL", LEGAL_REASON, 0.85),
    ("被上诉人", "被上诉方", "LEGAL", LEGAL_REASON, 0.85),
    ("云端", "云平台", "IT", IT_REASON, 0.88),
    ("大数据", "海量数据", "IT", IT_REASON, 0.88),
    ("AI", "人工智能", "IT", IT_REASON, 0.88),
    ("机器学习", "ML", "IT", "技术文档缩写标准", 0.88),
];

// ==================== GLOSSARY ====================

pub struct Glossary {
    automaton: AhoCorasick,
    rules: Vec<TermRule>,
}

impl Glossary {
    /// Glossary over the built-in medical, legal and IT rules
    pub fn builtin() -> Result<Self> {
        let rules = BUILTIN_RULES
            .iter()
            .map(|&(pattern, standard, domain, reason, confidence)| {
                TermRule::new(pattern, standard, domain, reason, confidence)
            })
            .collect();
        Self::new(rules)
    }

    pub fn new(rules: Vec<TermRule>) -> Result<Self> {
        if rules.iter().any(|rule| rule.pattern.is_empty()) {
            return Err(FinmarkError::Config("glossary pattern must not be empty".to_string()));
        }

        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .build(rules.iter().map(|rule| rule.pattern.as_str()))
            .map_err(|e| FinmarkError::Config(format!("Glossary build error: {}", e)))?;

        Ok(Self { automaton, rules })
    }

    pub fn rules(&self) -> &[TermRule] {
        &self.rules
    }

    /// Term spans for every rule occurrence, in text order, with char offsets
    pub fn standardize(&self, text: &str) -> Vec<Span<TermPayload>> {
        let mut spans = Vec::new();
        let mut byte_cursor = 0usize;
        let mut char_cursor = 0usize;

        for m in self.automaton.find_iter(text) {
            let rule = &self.rules[m.pattern().as_usize()];

            // Matches are non-overlapping and increasing, so chars can be
            // counted incrementally from the previous match
            let start = char_cursor + text[byte_cursor..m.start()].chars().count();
            let end = start + text[m.start()..m.end()].chars().count();
            byte_cursor = m.end();
            char_cursor = end;

            spans.push(Span::new(
                start as i64,
                end as i64,
                rule.domain.clone(),
                TermPayload {
                    original: text[m.start()..m.end()].to_string(),
                    standard: rule.standard.clone(),
                    domain: rule.domain.clone(),
                    reason: rule.reason.clone(),
                    confidence: rule.confidence,
                },
            ));
        }

        spans
    }
}

// ==================== TESTS ====================
