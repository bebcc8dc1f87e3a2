//! Remote text-analysis service contract.
//!
//! Both forms POST `{"text": ...}` and receive a JSON array. Transport is the
//! caller's business (the dashboard's `fetch`); this module builds the request
//! body, checks the status, and decodes the body into spans.
//!
//! # Endpoints
//! - `POST /api/ner` -> `[{ text, type, start, end, confidence }]`
//! - `POST /api/std` -> `[{ original, standard, start, end, confidence }]`

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::annotate::{EntityPayload, Span, TermPayload};
use crate::error::ServiceError;

/// Label for entities the service returns without a type
pub const UNKNOWN_ENTITY_TYPE: &str = "UNKNOWN";

/// The service sends no domain for standardized terms
pub const DEFAULT_TERM_DOMAIN: &str = "金融";
pub const DEFAULT_TERM_REASON: &str = "金融专业术语";

// ==================== ANALYSIS KIND ====================

/// Which dashboard form a request belongs to
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Entities,
    Terms,
}

impl AnalysisKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            AnalysisKind::Entities => "/api/ner",
            AnalysisKind::Terms => "/api/std",
        }
    }

    /// Error text shown when the service call fails
    pub fn unavailable_message(&self) -> &'static str {
        match self {
            AnalysisKind::Entities => "实体抽取服务暂时不可用，请稍后重试",
            AnalysisKind::Terms => "术语标准化服务暂时不可用，请稍后重试",
        }
    }

    /// Warning shown when the form is submitted blank or whitespace only
    pub fn empty_input_message(&self) -> &'static str {
        match self {
            AnalysisKind::Entities => "请输入需要分析的文本内容",
            AnalysisKind::Terms => "请输入需要进行术语标准化的文本内容",
        }
    }
}

// ==================== REQUEST ====================

#[derive(Serialize, Debug)]
pub struct AnalysisRequest<'a> {
    pub text: &'a str,
}

/// JSON body for either endpoint
pub fn request_body(text: &str) -> Result<String, ServiceError> {
    Ok(serde_json::to_string(&AnalysisRequest { text })?)
}

/// `base` joined with the form's endpoint path
pub fn endpoint_url(base: &str, kind: AnalysisKind) -> String {
    format!("{}{}", base.trim_end_matches('/'), kind.endpoint())
}

/// Anything outside 2xx is a failure
pub fn check_status(status: u16) -> Result<(), ServiceError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ServiceError::Status(status))
    }
}

// ==================== RESPONSES ====================

/// One item of the `/api/ner` response
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NerEntity {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub confidence: f64,
}

impl From<NerEntity> for Span<EntityPayload> {
    fn from(item: NerEntity) -> Self {
        let label = item
            .entity_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_ENTITY_TYPE.to_string());
        Span::new(
            item.start,
            item.end,
            label,
            EntityPayload {
                text: item.text,
                confidence: item.confidence,
            },
        )
    }
}

/// One item of the `/api/std` response
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StdTerm {
    pub original: String,
    pub standard: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub confidence: f64,
}

impl From<StdTerm> for Span<TermPayload> {
    fn from(item: StdTerm) -> Self {
        Span::new(
            item.start,
            item.end,
            DEFAULT_TERM_DOMAIN,
            TermPayload {
                original: item.original,
                standard: item.standard,
                domain: DEFAULT_TERM_DOMAIN.to_string(),
                reason: DEFAULT_TERM_REASON.to_string(),
                confidence: item.confidence,
            },
        )
    }
}

/// Decode each array item on its own, skipping items that do not fit `T`.
///
/// A bad offset in one item (`null`, missing, fractional) must not cost the
/// rest of the response its highlighting.
pub fn decode_items<T: DeserializeOwned>(items: Vec<serde_json::Value>) -> Vec<T> {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(e) => {
                crate::console_debug!("[Service] Skipping malformed item: {}", e);
                None
            }
        })
        .collect();
    if decoded.len() < total {
        crate::console_debug!("[Service] Kept {} of {} items", decoded.len(), total);
    }
    decoded
}

/// Payload types that can be decoded from one of the service endpoints
pub trait Analysis: Sized {
    const KIND: AnalysisKind;

    fn decode(body: &str) -> Result<Vec<Span<Self>>, ServiceError>;
}

impl Analysis for EntityPayload {
    const KIND: AnalysisKind = AnalysisKind::Entities;

    fn decode(body: &str) -> Result<Vec<Span<Self>>, ServiceError> {
        let items: Vec<serde_json::Value> = serde_json::from_str(body)?;
        Ok(decode_items::<NerEntity>(items).into_iter().map(Span::from).collect())
    }
}

impl Analysis for TermPayload {
    const KIND: AnalysisKind = AnalysisKind::Terms;

    fn decode(body: &str) -> Result<Vec<Span<Self>>, ServiceError> {
        let items: Vec<serde_json::Value> = serde_json::from_str(body)?;
        Ok(decode_items::<StdTerm>(items).into_iter().map(Span::from).collect())
    }
}

/// Check `status`, then decode `body` as `P`'s response type
pub fn decode_response<P: Analysis>(status: u16, body: &str) -> Result<Vec<Span<P>>, ServiceError> {
    check_status(status)?;
    P::decode(body)
}

// ==================== TESTS ====================
