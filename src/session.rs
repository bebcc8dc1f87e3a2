//! AnalysisSession - one form's submission lifecycle
//!
//! The dashboard fires a service request per submission and may submit again
//! before the previous request resolves. The session tracks which submission is
//! current; results for anything older are discarded (last submission wins).
//! Every accepted result is annotated with a brand-new color assignment.

use serde::Serialize;

use crate::annotate::{AnnotationRun, Annotator, Span, SpanPayload};
use crate::config::FormConfig;
use crate::error::{FinmarkError, Result};
use crate::service::{decode_response, Analysis, AnalysisKind};

pub type SubmissionId = u32;

/// A submission accepted by [`AnalysisSession::begin`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SessionState<P> {
    Idle,
    Pending {
        id: SubmissionId,
    },
    Ready {
        id: SubmissionId,
        text: String,
        run: AnnotationRun<P>,
    },
    Failed {
        id: SubmissionId,
        message: String,
    },
}

/// What happened to a resolved submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Result became the session's current state
    Applied,
    /// A newer submission (or a clear) superseded it; result discarded
    Stale,
}

pub struct AnalysisSession<P> {
    kind: AnalysisKind,
    annotator: Annotator,
    max_input_chars: usize,
    next_id: SubmissionId,
    pending: Option<Submission>,
    state: SessionState<P>,
}

impl<P: SpanPayload + Clone> AnalysisSession<P> {
    fn with_kind(kind: AnalysisKind, config: &FormConfig) -> Self {
        Self {
            kind,
            annotator: Annotator::new(config.palette.clone(), config.bands),
            max_input_chars: config.max_input_chars,
            next_id: 1,
            pending: None,
            state: SessionState::Idle,
        }
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn state(&self) -> &SessionState<P> {
        &self.state
    }

    /// The current run, once a result has been applied
    pub fn run(&self) -> Option<&AnnotationRun<P>> {
        match &self.state {
            SessionState::Ready { run, .. } => Some(run),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&Submission> {
        self.pending.as_ref()
    }

    /// Validate `text` and make it the current submission.
    ///
    /// Any submission still in flight becomes stale. A rejected text leaves
    /// the session untouched.
    pub fn begin(&mut self, text: &str) -> Result<SubmissionId> {
        if text.trim().is_empty() {
            return Err(FinmarkError::EmptyInput { kind: self.kind });
        }
        let len = text.chars().count();
        if len > self.max_input_chars {
            return Err(FinmarkError::InputTooLong {
                len,
                max: self.max_input_chars,
            });
        }

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);

        if let Some(previous) = self.pending.replace(Submission {
            id,
            text: text.to_string(),
        }) {
            crate::console_log!("[Session] Submission {} superseded by {}", previous.id, id);
        }
        self.state = SessionState::Pending { id };
        Ok(id)
    }

    /// Take the pending submission if `id` is the current one
    fn take_current(&mut self, id: SubmissionId) -> Option<Submission> {
        if self.is_current(id) {
            return self.pending.take();
        }
        crate::console_debug!("[Session] Discarding stale result for submission {}", id);
        None
    }

    fn is_current(&self, id: SubmissionId) -> bool {
        self.pending.as_ref().map(|s| s.id) == Some(id)
    }

    /// Annotate the resolved spans of submission `id`
    pub fn complete(&mut self, id: SubmissionId, spans: Vec<Span<P>>) -> Outcome {
        let Some(submission) = self.take_current(id) else {
            return Outcome::Stale;
        };

        let run = self.annotator.run(&submission.text, &spans);
        self.state = SessionState::Ready {
            id,
            text: submission.text,
            run,
        };
        Outcome::Applied
    }

    /// Record that submission `id` failed.
    ///
    /// The state carries the form's user-facing message; the underlying error
    /// only goes to the console.
    pub fn fail(&mut self, id: SubmissionId, error: &FinmarkError) -> Outcome {
        if self.take_current(id).is_none() {
            return Outcome::Stale;
        }

        crate::console_error!("[Session] {:?} submission {} failed: {}", self.kind, id, error);
        self.state = SessionState::Failed {
            id,
            message: self.kind.unavailable_message().to_string(),
        };
        Outcome::Applied
    }

    /// Abandon any pending submission and drop the current result
    pub fn clear(&mut self) {
        self.pending = None;
        self.state = SessionState::Idle;
    }
}

impl<P: Analysis + SpanPayload + Clone> AnalysisSession<P> {
    /// Session for the form whose service returns `P`
    pub fn new(config: &FormConfig) -> Self {
        Self::with_kind(P::KIND, config)
    }

    /// Resolve submission `id` from a raw service response.
    ///
    /// A non-2xx status or undecodable body fails the submission. Stale
    /// responses are discarded before they are decoded.
    pub fn resolve(&mut self, id: SubmissionId, status: u16, body: &str) -> Result<Outcome> {
        if !self.is_current(id) {
            crate::console_debug!("[Session] Discarding stale response for submission {}", id);
            return Ok(Outcome::Stale);
        }

        match decode_response::<P>(status, body) {
            Ok(spans) => Ok(self.complete(id, spans)),
            Err(e) => {
                let err = FinmarkError::from(e);
                self.fail(id, &err);
                Err(err)
            }
        }
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{concat, EntityPayload, TermPayload};
    use crate::error::ServiceError;

    fn session() -> AnalysisSession<EntityPayload> {
        AnalysisSession::new(&FormConfig::entities())
    }

    fn entity(start: i64, end: i64, label: &str) -> Span<EntityPayload> {
        Span::new(
            start,
            end,
            label,
            EntityPayload {
                text: String::new(),
                confidence: 0.9,
            },
        )
    }

    #[test]
    fn test_starts_idle() {
        let session = session();
        assert!(matches!(session.state(), SessionState::Idle));
        assert!(session.run().is_none());
    }

    #[test]
    fn test_blank_input_rejected() {
        let mut session = session();
        assert!(matches!(
            session.begin("   \n"),
            Err(FinmarkError::EmptyInput {
                kind: AnalysisKind::Entities
            })
        ));
        assert!(matches!(session.state(), SessionState::Idle));
    }

    #[test]
    fn test_blank_input_message_follows_form() {
        let err = session().begin("").unwrap_err();
        assert_eq!(err.to_string(), "请输入需要分析的文本内容");

        let mut terms: AnalysisSession<TermPayload> = AnalysisSession::new(&FormConfig::terms());
        assert_eq!(terms.kind(), AnalysisKind::Terms);
        let err = terms.begin(" ").unwrap_err();
        assert_eq!(err.to_string(), "请输入需要进行术语标准化的文本内容");
    }

    #[test]
    fn test_long_input_rejected_by_chars() {
        let config = FormConfig {
            max_input_chars: 3,
            ..FormConfig::entities()
        };
        let mut session: AnalysisSession<EntityPayload> = AnalysisSession::new(&config);

        // 3 chars, 9 bytes
        assert!(session.begin("利率高").is_ok());
        assert!(matches!(
            session.begin("利率上调"),
            Err(FinmarkError::InputTooLong { len: 4, max: 3 })
        ));
    }

    #[test]
    fn test_complete_produces_run() {
        let mut session = session();
        let id = session.begin("Fed raised rates").unwrap();
        assert!(matches!(session.state(), SessionState::Pending { .. }));

        assert_eq!(session.complete(id, vec![entity(0, 3, "ORG")]), Outcome::Applied);

        let run = session.run().unwrap();
        assert_eq!(concat(&run.segments), "Fed raised rates");
        assert_eq!(run.rows.len(), 1);
        assert!(session.pending().is_none());
    }

    #[test]
    fn test_last_submission_wins() {
        let mut session = session();
        let first = session.begin("first text").unwrap();
        let second = session.begin("second text").unwrap();

        // Older result arrives late and is discarded
        assert_eq!(session.complete(first, vec![entity(0, 5, "ORG")]), Outcome::Stale);
        assert!(matches!(session.state(), SessionState::Pending { id } if *id == second));

        assert_eq!(session.complete(second, vec![entity(0, 6, "PERSON")]), Outcome::Applied);
        let run = session.run().unwrap();
        assert_eq!(run.segments[0].value(), "second");
        assert!(run.colors.get("ORG").is_none());
    }

    #[test]
    fn test_result_after_newer_result_is_stale() {
        let mut session = session();
        let first = session.begin("one").unwrap();
        session.complete(first, Vec::new());

        assert_eq!(session.complete(first, vec![entity(0, 3, "ORG")]), Outcome::Stale);
        assert!(session.run().unwrap().colors.is_empty());
    }

    #[test]
    fn test_each_result_gets_fresh_colors() {
        let mut session = session();
        let id = session.begin("ab").unwrap();
        session.complete(id, vec![entity(0, 1, "ORG"), entity(1, 2, "MONEY")]);
        assert_eq!(session.run().unwrap().colors.len(), 2);

        let id = session.begin("ab").unwrap();
        session.complete(id, vec![entity(0, 1, "PERSON")]);
        let colors = &session.run().unwrap().colors;
        assert_eq!(colors.len(), 1);
        assert!(colors.get("ORG").is_none());
    }

    #[test]
    fn test_fail_sets_user_message() {
        let mut session = session();
        let id = session.begin("text").unwrap();
        let err = FinmarkError::Service(ServiceError::Status(500));

        assert_eq!(session.fail(id, &err), Outcome::Applied);
        match session.state() {
            SessionState::Failed { message, .. } => {
                assert_eq!(message, AnalysisKind::Entities.unavailable_message())
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_stale_failure_ignored() {
        let mut session = session();
        let first = session.begin("one").unwrap();
        let _second = session.begin("two").unwrap();

        let err = FinmarkError::Service(ServiceError::Status(502));
        assert_eq!(session.fail(first, &err), Outcome::Stale);
        assert!(matches!(session.state(), SessionState::Pending { .. }));
    }

    #[test]
    fn test_clear_abandons_pending() {
        let mut session = session();
        let id = session.begin("text").unwrap();
        session.clear();

        assert!(matches!(session.state(), SessionState::Idle));
        assert_eq!(session.complete(id, vec![entity(0, 4, "ORG")]), Outcome::Stale);
        assert!(matches!(session.state(), SessionState::Idle));
    }

    #[test]
    fn test_ids_are_distinct() {
        let mut session = session();
        let a = session.begin("a").unwrap();
        let b = session.begin("b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_decodes_service_body() {
        let mut session = session();
        let id = session.begin("美联储加息").unwrap();
        let body = r#"[{"text": "美联储", "type": "ORG", "start": 0, "end": 3, "confidence": 0.95}]"#;

        assert_eq!(session.resolve(id, 200, body).unwrap(), Outcome::Applied);
        let run = session.run().unwrap();
        assert_eq!(run.segments[0].value(), "美联储");
        assert_eq!(run.segments[1].value(), "加息");
    }

    #[test]
    fn test_resolve_keeps_good_spans_beside_malformed_ones() {
        let mut session = session();
        let id = session.begin("美联储加息").unwrap();
        let body = r#"[
            {"text": "美联储", "type": "ORG", "start": 0, "end": 3, "confidence": 0.95},
            {"text": "加息", "type": "EVENT", "start": null, "end": 5, "confidence": 0.8},
            {"text": "加", "type": "EVENT", "start": 3.5, "end": 4, "confidence": 0.8}
        ]"#;

        assert_eq!(session.resolve(id, 200, body).unwrap(), Outcome::Applied);
        let run = session.run().unwrap();
        assert_eq!(run.segments.len(), 2);
        assert_eq!(run.segments[0].label(), Some("ORG"));
        assert_eq!(run.segments[1].value(), "加息");
        assert_eq!(run.rows.len(), 1);
    }

    #[test]
    fn test_resolve_error_status_fails_submission() {
        let mut session = session();
        let id = session.begin("text").unwrap();

        let err = session.resolve(id, 500, "Internal Server Error").unwrap_err();

        assert!(matches!(err, FinmarkError::Service(ServiceError::Status(500))));
        assert!(matches!(session.state(), SessionState::Failed { .. }));
    }

    #[test]
    fn test_resolve_stale_skips_decoding() {
        let mut session = session();
        let first = session.begin("one").unwrap();
        let _second = session.begin("two").unwrap();

        // Garbage body for a stale id is not an error
        assert_eq!(session.resolve(first, 500, "garbage").unwrap(), Outcome::Stale);
        assert!(matches!(session.state(), SessionState::Pending { .. }));
    }

    #[test]
    fn test_term_session_uses_pinned_colors() {
        let mut session: AnalysisSession<TermPayload> =
            AnalysisSession::new(&FormConfig::terms());
        let id = session.begin("央妈降准").unwrap();
        let body = r#"[{"original": "央妈", "standard": "中国人民银行", "start": 0, "end": 2, "confidence": 0.9}]"#;

        session.resolve(id, 200, body).unwrap();

        let run = session.run().unwrap();
        assert_eq!(run.segments[0].color(), Some(crate::annotate::ColorToken::Gold));
        assert_eq!(run.rows[0].replacement.as_deref(), Some("中国人民银行"));
    }
}
