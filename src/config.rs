//! Form configuration types and defaults.

use serde::{Deserialize, Serialize};

use crate::annotate::Palette;
use crate::error::{FinmarkError, Result};
use crate::report::ConfidenceBands;
use crate::service::{endpoint_url, AnalysisKind};

/// Settings for one dashboard form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormConfig {
    /// Base URL of the analysis service. Default: http://127.0.0.1:8001
    pub service_base_url: String,
    /// Longest accepted submission, in chars. Default: 5000
    pub max_input_chars: usize,
    /// Confidence band thresholds for the table. Default: 0.85 / 0.7
    pub bands: ConfidenceBands,
    /// Label colors
    pub palette: Palette,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            service_base_url: "http://127.0.0.1:8001".to_string(),
            max_input_chars: 5000,
            bands: ConfidenceBands::default(),
            palette: Palette::default(),
        }
    }
}

impl FormConfig {
    /// Entity form: hash-assigned colors only
    pub fn entities() -> Self {
        Self::default()
    }

    /// Term form: domains pinned to their fixed colors
    pub fn terms() -> Self {
        Self {
            palette: Palette::term_domains(),
            ..Self::default()
        }
    }

    pub fn preset(kind: AnalysisKind) -> Self {
        match kind {
            AnalysisKind::Entities => Self::entities(),
            AnalysisKind::Terms => Self::terms(),
        }
    }

    /// Overlay the top-level fields present in `overrides` onto `self`.
    ///
    /// Fields absent from `overrides` keep this config's values, so a term
    /// form given `{ "maxInputChars": 200 }` keeps its pinned palette.
    pub fn with_overrides(self, overrides: serde_json::Value) -> Result<Self> {
        let patch = match overrides {
            serde_json::Value::Null => return Ok(self),
            serde_json::Value::Object(map) => map,
            other => return Err(FinmarkError::Config(format!("expected an object, got {}", other))),
        };

        let mut merged = serde_json::to_value(&self).map_err(|e| FinmarkError::Config(e.to_string()))?;
        if let serde_json::Value::Object(base) = &mut merged {
            base.extend(patch);
        }
        serde_json::from_value(merged).map_err(|e| FinmarkError::Config(e.to_string()))
    }

    pub fn endpoint(&self, kind: AnalysisKind) -> String {
        endpoint_url(&self.service_base_url, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::ColorToken;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = FormConfig::default();
        assert_eq!(config.max_input_chars, 5000);
        assert_eq!(config.endpoint(AnalysisKind::Entities), "http://127.0.0.1:8001/api/ner");
        assert!(config.palette.pinned.is_empty());
    }

    #[test]
    fn test_terms_preset_pins_domains() {
        let config = FormConfig::preset(AnalysisKind::Terms);
        assert_eq!(config.palette.pick("LEGAL"), ColorToken::Blue);
    }

    #[test]
    fn test_partial_overrides_keep_other_defaults() {
        let config = FormConfig::entities()
            .with_overrides(json!({ "serviceBaseUrl": "https://nlp.example.com" }))
            .unwrap();
        assert_eq!(config.service_base_url, "https://nlp.example.com");
        assert_eq!(config.max_input_chars, 5000);
        assert_eq!(config.bands, ConfidenceBands::default());
    }

    #[test]
    fn test_mistyped_override_rejected() {
        let err = FormConfig::entities()
            .with_overrides(json!({ "maxInputChars": "many" }))
            .unwrap_err();
        assert!(matches!(err, FinmarkError::Config(_)));
    }

    #[test]
    fn test_overrides_keep_preset_palette() {
        let config = FormConfig::terms()
            .with_overrides(json!({ "maxInputChars": 200 }))
            .unwrap();
        assert_eq!(config.max_input_chars, 200);
        assert_eq!(config.palette, Palette::term_domains());
    }

    #[test]
    fn test_overrides_replace_palette() {
        let config = FormConfig::terms()
            .with_overrides(json!({ "palette": { "pool": ["cyan"] } }))
            .unwrap();
        assert_eq!(config.palette.pool, vec![ColorToken::Cyan]);
        assert!(config.palette.pinned.is_empty());
    }

    #[test]
    fn test_null_overrides_are_noop() {
        let config = FormConfig::entities().with_overrides(serde_json::Value::Null).unwrap();
        assert_eq!(config, FormConfig::entities());
    }

    #[test]
    fn test_non_object_overrides_rejected() {
        assert!(FormConfig::entities().with_overrides(json!([1, 2])).is_err());
    }
}
