//! Core types for the explain-error client
//!
//! Defines the wire payloads exchanged with the backend action and the
//! transient per-page-load state:
//! - Build status codes
//! - Explanation results and cached-explanation metadata
//! - Page context read from host-rendered data attributes
//! - Flow state and UI events

use serde::{Deserialize, Serialize};

/// Status of the job run associated with the current page.
///
/// Source of truth is the backend; the client only holds the last poll
/// result for the duration of the page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStatus {
    /// Run succeeded or the page is otherwise not a candidate (wire code 0
    /// or absent). No action is offered.
    Unrelated,
    /// Run is still in progress (wire code 1).
    Running,
    /// Run completed with a failing or unstable result (wire code 2).
    CompletedFailed,
}

impl BuildStatus {
    /// Decode the wire code. Unknown codes are treated as [`Self::Unrelated`].
    #[inline]
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Running,
            2 => Self::CompletedFailed,
            _ => Self::Unrelated,
        }
    }
}

/// Wire payload of the `checkBuildStatus` endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildStatusPayload {
    /// 0/absent = unrelated, 1 = running, 2 = completed and failing.
    #[serde(rename = "buildingStatus", default)]
    pub building_status: i64,
}

impl From<BuildStatusPayload> for BuildStatus {
    fn from(payload: BuildStatusPayload) -> Self {
        Self::from_code(payload.building_status)
    }
}

/// Application-level status of an explanation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplainStatus {
    /// Explanation generated (or served from cache).
    Success,
    /// Feature disabled or otherwise degraded; message is advisory.
    Warning,
    /// Generation failed. Any unrecognized status decodes here.
    Error,
}

impl<'de> Deserialize<'de> for ExplainStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let status = String::deserialize(deserializer)?;
        Ok(match status.as_str() {
            "success" => Self::Success,
            "warning" => Self::Warning,
            _ => Self::Error,
        })
    }
}

/// Result payload of the `explainConsoleError` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationResult {
    /// Outcome classification.
    pub status: ExplainStatus,
    /// Explanation text on success, diagnostic text otherwise.
    #[serde(default)]
    pub message: String,
    /// Backend-configured AI provider that produced the result.
    #[serde(rename = "providerName", default)]
    pub provider_name: String,
}

/// Result payload of the `checkExistingExplanation` endpoint.
///
/// Used only to decide whether to show the overwrite confirmation dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedExplanation {
    /// Whether the backend holds a previously generated explanation.
    #[serde(rename = "hasExplanation", default)]
    pub has_explanation: bool,
    /// Server-formatted generation time, displayed verbatim.
    #[serde(default)]
    pub timestamp: String,
}

/// Per-page-load context read once from host-rendered data attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Base path fragment of the job run (`data-run-url`).
    pub run_url: String,
    /// Site root URL from the page-level attribute.
    pub root_url: String,
    /// Display name of the configured provider (`data-provider-name`).
    pub provider_name: String,
    /// Whether a cached explanation existed at render time
    /// (`data-has-explanation`).
    pub has_explanation: bool,
    /// Whether the feature is enabled for this run (`data-plugin-enabled`).
    pub plugin_enabled: bool,
}

impl PageContext {
    /// Build a context from the raw attribute strings. The boolean
    /// attributes are `"true"` or anything else, per the host contract.
    #[must_use]
    pub fn from_attributes(
        root_url: impl Into<String>,
        run_url: impl Into<String>,
        provider_name: impl Into<String>,
        has_explanation: &str,
        plugin_enabled: &str,
    ) -> Self {
        Self {
            run_url: run_url.into(),
            root_url: root_url.into(),
            provider_name: provider_name.into(),
            has_explanation: has_explanation == "true",
            plugin_enabled: plugin_enabled == "true",
        }
    }
}

/// Severity of a banner notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// State of the explanation request flow, per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// No request in progress.
    Idle,
    /// Cache-check call in flight.
    CheckingCache,
    /// Overwrite confirmation dialog is showing.
    AwaitingConfirmation,
    /// Explain call in flight.
    Requesting,
}

/// User interactions delivered by the host page bindings.
///
/// The bindings are wired once per page load and survive dialog
/// show/hide cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// The "Explain Error" action was activated.
    ExplainClicked,
    /// Dialog: reuse the cached explanation.
    ConfirmViewExisting,
    /// Dialog: regenerate, bypassing the cache.
    ConfirmGenerateNew,
    /// Dialog: dismissed with no further action.
    ConfirmCancel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_status_from_code() {
        assert_eq!(BuildStatus::from_code(0), BuildStatus::Unrelated);
        assert_eq!(BuildStatus::from_code(1), BuildStatus::Running);
        assert_eq!(BuildStatus::from_code(2), BuildStatus::CompletedFailed);
        assert_eq!(BuildStatus::from_code(7), BuildStatus::Unrelated);
    }

    #[test]
    fn build_status_payload_decodes_absent_field() {
        let payload: BuildStatusPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(BuildStatus::from(payload), BuildStatus::Unrelated);

        let payload: BuildStatusPayload =
            serde_json::from_str(r#"{"buildingStatus": 2}"#).unwrap();
        assert_eq!(BuildStatus::from(payload), BuildStatus::CompletedFailed);
    }

    #[test]
    fn explanation_result_decodes() {
        let json = r#"{"status":"success","message":"Root cause: OOM","providerName":"OpenAI"}"#;
        let result: ExplanationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.status, ExplainStatus::Success);
        assert_eq!(result.message, "Root cause: OOM");
        assert_eq!(result.provider_name, "OpenAI");
    }

    #[test]
    fn unknown_status_decodes_as_error() {
        let json = r#"{"status":"exploded","message":"boom"}"#;
        let result: ExplanationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.status, ExplainStatus::Error);
        assert_eq!(result.provider_name, "");
    }

    #[test]
    fn cached_explanation_decodes() {
        let json = r#"{"hasExplanation":true,"timestamp":"2024-05-01 10:15:00"}"#;
        let cached: CachedExplanation = serde_json::from_str(json).unwrap();
        assert!(cached.has_explanation);
        assert_eq!(cached.timestamp, "2024-05-01 10:15:00");

        let cached: CachedExplanation = serde_json::from_str("{}").unwrap();
        assert!(!cached.has_explanation);
    }

    #[test]
    fn page_context_parses_boolean_attributes() {
        let ctx = PageContext::from_attributes(
            "https://ci.example.com",
            "job/app/42/",
            "OpenAI",
            "true",
            "yes",
        );
        assert!(ctx.has_explanation);
        assert!(!ctx.plugin_enabled);
    }
}
