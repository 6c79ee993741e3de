use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Response envelope of `/analyze-image`: the raw text plus the trend and
/// confidence labels the server already derived from it. Both labels stay
/// strings on the wire; the parser maps them with its own fallbacks.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
    pub trend: String,
    pub confidence: String,
}

/// One `/analysis-history` item. Timestamps come back naive (server-side
/// UTC without an offset), hence `NaiveDateTime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub id: i64,
    pub trend: String,
    pub confidence: String,
    pub analysis_text: String,
    pub created_at: NaiveDateTime,
}

/// Failure taxonomy the workflow acts on. Everything else about an HTTP
/// exchange collapses into these three cases.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The server refused on entitlement grounds (HTTP 403), with the
    /// human-readable reason from the response body.
    #[error("analysis denied: {detail}")]
    Denied { detail: String },

    /// Any other non-success status.
    #[error("backend error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// The exchange never completed: connect, timeout or decode trouble.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_wire_shape() {
        let body = r#"[{"id":7,"trend":"bullish","confidence":"high","analysis_text":"UPTREND\nhigh","created_at":"2024-01-15T10:30:00.123456"}]"#;
        let items: Vec<StoredAnalysis> = serde_json::from_str(body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 7);
        assert_eq!(items[0].trend, "bullish");
        assert_eq!(items[0].created_at.format("%Y-%m-%d").to_string(), "2024-01-15");
    }

    #[test]
    fn test_analysis_response_ignores_extra_fields() {
        let body = r#"{"analysis":"NEUTRAL\nlow","trend":"sideways","confidence":"low","model":"g-2"}"#;
        let resp: AnalysisResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.trend, "sideways");
        assert_eq!(resp.confidence, "low");
    }
}
