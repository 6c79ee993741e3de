use chrono::NaiveDateTime;
use serde::Serialize;

use crate::analysis::{build_report, AnalysisReport};
use crate::backend::StoredAnalysis;

/// A past analysis, re-parsed into the structured report on load. The
/// backend only stores the raw producer text, so the parser runs again
/// here with the stored trend and confidence as fallbacks.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub report: AnalysisReport,
}

impl From<StoredAnalysis> for HistoryEntry {
    fn from(stored: StoredAnalysis) -> Self {
        let report = build_report(&stored.analysis_text, &stored.trend, &stored.confidence);
        Self {
            id: stored.id,
            created_at: stored.created_at,
            report,
        }
    }
}
