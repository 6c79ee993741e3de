pub mod confidence;
pub mod parser;
pub mod signal;
pub mod tokenizer;
pub mod types;

pub use confidence::{score_from_label, tier_for_score, ConfidenceTier};
pub use parser::parse;
pub use types::{ParsedAnalysis, Section, Signal};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Render-ready result of one analysis: the parsed record plus the derived
/// confidence score and tier, with the raw text kept for storage and debug.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis: ParsedAnalysis,
    pub confidence_score: u8,
    pub tier: ConfidenceTier,
    pub raw_text: String,
    pub received_at: DateTime<Utc>,
}

pub fn build_report(text: &str, trend: &str, confidence: &str) -> AnalysisReport {
    let analysis = parser::parse(text, trend, confidence);
    let confidence_score = confidence::score_from_label(confidence);
    AnalysisReport {
        analysis,
        confidence_score,
        tier: confidence::tier_for_score(confidence_score),
        raw_text: text.to_string(),
        received_at: Utc::now(),
    }
}
