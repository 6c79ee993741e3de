use serde::{Deserialize, Serialize};

/// Directional call extracted from the analysis text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Uptrend,
    Downtrend,
    #[default]
    Neutral,
}

/// The seven named sections a producer can emit bullets under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    KeyLevels,
    SignalReasons,
    RiskAssessment,
    BreakoutRetest,
    Indicators,
    Fibonacci,
    PsychologyPlan,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::KeyLevels => "Key Levels",
            Section::SignalReasons => "Signal Reasons",
            Section::RiskAssessment => "Risk Assessment",
            Section::BreakoutRetest => "Breakout & Retest",
            Section::Indicators => "Indicators",
            Section::Fibonacci => "Fibonacci",
            Section::PsychologyPlan => "Psychology & Plan",
        }
    }
}

/// Typed record produced from one raw analysis blob.
///
/// Price levels stay opaque display strings; the producer writes them with
/// thousands separators and currency prefixes we must not mangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedAnalysis {
    pub signal: Signal,
    pub confidence: String,
    pub entry: Option<String>,
    pub stop_loss: Option<String>,
    pub take_profit: Option<String>,
    pub key_levels: Vec<String>,
    pub signal_reasons: Vec<String>,
    pub risk_assessment: Vec<String>,
    pub breakout_retest: Vec<String>,
    pub indicators: Vec<String>,
    pub fibonacci: Vec<String>,
    pub psychology_plan: Vec<String>,
}

impl ParsedAnalysis {
    pub fn section_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::KeyLevels => &mut self.key_levels,
            Section::SignalReasons => &mut self.signal_reasons,
            Section::RiskAssessment => &mut self.risk_assessment,
            Section::BreakoutRetest => &mut self.breakout_retest,
            Section::Indicators => &mut self.indicators,
            Section::Fibonacci => &mut self.fibonacci,
            Section::PsychologyPlan => &mut self.psychology_plan,
        }
    }

    /// All sections in their fixed display order.
    pub fn sections(&self) -> [(Section, &Vec<String>); 7] {
        [
            (Section::KeyLevels, &self.key_levels),
            (Section::SignalReasons, &self.signal_reasons),
            (Section::RiskAssessment, &self.risk_assessment),
            (Section::BreakoutRetest, &self.breakout_retest),
            (Section::Indicators, &self.indicators),
            (Section::Fibonacci, &self.fibonacci),
            (Section::PsychologyPlan, &self.psychology_plan),
        ]
    }

    pub fn has_levels(&self) -> bool {
        self.entry.is_some() || self.stop_loss.is_some() || self.take_profit.is_some()
    }
}
