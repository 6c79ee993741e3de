use super::types::Signal;

// Keyword vocabulary across producer generations: the action words
// (BUY/SELL/HOLD), the trend words the prompt asks for, and the wire-level
// labels the backend maps them to.
const MARKERS: [(&str, Signal); 9] = [
    ("BUY", Signal::Uptrend),
    ("BULLISH", Signal::Uptrend),
    ("UPTREND", Signal::Uptrend),
    ("SELL", Signal::Downtrend),
    ("BEARISH", Signal::Downtrend),
    ("DOWNTREND", Signal::Downtrend),
    ("HOLD", Signal::Neutral),
    ("SIDEWAYS", Signal::Neutral),
    ("NEUTRAL", Signal::Neutral),
];

/// Classify a line that consists solely of a direction keyword.
pub fn classify_marker(line: &str) -> Option<Signal> {
    let upper = line.trim().to_uppercase();
    MARKERS
        .iter()
        .find(|(word, _)| *word == upper)
        .map(|(_, signal)| *signal)
}

/// Map an out-of-band trend label (e.g. "bullish" from the response envelope)
/// to a signal. Unknown labels fall back to neutral.
pub fn signal_from_label(label: &str) -> Signal {
    classify_marker(label).unwrap_or(Signal::Neutral)
}
