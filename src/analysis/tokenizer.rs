use super::signal;
use super::types::{Section, Signal};

/// One classified line of producer text.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Marker(Signal),
    Field(FieldKind, String),
    Header(Section),
    Bullet(String),
    Prose(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Entry,
    StopLoss,
    TakeProfit,
}

// Labels from both producer generations. The legacy prompt asks for
// Reference/Lower/Upper, the premium one for Entry/SL/TP. First matching
// prefix wins, checked in this order.
const FIELD_LABELS: [(&str, FieldKind); 6] = [
    ("Entry:", FieldKind::Entry),
    ("Reference:", FieldKind::Entry),
    ("SL:", FieldKind::StopLoss),
    ("Lower:", FieldKind::StopLoss),
    ("TP:", FieldKind::TakeProfit),
    ("Upper:", FieldKind::TakeProfit),
];

// Substring match, case sensitive, so that emphasised or decorated headers
// ("**Key Levels:**", "3. Risk Assessment") still register. Checked before
// bullets: a bullet line containing one of these words moves the section
// cursor instead of adding a bullet. That matches what shipped, and
// producer text has stuck to lowercase prose inside bullets.
const SECTION_HEADERS: [(&str, Section); 8] = [
    ("Key Levels", Section::KeyLevels),
    ("Pattern Analysis", Section::SignalReasons),
    ("Signal Reason", Section::SignalReasons),
    ("Risk", Section::RiskAssessment),
    ("Breakout", Section::BreakoutRetest),
    ("Indicators", Section::Indicators),
    ("Fibonacci", Section::Fibonacci),
    ("Psychology", Section::PsychologyPlan),
];

/// Single pass over the raw text, one token per non-empty line.
pub fn tokenize(text: &str) -> impl Iterator<Item = Token> + '_ {
    text.lines().filter_map(classify_line)
}

fn classify_line(raw: &str) -> Option<Token> {
    // Emphasis is stripped before any other check; producers wrap headers
    // and occasionally whole bullets in markdown bold.
    let line = raw.trim().replace("**", "");
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(sig) = signal::classify_marker(line) {
        return Some(Token::Marker(sig));
    }

    for (label, kind) in FIELD_LABELS {
        if let Some(rest) = line.strip_prefix(label) {
            return Some(Token::Field(kind, rest.trim().to_string()));
        }
    }

    for (needle, section) in SECTION_HEADERS {
        if line.contains(needle) {
            return Some(Token::Header(section));
        }
    }

    if let Some(rest) = line.strip_prefix('*').or_else(|| line.strip_prefix('•')) {
        return Some(Token::Bullet(rest.trim().to_string()));
    }

    Some(Token::Prose(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        tokenize(text).collect()
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert!(tokens("\n   \n\t\n").is_empty());
        assert!(tokens("**").is_empty());
    }

    #[test]
    fn test_emphasised_header_classifies_as_header() {
        assert_eq!(
            tokens("**Key Levels:**"),
            vec![Token::Header(Section::KeyLevels)]
        );
        assert_eq!(
            tokens("Pattern Analysis:"),
            vec![Token::Header(Section::SignalReasons)]
        );
    }

    #[test]
    fn test_field_prefixes_map_across_generations() {
        assert_eq!(
            tokens("Entry: 64,450"),
            vec![Token::Field(FieldKind::Entry, "64,450".to_string())]
        );
        assert_eq!(
            tokens("Reference: 45,230"),
            vec![Token::Field(FieldKind::Entry, "45,230".to_string())]
        );
        assert_eq!(
            tokens("SL: 63,200"),
            vec![Token::Field(FieldKind::StopLoss, "63,200".to_string())]
        );
        assert_eq!(
            tokens("Lower: 44,800"),
            vec![Token::Field(FieldKind::StopLoss, "44,800".to_string())]
        );
        assert_eq!(
            tokens("TP: 67,800"),
            vec![Token::Field(FieldKind::TakeProfit, "67,800".to_string())]
        );
        assert_eq!(
            tokens("Upper: 46,500"),
            vec![Token::Field(FieldKind::TakeProfit, "46,500".to_string())]
        );
    }

    #[test]
    fn test_bullet_markers_and_emphasis() {
        assert_eq!(
            tokens("* Strong support at 63k"),
            vec![Token::Bullet("Strong support at 63k".to_string())]
        );
        assert_eq!(
            tokens("• Volume fading near the highs"),
            vec![Token::Bullet("Volume fading near the highs".to_string())]
        );
        // Bold bullet body loses only the emphasis
        assert_eq!(
            tokens("* **watch 64k**"),
            vec![Token::Bullet("watch 64k".to_string())]
        );
    }

    #[test]
    fn test_bullet_containing_header_word_moves_cursor() {
        // "Risk/Reward ratio" inside a bullet is a header hit, not a bullet.
        // Deliberate: the shipped renderer behaved this way.
        assert_eq!(
            tokens("* Risk/Reward ratio 1:3"),
            vec![Token::Header(Section::RiskAssessment)]
        );
    }

    #[test]
    fn test_marker_beats_field_and_header() {
        assert_eq!(tokens("BUY"), vec![Token::Marker(Signal::Uptrend)]);
        assert_eq!(tokens("**SELL**"), vec![Token::Marker(Signal::Downtrend)]);
    }

    #[test]
    fn test_prose_passthrough() {
        assert_eq!(
            tokens("This is for research purposes only."),
            vec![Token::Prose("This is for research purposes only.".to_string())]
        );
        // Lowercase section words are not headers
        assert_eq!(
            tokens("the breakout failed"),
            vec![Token::Prose("the breakout failed".to_string())]
        );
    }
}
