use super::signal;
use super::tokenizer::{self, FieldKind, Token};
use super::types::{ParsedAnalysis, Section};

/// Fold the raw producer text into a typed record.
///
/// Total: any input yields a record. With no recognizable structure the
/// result carries the mapped fallback trend and nothing else. The
/// out-of-band `trend` and `confidence` come from the response envelope;
/// markers inside the text override the trend, last one wins.
pub fn parse(text: &str, trend: &str, confidence: &str) -> ParsedAnalysis {
    let mut out = ParsedAnalysis {
        signal: signal::signal_from_label(trend),
        confidence: confidence.to_string(),
        ..Default::default()
    };

    // Bullets bind to the most recently seen header. Until the first
    // header shows up they have no home and are dropped.
    let mut current: Option<Section> = None;

    for token in tokenizer::tokenize(text) {
        match token {
            Token::Marker(sig) => out.signal = sig,
            Token::Field(kind, value) => {
                // Duplicate labels: the last occurrence wins, an empty one
                // clears the slot.
                let slot = match kind {
                    FieldKind::Entry => &mut out.entry,
                    FieldKind::StopLoss => &mut out.stop_loss,
                    FieldKind::TakeProfit => &mut out.take_profit,
                };
                *slot = if value.is_empty() { None } else { Some(value) };
            }
            Token::Header(section) => current = Some(section),
            Token::Bullet(body) => {
                if body.is_empty() {
                    continue;
                }
                if let Some(section) = current {
                    out.section_mut(section).push(body);
                }
            }
            Token::Prose(_) => {}
        }
    }

    out
}
