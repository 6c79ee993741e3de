use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use chartflow::analysis::parse;

// Full premium shape: marker, trade levels, all seven sections
const PREMIUM_BLOB: &str = "BUY\nEntry: 64,450\nSL: 63,200\nTP: 67,800\n\
**Key Levels:**\n* Support 63,000\n* Supply 66,000\n\
**Signal Reasons:**\n* Held above the range high\n\
**Risk Assessment:**\n* Invalidation below 63,000\n\
**Breakout & Retest:**\n* Wait for a retest of 64,200\n\
**Indicators:**\n* RSI 58 with room above\n\
**Fibonacci:**\n* 0.618 pullback held\n\
**Psychology & Plan:**\n* Scale in thirds";

// Legacy three-section shape with Reference/Lower/Upper levels
const LEGACY_BLOB: &str = "UPTREND\nReference: 64,200\nLower: 63,100\nUpper: 66,500\n\
**Key Levels:**\n* Strong support at 63,000\n\
**Pattern Analysis:**\n* Ascending triangle on the 4h\n\
**Risk Assessment:**\n* Probability level: Medium";

fn benchmark_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis_parser");

    group.bench_function("parse_premium_format", |b| {
        b.iter(|| black_box(parse(black_box(PREMIUM_BLOB), "bullish", "high")))
    });

    group.bench_function("parse_legacy_format", |b| {
        b.iter(|| black_box(parse(black_box(LEGACY_BLOB), "bullish", "high")))
    });

    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
