use crate::analysis::{AnalysisReport, Signal};
use crate::entitlement::EntitlementState;
use crate::history::HistoryEntry;

fn signal_line(signal: Signal) -> &'static str {
    match signal {
        Signal::Uptrend => "📈 UPTREND",
        Signal::Downtrend => "📉 DOWNTREND",
        Signal::Neutral => "➡️  NEUTRAL",
    }
}

pub fn print_report(report: &AnalysisReport) {
    println!("\n╔═══════════════════════════════════════════════════════════╗");
    println!("║                    Analysis Report                        ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!("{}", signal_line(report.analysis.signal));
    println!(
        "📊 Confidence: {}/100 ({})",
        report.confidence_score,
        report.tier.label()
    );

    if report.analysis.has_levels() {
        println!();
        if let Some(entry) = &report.analysis.entry {
            println!("🎯 Entry: {}", entry);
        }
        if let Some(stop) = &report.analysis.stop_loss {
            println!("🛑 Stop Loss: {}", stop);
        }
        if let Some(take) = &report.analysis.take_profit {
            println!("💰 Take Profit: {}", take);
        }
    }

    for (section, bullets) in report.analysis.sections() {
        if bullets.is_empty() {
            continue;
        }
        println!();
        println!("{}:", section.title());
        for bullet in bullets {
            println!("   • {}", bullet);
        }
    }
    println!();
    println!("═══════════════════════════════════════════════════════════");
}

pub fn print_entitlement(state: &EntitlementState) {
    if state.analyses_limit >= 999_999 {
        println!(
            "👤 Plan: {} ({}), unlimited analyses",
            state.plan.as_str(),
            state.subscription_status.as_str()
        );
    } else {
        println!(
            "👤 Plan: {} ({}), {} of {} analyses used",
            state.plan.as_str(),
            state.subscription_status.as_str(),
            state.analyses_used,
            state.analyses_limit
        );
    }
}

pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("🗂  No past analyses");
        return;
    }
    println!("🗂  Past analyses ({}):", entries.len());
    for entry in entries {
        println!(
            "   • #{} {} {} ({}/100)",
            entry.id,
            entry.created_at.format("%Y-%m-%d %H:%M"),
            signal_line(entry.report.analysis.signal),
            entry.report.confidence_score
        );
    }
}
