//! Markdown run report and high-score alerts.
//!
//! Pure formatting over a finished `RunResult`: nothing is recomputed and
//! nothing is sent anywhere. The layout follows the chat notification the
//! screen was built for (market header, top picks, "+N more" footer).

use swingscan_core::{MacdSignal, TradingSignal};

use crate::config::AlertConfig;
use crate::result::RunResult;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// `$1.2B` at or above one billion, `$850M` below.
pub fn format_market_cap(market_cap: f64) -> String {
    if market_cap >= 1_000_000_000.0 {
        format!("${:.1}B", market_cap / 1_000_000_000.0)
    } else {
        format!("${:.0}M", market_cap / 1_000_000.0)
    }
}

/// Price with thousands separators and 4 decimals, e.g. `$67,250.1234`.
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.4}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0000"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if price < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

/// Active signal tags, e.g. `EMA✓ | RSI55 | MACD✓ | Vol✓`, or `N/A`.
pub fn signal_tags(signal: &TradingSignal) -> String {
    let s = &signal.signals;
    let mut tags = Vec::with_capacity(4);
    if s.ema_aligned {
        tags.push("EMA✓".to_string());
    }
    if s.rsi_bullish {
        tags.push(format!("RSI{:.0}", s.rsi_value));
    }
    if s.macd_signal == MacdSignal::Buy {
        tags.push("MACD✓".to_string());
    }
    if s.volume_surge {
        tags.push("Vol✓".to_string());
    }
    if tags.is_empty() {
        "N/A".to_string()
    } else {
        tags.join(" | ")
    }
}

fn pct_from(price: f64, level: f64) -> f64 {
    (level - price).abs() / price * 100.0
}

/// One ranked opportunity. `rank` is 1-based.
pub fn format_signal(signal: &TradingSignal, rank: usize) -> String {
    let badge = MEDALS
        .get(rank.wrapping_sub(1))
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("#{rank}"));
    let price = signal.price;
    let l = &signal.levels;

    let mut md = String::with_capacity(512);
    md.push_str(&format!("{badge} *{}* ({})\n", signal.symbol, signal.name));
    md.push_str(&format!(
        "📊 Score: *{:.1}/10*\n",
        signal.final_score()
    ));
    md.push_str(&format!("💰 Price: {}\n", format_price(price)));
    md.push_str(&format!("📈 Cap: {}\n\n", format_market_cap(signal.market_cap)));
    md.push_str(&format!(
        "🎯 Entry: {} - {}\n",
        format_price(l.entry_zone[0]),
        format_price(l.entry_zone[1])
    ));
    md.push_str(&format!(
        "🛑 Stop: {} (-{:.1}%)\n",
        format_price(l.stop_loss),
        pct_from(price, l.stop_loss)
    ));
    md.push_str(&format!(
        "💎 T1: {} (+{:.1}%)\n",
        format_price(l.target_1),
        pct_from(price, l.target_1)
    ));
    md.push_str(&format!(
        "💎 T2: {} (+{:.1}%)\n",
        format_price(l.target_2),
        pct_from(price, l.target_2)
    ));
    if let Some(c) = signal.btc_correlation {
        md.push_str(&format!("🔗 BTC correlation: {c:.2}\n"));
    }
    md.push_str(&format!("\n✅ Signals: {}\n", signal_tags(signal)));
    md
}

/// Full report: market header, the first `alerts.report_top` opportunities,
/// a "+N more" footer, or a notice when nothing qualified.
pub fn render_report(result: &RunResult, alerts: &AlertConfig) -> String {
    let ctx = &result.market_context;
    let mut md = String::with_capacity(2048);

    md.push_str("🪙 *CRYPTO SWING SCAN*\n");
    md.push_str(&format!(
        "📅 {}\n\n",
        result.timestamp.format("%d %b %Y, %H:%M UTC")
    ));
    md.push_str(&format!("{RULE}\n📊 *MARKET CONTEXT*\n{RULE}\n"));
    md.push_str(&format!("🔸 BTC Dominance: {:.1}%\n", ctx.btc_dominance));
    md.push_str(&format!(
        "💰 Total Market Cap: {}\n",
        format_market_cap(ctx.total_market_cap)
    ));
    md.push_str(&format!(
        "✅ {} of {} analyzed assets qualified\n\n",
        result.total_qualified, result.total_analyzed
    ));

    if !result.has_opportunities() {
        md.push_str(
            "⚠️ *No opportunities found* matching the scoring criteria this run.\n\n\
             The market may be ranging or lacking clear signals.\n",
        );
        return md;
    }

    md.push_str(&format!("{RULE}\n🏆 *TOP OPPORTUNITIES*\n{RULE}\n"));
    let shown = alerts.report_top.min(result.top_opportunities.len());
    for (i, signal) in result.top_opportunities[..shown].iter().enumerate() {
        md.push('\n');
        md.push_str(&format_signal(signal, i + 1));
    }

    let remaining = result.top_opportunities.len() - shown;
    if remaining > 0 {
        md.push_str(&format!("\n📋 +{remaining} more opportunities available\n"));
    }
    md
}

/// One alert per top opportunity scoring at or above the threshold.
pub fn high_score_alerts(result: &RunResult, alerts: &AlertConfig) -> Vec<String> {
    result
        .high_score_signals(alerts.high_score_threshold)
        .map(format_alert)
        .collect()
}

fn format_alert(signal: &TradingSignal) -> String {
    let price = signal.price;
    let target_1 = signal.levels.target_1;
    format!(
        "🚨 *HIGH SCORE ALERT*\n\n\
         *{}* ({})\n\
         ⭐ Score: *{:.1}/10*\n\n\
         💰 {}\n\
         🎯 Target 1: {} (+{:.1}%)\n",
        signal.symbol,
        signal.name,
        signal.final_score(),
        format_price(price),
        format_price(target_1),
        pct_from(price, target_1)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_cap_units() {
        assert_eq!(format_market_cap(1_234_000_000.0), "$1.2B");
        assert_eq!(format_market_cap(1_000_000_000.0), "$1.0B");
        assert_eq!(format_market_cap(850_000_000.0), "$850M");
        assert_eq!(format_market_cap(0.0), "$0M");
    }

    #[test]
    fn price_grouping() {
        assert_eq!(format_price(67_250.5), "$67,250.5000");
        assert_eq!(format_price(999.5), "$999.5000");
        assert_eq!(format_price(1_000.0), "$1,000.0000");
        assert_eq!(format_price(0.000123), "$0.0001");
        assert_eq!(format_price(1_234_567.0), "$1,234,567.0000");
    }
}
