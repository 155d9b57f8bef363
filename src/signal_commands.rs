use crate::app_config::AppConfig;
use crate::calendar;
use crate::error::SignalError;
use crate::models::{BidSignal, BidSweepEntry, CoverageGap, CoverageSignal, Direction, PriceGapSignal, SignalReport, SixthSenseRow};
use crate::report::MarketData;
use crate::utility::timing::timed_async;

use anyhow::Result;
use chrono::NaiveDateTime;
use colored::{ColoredString, Colorize};

const RULE_WIDTH: usize = 50;
const SECTION_WIDTH: usize = 56;
const BANNER_WIDTH: usize = 54;

/// Signal command handler - prints the signals to the terminal
pub struct SignalCommands;

impl SignalCommands {
    /// Print all four signals for the auto-selected instrument
    pub async fn run_signals(app_config: &AppConfig) -> Result<()> {
        let now = calendar::now_ist();
        println!("{}", render_banner(now));

        let token = app_config.access_token()?;
        let market = MarketData::new()?;

        let report = timed_async("signal report", || market.build_report(token.as_deref(), now)).await;
        match report {
            Ok(report) => println!("{}", render_report(&report)),
            Err(SignalError::MissingAccessToken) => {
                println!("{}", "ERROR: No access token found!".red());
                println!("{}", "Set UPSTOX_ACCESS_TOKEN or create config.json".yellow());
            }
            Err(SignalError::NoValidExpiry) => {
                println!("{}", "No valid expiry found for trading today".yellow());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    /// Print the BID signal for NIFTY 50, BANK NIFTY and SENSEX
    pub async fn run_bid_sweep(app_config: &AppConfig) -> Result<()> {
        let now = calendar::now_ist();
        println!();
        println!("  {}", "BID Signal".cyan().bold());
        println!();

        let token = app_config.access_token()?;
        let market = MarketData::new()?;

        match market.build_bid_sweep(token.as_deref(), now).await {
            Ok(entries) => println!("{}", render_bid_sweep(&entries)),
            Err(SignalError::MissingAccessToken) => {
                println!("{}", "ERROR: No access token found!".red());
                println!("{}", "Set UPSTOX_ACCESS_TOKEN or create config.json".yellow());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }
}

// -----------------------------------------------
// NUMBER FORMATTING
// -----------------------------------------------

/// Two decimals with thousands separators: 23456.7 -> "23,456.70".
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}

/// Like `format_number` but always signed: "+1,234.50", "-0.25".
pub fn format_signed(value: f64) -> String {
    if value < 0.0 {
        format_number(value)
    } else {
        format!("+{}", format_number(value))
    }
}

fn paint(text: impl Into<String>, direction: Direction) -> ColoredString {
    let text: String = text.into();
    match direction {
        Direction::Up => text.green(),
        Direction::Down => text.red(),
        Direction::Flat => text.yellow(),
    }
}

fn label(text: &str, width: usize) -> ColoredString {
    format!("{:<width$}", text, width = width).yellow()
}

fn rule(width: usize) -> ColoredString {
    format!("  {}", "─".repeat(width)).dimmed()
}

// -----------------------------------------------
// RENDERING
// -----------------------------------------------

pub fn render_banner(now: NaiveDateTime) -> String {
    let lines = [
        String::new(),
        format!("  ╔{}╗", "═".repeat(BANNER_WIDTH)).cyan().bold().to_string(),
        format!("  ║{:^width$}║", "TRADING SIGNALS", width = BANNER_WIDTH).cyan().bold().to_string(),
        format!("  ╚{}╝", "═".repeat(BANNER_WIDTH)).cyan().bold().to_string(),
        format!("  {}", now.format("%A, %d %b %Y %I:%M %p")).dimmed().to_string(),
        String::new(),
    ];
    lines.join("\n")
}

fn section_header(out: &mut Vec<String>, number: u8, title: &str, subtitle: &str) {
    out.push(format!("  {}", "═".repeat(SECTION_WIDTH)).dimmed().to_string());
    out.push(format!(
        "{} {}",
        format!("  [{}] {}", number, title).white().bold(),
        subtitle.dimmed()
    ));
    out.push(format!("  {}", "─".repeat(SECTION_WIDTH)).dimmed().to_string());
}

fn gap_lines(out: &mut Vec<String>, gap: f64, gap_pct: f64, direction: Direction, signal: String) {
    out.push(format!(
        "  {} {}",
        label("Gap:", 14),
        paint(format!("{} ({}%)", format_signed(gap), format_signed(gap_pct)), direction)
    ));
    out.push(format!("  {} {}", label("Signal:", 14), paint(signal, direction)));
}

fn render_bid(out: &mut Vec<String>, bid: &BidSignal) {
    section_header(out, 1, "BID SIGNAL", "(Overnight Gap)");
    out.push(format!("  {} 3:30 PM → {} 9:15 AM", bid.prev_date, bid.today_date).dimmed().to_string());
    out.push(rule(RULE_WIDTH).to_string());

    match (bid.ltp_330, bid.open_915, bid.gap, bid.gap_pct, bid.direction) {
        (Some(ltp), Some(open), Some(gap), Some(pct), Some(direction)) => {
            out.push(format!("  {} {}", label("3:30 LTP:", 14), format_number(ltp)));
            out.push(format!("  {} {}", label("9:15 Open:", 14), format_number(open)));
            let signal = match direction {
                Direction::Flat => format!("{} Flat", direction.arrow()),
                d => format!("{} Gap {}", d.arrow(), d.label()),
            };
            gap_lines(out, gap, pct, direction, signal);
        }
        _ if !bid.market_open => out.push("  Market not open yet".dimmed().to_string()),
        _ => out.push("  Data not available".dimmed().to_string()),
    }
    out.push(String::new());
}

fn render_price_gap(out: &mut Vec<String>, pricegap: &PriceGapSignal) {
    section_header(out, 2, "PRICEGAP SIGNAL", "(3:30 LTP vs Close)");
    out.push(format!("  {}", pricegap.date).dimmed().to_string());
    out.push(rule(RULE_WIDTH).to_string());

    match (pricegap.ltp_330, pricegap.daily_close, pricegap.gap, pricegap.gap_pct, pricegap.direction) {
        (Some(ltp), Some(close), Some(gap), Some(pct), Some(direction)) => {
            out.push(format!("  {} {}", label("3:30 LTP:", 14), format_number(ltp)));
            out.push(format!("  {} {}", label("Daily Close:", 14), format_number(close)));
            let relation = match direction {
                Direction::Up => ">",
                Direction::Down => "<",
                Direction::Flat => "=",
            };
            gap_lines(out, gap, pct, direction, format!("{} LTP {} Close", direction.arrow(), relation));
        }
        _ => out.push("  Data not available".dimmed().to_string()),
    }
    out.push(String::new());
}

fn render_sixth_sense(out: &mut Vec<String>, rows: &[SixthSenseRow]) {
    section_header(out, 3, "SIXTHSENSE SIGNAL", "(Last 5 Days)");

    if rows.is_empty() {
        out.push("  Data not available".dimmed().to_string());
        out.push(String::new());
        return;
    }

    out.push(format!("  {:<12}{:>12}{:>12}{:>12}", "Date", "Open", "Close", "Change").dimmed().to_string());
    out.push(rule(48).to_string());

    for row in rows {
        let change = if row.change > 0.0 {
            format!("+{:.2}%", row.change)
        } else {
            format!("{:.2}%", row.change)
        };
        let mut change = paint(format!("{:>12}", change), Direction::of(row.change));
        // Moves beyond half a percent stand out
        if row.change.abs() > 0.5 {
            change = change.bold();
        }

        out.push(format!(
            "  {:<12}{:>12}{:>12}{}",
            row.date.to_string(),
            format_number(row.open),
            format_number(row.close),
            change
        ));
    }
    out.push(String::new());
}

fn render_coverage(out: &mut Vec<String>, coverage: &CoverageSignal) {
    section_header(out, 4, "COVERAGE PREMIUM", &format!("(for {})", coverage.date));
    out.push(
        format!("  {:<10}{:>6}{:>14}{:>8}{:>12}", "Index", "DTE", "Spot", "Pct", "Premium")
            .dimmed()
            .to_string(),
    );
    out.push(rule(48).to_string());

    for row in &coverage.rows {
        let name = format!("{:<10}", row.instrument.name());
        match &row.outcome {
            Ok(entry) => out.push(format!(
                "  {}{:>6}{:>14}{:>7.2}%{}",
                name.cyan(),
                entry.dte,
                format_number(entry.spot),
                entry.pct,
                format!("{:>12}", format_number(entry.premium)).green()
            )),
            Err(CoverageGap::NoValidExpiry) => out.push(format!("  {}{}", name, "No valid expiry".dimmed())),
            Err(CoverageGap::SpotUnavailable { dte }) => {
                out.push(format!("  {}{:>6}{}", name, dte, "  Spot unavailable".dimmed()))
            }
        }
    }
    out.push(String::new());
}

/// The full four-section printout.
pub fn render_report(report: &SignalReport) -> String {
    let mut out = vec![
        format!("  {}{}", "Instrument:  ".dimmed(), report.instrument.name().bold()),
        format!("  {}{} ({} DTE)", "Expiry:      ".dimmed(), report.expiry_date, report.dte),
        String::new(),
    ];

    render_bid(&mut out, &report.bid);
    render_price_gap(&mut out, &report.pricegap);
    render_sixth_sense(&mut out, &report.sixthsense);
    render_coverage(&mut out, &report.coverage);

    out.join("\n")
}

/// BID rows for the sweep, one block per index.
pub fn render_bid_sweep(entries: &[BidSweepEntry]) -> String {
    let mut out = Vec::new();

    if let Some(first) = entries.first() {
        out.push(
            format!("  {} 3:30 PM  →  {} 9:15 AM", first.bid.prev_date, first.bid.today_date)
                .dimmed()
                .to_string(),
        );
        out.push(String::new());
    }

    for entry in entries {
        let bid = &entry.bid;
        out.push(format!("  {}", entry.name).cyan().bold().to_string());
        out.push(rule(RULE_WIDTH).to_string());

        let or_na = |v: Option<f64>| v.map(format_number).unwrap_or_else(|| "N/A".to_string());
        out.push(format!("  {} {}", label("3:30 LTP:", 12), or_na(bid.ltp_330)));
        out.push(format!("  {} {}", label("9:15 Open:", 12), or_na(bid.open_915)));

        match (bid.gap, bid.gap_pct, bid.direction) {
            (Some(gap), Some(pct), Some(direction)) => {
                out.push(format!(
                    "  {} {}",
                    label("Gap:", 12),
                    paint(format!("{} ({}%)", format_signed(gap), format_signed(pct)), direction)
                ));
                let text = match direction {
                    Direction::Flat => "Flat".to_string(),
                    d => format!("Gap {}", d.label()),
                };
                out.push(format!("  {} {}", label("Direction:", 12), paint(format!("{} {}", direction.arrow(), text), direction)));
            }
            _ => {
                out.push(format!("  {} N/A", label("Gap:", 12)));
                out.push(format!("  {} {}", label("Direction:", 12), "─ No Data".dimmed()));
            }
        }

        out.push(rule(RULE_WIDTH).to_string());
        out.push(String::new());
    }

    out.join("\n")
}
