//! Plain-text rendering of the wizard screens.

use crate::domain::journal::{JournalEntry, StockFilter};
use crate::domain::sizing::PositionPlan;
use crate::domain::trade::CheckStatus;
use crate::domain::wizard::{SizingOutcome, Step, WizardContext};
use std::io::{self, Write};

/// Status lines shown while the analysis "runs".
pub const ANALYZING_STAGES: [&str; 3] = [
    "Checking Position Sizing...",
    "Calculating Scale-Out Targets...",
    "Finalizing Trailing Stop Loss SL1...",
];

/// Formats an amount as rupees with thousands separators and two decimals.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}₹{grouped}.{frac_part}")
}

fn title(out: &mut dyn Write, text: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{text}")?;
    writeln!(out, "{}", "=".repeat(text.chars().count()))
}

pub fn render_step(out: &mut dyn Write, step: Step, ctx: &WizardContext) -> io::Result<()> {
    match step {
        Step::Welcome => {
            title(out, "StockPro Analysis")?;
            writeln!(out, "High-Precision Trading Journal & Position Sizer")?;
            writeln!(
                out,
                "Welcome! This system will guide you through your trade setup step-by-step."
            )?;
            writeln!(out, "[start] Start New Analysis   [quit]")
        }
        Step::Capital => {
            title(out, "Capital Management")?;
            writeln!(out, "Step 1: Define your total trading capital.")
        }
        Step::TradeSetup => {
            title(out, "Trade Setup")?;
            writeln!(out, "Step 2: Enter stock details and technical checkpoints.")?;
            writeln!(out, "Type :back or :quit at any prompt.")
        }
        Step::Analyzing => title(out, "Analyzing Stock Strategy..."),
        Step::Results => render_results(out, ctx),
        Step::Journal => render_journal(out, ctx),
    }
}

pub fn render_metrics(out: &mut dyn Write, plan: &PositionPlan) -> io::Result<()> {
    writeln!(out, "  Quantity:         {}", plan.shares)?;
    writeln!(out, "  Investment:       {}", format_currency(plan.investment))?;
    writeln!(out, "  Sell 50% Target:  {}", format_currency(plan.target))?;
    writeln!(out, "  Trailing SL1:     {}", format_currency(plan.trailing_stop))
}

pub fn render_alignment(out: &mut dyn Write, status: CheckStatus) -> io::Result<()> {
    match status {
        CheckStatus::Passed => writeln!(out, "Market Conditions: BUY ALIGNMENT PASSED"),
        CheckStatus::Failed => writeln!(out, "Market Conditions: ONE OR MORE SMA CHECKS FAILED"),
    }
}

fn render_results(out: &mut dyn Write, ctx: &WizardContext) -> io::Result<()> {
    title(out, "Analysis Results")?;
    match &ctx.outcome {
        Some(SizingOutcome::Plan(plan)) => {
            render_metrics(out, plan)?;
            if let Some(trade) = &ctx.trade {
                render_alignment(out, trade.checks.status())?;
            }
            writeln!(out, "[save] Save Entry & View Journal")
        }
        Some(SizingOutcome::Rejected { .. }) => {
            writeln!(out, "Invalid Entry: Stop loss must be lower than Entry Price.")?;
            writeln!(out, "[fix] Fix Input")
        }
        Some(SizingOutcome::OutOfRange) => {
            writeln!(out, "Invalid Entry: position size is too large to calculate.")?;
            writeln!(out, "[fix] Fix Input")
        }
        None => writeln!(out, "No analysis available."),
    }
}

pub fn render_table(out: &mut dyn Write, rows: &[&JournalEntry]) -> io::Result<()> {
    writeln!(
        out,
        "{:<10}  {:<12}  {:>10}  {:>10}  {:>10}  {:>7}  {:>14}  {:<6}",
        "Date", "Stock", "Entry", "SL", "Target", "Shares", "Investment", "Checks"
    )?;
    for e in rows {
        writeln!(
            out,
            "{:<10}  {:<12}  {:>10.2}  {:>10.2}  {:>10.2}  {:>7}  {:>14.2}  {:<6}",
            e.date.format("%Y-%m-%d").to_string(),
            e.stock,
            e.entry,
            e.stop_loss,
            e.target,
            e.shares,
            e.investment,
            e.checks.as_str()
        )?;
    }
    Ok(())
}

fn render_journal(out: &mut dyn Write, ctx: &WizardContext) -> io::Result<()> {
    title(out, "Trade Vault")?;
    let choices = ctx.journal.tickers().join(", ");
    let current = match &ctx.filter {
        StockFilter::All => "Show All".to_string(),
        StockFilter::Stock(t) => t.clone(),
    };
    writeln!(out, "Search Records by Stock: {current}  (Show All, {choices})")?;
    render_table(out, &ctx.visible_entries())?;
    writeln!(
        out,
        "[filter <ticker|show all>] [export [path]] [restart] Start Another Trade   [quit]"
    )
}
