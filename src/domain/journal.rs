//! Append-only trade journal.

use crate::domain::sizing::PositionPlan;
use crate::domain::trade::{CheckStatus, TradeInput};
use chrono::NaiveDate;

/// Column order of the exported journal.
pub const JOURNAL_COLUMNS: [&str; 8] = [
    "Date",
    "Stock",
    "Entry",
    "SL",
    "Target",
    "Shares",
    "Investment",
    "Checks",
];

/// One saved trade. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub stock: String,
    pub entry: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub shares: i64,
    pub investment: f64,
    pub checks: CheckStatus,
}

impl JournalEntry {
    pub fn from_plan(trade: &TradeInput, plan: &PositionPlan) -> Self {
        Self {
            date: trade.trade_date,
            stock: trade.stock.clone(),
            entry: trade.entry_price,
            stop_loss: trade.stop_loss,
            target: plan.target,
            shares: plan.shares,
            investment: plan.investment,
            checks: trade.checks.status(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StockFilter {
    #[default]
    All,
    Stock(String),
}

impl StockFilter {
    /// "Show All" (or empty) selects everything; anything else is a ticker,
    /// so a stock listed as `ALL` can still be filtered.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("show all") {
            StockFilter::All
        } else {
            StockFilter::Stock(s.to_uppercase())
        }
    }

    pub fn apply<'a>(&self, journal: &'a Journal) -> Vec<&'a JournalEntry> {
        match self {
            StockFilter::All => journal.entries().iter().collect(),
            StockFilter::Stock(ticker) => journal.filter_by_stock(ticker),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn filter_by_stock(&self, ticker: &str) -> Vec<&JournalEntry> {
        self.entries.iter().filter(|e| e.stock == ticker).collect()
    }

    /// Distinct tickers, sorted.
    pub fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.entries.iter().map(|e| e.stock.clone()).collect();
        tickers.sort();
        tickers.dedup();
        tickers
    }
}

impl FromIterator<JournalEntry> for Journal {
    fn from_iter<I: IntoIterator<Item = JournalEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
