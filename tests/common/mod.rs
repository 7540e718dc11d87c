#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;
use stockpro::domain::error::StockproError;
use stockpro::domain::journal::{Journal, JournalEntry};
use stockpro::domain::settings::Settings;
use stockpro::domain::trade::CheckStatus;
use stockpro::ports::journal_port::JournalPort;

/// Records exports instead of touching the filesystem.
pub struct MockJournalPort {
    pub exports: RefCell<Vec<(PathBuf, Journal)>>,
    pub stored: Option<Journal>,
}

impl MockJournalPort {
    pub fn new() -> Self {
        Self {
            exports: RefCell::new(Vec::new()),
            stored: None,
        }
    }

    pub fn with_stored(mut self, journal: Journal) -> Self {
        self.stored = Some(journal);
        self
    }

    pub fn export_count(&self) -> usize {
        self.exports.borrow().len()
    }
}

impl JournalPort for MockJournalPort {
    fn export(&self, journal: &Journal, path: &Path) -> Result<(), StockproError> {
        self.exports
            .borrow_mut()
            .push((path.to_path_buf(), journal.clone()));
        Ok(())
    }

    fn import(&self, _path: &Path) -> Result<Journal, StockproError> {
        self.stored.clone().ok_or_else(|| StockproError::Journal {
            reason: "nothing stored".into(),
        })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Default settings with the progress animation disabled.
pub fn quiet_settings(output: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.wizard.analyzing = Duration::ZERO;
    settings.journal_output = output.to_path_buf();
    settings
}

pub fn make_entry(stock: &str, day: u32, shares: i64) -> JournalEntry {
    JournalEntry {
        date: date(2024, 1, day),
        stock: stock.to_string(),
        entry: 100.0,
        stop_loss: 95.0,
        target: 110.0,
        shares,
        investment: shares as f64 * 100.0,
        checks: CheckStatus::Passed,
    }
}

/// Input lines for one full pass through capital and trade setup.
pub fn trade_lines(capital: &str, stock: &str, entry: &str, stop: &str, checks: [&str; 4]) -> Vec<String> {
    let mut lines = vec![
        capital.to_string(),
        stock.to_string(),
        entry.to_string(),
        stop.to_string(),
        "2024-03-01".to_string(),
    ];
    lines.extend(checks.iter().map(|c| c.to_string()));
    lines
}

pub fn script(lines: &[String]) -> std::io::Cursor<Vec<u8>> {
    let mut text = lines.join("\n");
    text.push('\n');
    std::io::Cursor::new(text.into_bytes())
}
