//! CSV journal adapter.

use crate::domain::error::StockproError;
use crate::domain::journal::{JOURNAL_COLUMNS, Journal, JournalEntry};
use crate::domain::trade::CheckStatus;
use crate::ports::journal_port::JournalPort;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct JournalRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Stock")]
    stock: String,
    #[serde(rename = "Entry")]
    entry: f64,
    #[serde(rename = "SL")]
    stop_loss: f64,
    #[serde(rename = "Target")]
    target: f64,
    #[serde(rename = "Shares")]
    shares: i64,
    #[serde(rename = "Investment")]
    investment: f64,
    #[serde(rename = "Checks")]
    checks: String,
}

impl From<&JournalEntry> for JournalRow {
    fn from(e: &JournalEntry) -> Self {
        Self {
            date: e.date.format("%Y-%m-%d").to_string(),
            stock: e.stock.clone(),
            entry: e.entry,
            stop_loss: e.stop_loss,
            target: e.target,
            shares: e.shares,
            investment: e.investment,
            checks: e.checks.as_str().to_string(),
        }
    }
}

impl JournalRow {
    fn into_entry(self, line: u64) -> Result<JournalEntry, StockproError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|e| {
            StockproError::JournalRow {
                line,
                reason: format!("invalid date '{}': {}", self.date, e),
            }
        })?;
        let checks = CheckStatus::parse(&self.checks).ok_or_else(|| StockproError::JournalRow {
            line,
            reason: format!("invalid checks value '{}'", self.checks),
        })?;
        Ok(JournalEntry {
            date,
            stock: self.stock,
            entry: self.entry,
            stop_loss: self.stop_loss,
            target: self.target,
            shares: self.shares,
            investment: self.investment,
            checks,
        })
    }
}

/// Writes the journal with its header row. An empty journal still gets a header.
pub fn write_journal<W: Write>(journal: &Journal, writer: W) -> Result<(), StockproError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(JOURNAL_COLUMNS)?;
    for entry in journal.entries() {
        wtr.serialize(JournalRow::from(entry))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_journal<R: Read>(reader: R) -> Result<Journal, StockproError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    if headers.iter().ne(JOURNAL_COLUMNS.iter().copied()) {
        return Err(StockproError::Journal {
            reason: format!(
                "unexpected header '{}', expected '{}'",
                headers.iter().collect::<Vec<_>>().join(","),
                JOURNAL_COLUMNS.join(",")
            ),
        });
    }

    let mut journal = Journal::new();
    let mut record = csv::StringRecord::new();
    while rdr.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: JournalRow = record.deserialize(Some(&headers)).map_err(|e| {
            StockproError::JournalRow {
                line,
                reason: e.to_string(),
            }
        })?;
        journal.append(row.into_entry(line)?);
    }
    Ok(journal)
}

pub struct CsvJournalAdapter;

impl JournalPort for CsvJournalAdapter {
    fn export(&self, journal: &Journal, path: &Path) -> Result<(), StockproError> {
        let file = File::create(path)?;
        write_journal(journal, file)?;
        tracing::info!(path = %path.display(), rows = journal.len(), "journal exported");
        Ok(())
    }

    fn import(&self, path: &Path) -> Result<Journal, StockproError> {
        let file = File::open(path)?;
        let journal = read_journal(file)?;
        tracing::debug!(path = %path.display(), rows = journal.len(), "journal imported");
        Ok(journal)
    }
}
