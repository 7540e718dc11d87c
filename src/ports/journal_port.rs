//! Journal storage port trait.

use crate::domain::error::StockproError;
use crate::domain::journal::Journal;
use std::path::Path;

/// Port for writing a journal to, and reading it back from, a flat file.
pub trait JournalPort {
    fn export(&self, journal: &Journal, path: &Path) -> Result<(), StockproError>;

    fn import(&self, path: &Path) -> Result<Journal, StockproError>;
}
