//! Domain error types.

/// Top-level error type for stockpro.
#[derive(Debug, thiserror::Error)]
pub enum StockproError {
    #[error("Invalid Entry: Stop loss must be lower than Entry Price (entry {entry}, stop loss {stop_loss})")]
    InvalidStopLoss { entry: f64, stop_loss: f64 },

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("cannot {event} from the {step} step")]
    InvalidTransition { step: String, event: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("journal error at line {line}: {reason}")]
    JournalRow { line: u64, reason: String },

    #[error("journal error: {reason}")]
    Journal { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StockproError {
    pub fn invalid_input(field: &str, reason: &str) -> Self {
        StockproError::InvalidInput {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<csv::Error> for StockproError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => StockproError::JournalRow {
                line: pos.line(),
                reason: err.to_string(),
            },
            None => StockproError::Journal {
                reason: err.to_string(),
            },
        }
    }
}

impl From<&StockproError> for std::process::ExitCode {
    fn from(err: &StockproError) -> Self {
        let code: u8 = match err {
            StockproError::Io(_) => 1,
            StockproError::ConfigParse { .. }
            | StockproError::ConfigMissing { .. }
            | StockproError::ConfigInvalid { .. } => 2,
            StockproError::JournalRow { .. } | StockproError::Journal { .. } => 3,
            StockproError::InvalidStopLoss { .. } | StockproError::InvalidInput { .. } => 4,
            StockproError::InvalidTransition { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
