use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

/// Error type covering every failure a billing run can surface.
///
/// None of these are recoverable inside the core: a run either completes for
/// every cycle or produces nothing.
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("not a currency amount: {0:?}")]
    MalformedCurrency(String),
    #[error("not a M/D/YYYY date: {0:?}")]
    MalformedDate(String),
    #[error("not a TRUE/FALSE value: {0:?}")]
    MalformedBool(String),
    #[error("invalid period start {date}: {reason}")]
    InvalidPeriodStart { date: String, reason: String },
    #[error("invalid expense cycle: {0}")]
    InvalidExpense(String),
    #[error("invalid billing method: {0:?}")]
    InvalidMethod(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("account already registered: {0}")]
    DuplicateAccount(String),
    #[error("payment account not found: {0}")]
    UnknownAccount(String),
    #[error("more than one cycle starts on {0}")]
    DuplicateCycle(String),
    #[error("too many connections found for cycle {period}: {weighted} > {effective}")]
    OverAllocation {
        period: String,
        weighted: usize,
        effective: usize,
    },
    #[error("annual taxes and insurance entered on cycle {0}, expected only on the preceding cycle")]
    AnnualSplitConflict(String),
    #[error("business file should have one row: {0}")]
    MissingBusiness(usize),
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{file}: row {row}: {source}")]
    InRow {
        file: String,
        row: usize,
        #[source]
        source: Box<BillingError>,
    },
}

pub type Result<T> = StdResult<T, BillingError>;

impl BillingError {
    /// Attaches the input file and 1-based data row to an error raised while loading.
    pub fn in_row(self, file: impl Into<String>, row: usize) -> Self {
        BillingError::InRow {
            file: file.into(),
            row,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through row context.
    pub fn root(&self) -> &BillingError {
        match self {
            BillingError::InRow { source, .. } => source.root(),
            other => other,
        }
    }
}
