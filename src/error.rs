use crate::domain::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Every failure the saga can surface to a caller.
///
/// The first six variants are the business taxonomy: callers match on them to
/// decide how to answer a request. The rest are plumbing errors from the CLI
/// and adapters.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Validation error: item {item} rejected: {reason}")]
    ItemRejected { item: String, reason: String },
    #[error("Insufficient funds on account {account}: balance {balance}, delta {delta}")]
    InsufficientFunds {
        account: AccountId,
        balance: Decimal,
        delta: Decimal,
    },
    #[error("Persistence error: {0}")]
    PersistenceError(String),
    #[error("Audit write error: {0}")]
    AuditWriteError(String),
    #[error("Queue error: {0}")]
    QueueError(String),
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl PipelineError {
    /// True for both generic and per-item validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PipelineError::ValidationError(_) | PipelineError::ItemRejected { .. }
        )
    }

    /// Folds a storage-layer failure into `PersistenceError`, keeping the
    /// message of errors that already are one.
    pub fn into_persistence(self) -> Self {
        match self {
            PipelineError::PersistenceError(_) => self,
            other => PipelineError::PersistenceError(other.to_string()),
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PipelineError {
    fn from(e: rocksdb::Error) -> Self {
        PipelineError::PersistenceError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
