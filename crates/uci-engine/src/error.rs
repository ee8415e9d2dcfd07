use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uci_instruments::error::{CatalogError, InstrumentError, ValidationError};
use uci_metrics::error::MetricsError;
use uci_storage::error::StorageError;
use uuid::Uuid;

/// The limit an out-of-range date crossed, with the limit's own date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
#[ts(export)]
pub enum DateBound {
    /// Records cannot be dated after the caller's today.
    Today(Date),
    /// Nor before the patient's admission.
    Admission(Date),
    /// Nor after the last day the discharge grace allows.
    Discharge(Date),
}

impl DateBound {
    pub fn date(&self) -> Date {
        match *self {
            DateBound::Today(d) | DateBound::Admission(d) | DateBound::Discharge(d) => d,
        }
    }
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateBound::Today(d) => write!(f, "not after today ({d})"),
            DateBound::Admission(d) => write!(f, "not before admission ({d})"),
            DateBound::Discharge(d) => write!(f, "not after {d} (discharge)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("already assessed on {existing_date} (assessment {existing_id})")]
    DuplicateAssessment {
        existing_date: Date,
        existing_id: Uuid,
    },

    #[error("date {date} is out of range: must be {bound}")]
    DateOutOfRange { date: Date, bound: DateBound },
}

/// Why a write (assessment or procedure log) was refused.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("patient {0} not found")]
    UnknownPatient(Uuid),

    #[error(transparent)]
    Instrument(InstrumentError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<InstrumentError> for SubmitError {
    fn from(err: InstrumentError) -> Self {
        match err {
            InstrumentError::Validation(v) => SubmitError::Validation(v),
            other => SubmitError::Instrument(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("catalog integrity error: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("unknown sector: {0}")]
    UnknownSector(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
