use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uci_core::Points;
use uci_core::models::instrument::InstrumentType;

/// Defects in the fixed catalog data. These are configuration bugs and
/// are reported when the catalog is built, never at request time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("instrument {0} registered twice")]
    DuplicateInstrument(InstrumentType),

    #[error("{instrument}: duplicate item code '{code}'")]
    DuplicateItem {
        instrument: InstrumentType,
        code: String,
    },

    #[error("{instrument}: exclusivity group '{group}' has a single member")]
    OrphanedExclusivityGroup {
        instrument: InstrumentType,
        group: String,
    },

    #[error("{instrument}: item '{code}' is not assigned to a defined subscale")]
    UnassignedItem {
        instrument: InstrumentType,
        code: String,
    },

    #[error("{instrument}: subscale '{subscale}' has no items")]
    EmptySubscale {
        instrument: InstrumentType,
        subscale: String,
    },

    #[error("{instrument}: item '{code}' has inverse polarity on a checklist")]
    InvalidPolarity {
        instrument: InstrumentType,
        code: String,
    },

    #[error("{instrument}: completeness policy does not match the scoring model")]
    InconsistentPolicy { instrument: InstrumentType },

    #[error("{instrument}: policy expects {expected} answers but {found} questions are defined")]
    AnswerCountMismatch {
        instrument: InstrumentType,
        expected: usize,
        found: usize,
    },

    #[error("{instrument}/{scale}: no classification bands")]
    EmptyBands {
        instrument: InstrumentType,
        scale: String,
    },

    #[error("{instrument}/{scale}: band '{label}' does not continue the previous band")]
    BandsNotContiguous {
        instrument: InstrumentType,
        scale: String,
        label: String,
    },

    #[error("{instrument}/{scale}: band '{label}' severity rank is not increasing")]
    BandRanksNotIncreasing {
        instrument: InstrumentType,
        scale: String,
        label: String,
    },

    #[error("{instrument}/{scale}: bands stop at {covered} but scores reach {max}")]
    BandsDoNotCoverScale {
        instrument: InstrumentType,
        scale: String,
        covered: Points,
        max: Points,
    },

    #[error("{instrument}/{scale}: no band contains score {score}")]
    NoBandForScore {
        instrument: InstrumentType,
        scale: String,
        score: Points,
    },
}

/// What kind of value an item expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ValueKind {
    Flag,
    Answer,
}

/// A single problem with a caller's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Violation {
    #[error("unknown item code '{code}'")]
    UnknownItem { code: String },

    #[error("items {codes:?} are mutually exclusive (group '{group}')")]
    ExclusivityConflict { group: String, codes: Vec<String> },

    #[error("no item selected")]
    EmptySelection,

    #[error("missing answers for {missing:?}")]
    IncompleteAnswers { missing: Vec<String> },

    #[error("answer {value} to '{code}' is outside [{min}, {max}]")]
    OutOfRangeAnswer {
        code: String,
        value: i64,
        min: u32,
        max: u32,
    },

    #[error("item '{code}' expects a {expected:?} value")]
    InvalidValue { code: String, expected: ValueKind },

    #[error("procedure '{code}' requires a patient")]
    MissingPatientContext { code: String },

    #[error("procedure '{code}' is a unit activity and cannot reference a patient")]
    UnexpectedPatientContext { code: String },

    #[error("procedure '{code}' has a zero count")]
    ZeroCount { code: String },
}

/// Every violation found in one selection, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationError {
    /// `None` for procedure logs, which are not a scored instrument.
    pub instrument_type: Option<InstrumentType>,
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instrument_type {
            Some(t) => write!(f, "{t}: ")?,
            None => f.write_str("procedures: ")?,
        }
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(InstrumentType),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("catalog integrity error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("selection was validated for {found}, not {expected}")]
    InstrumentMismatch {
        expected: InstrumentType,
        found: InstrumentType,
    },

    #[error("score shape does not match the {0} scoring model")]
    ScoreShapeMismatch(InstrumentType),
}
