use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::instrument::InstrumentType;
use super::score::{Classification, ScoreResult};
use super::selection::Selections;

/// A committed assessment.
///
/// `computed_total` and `classification` are caches: both are always
/// re-derivable from `selections` through the instrument catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assessment {
    pub id: Uuid,
    /// The patient for clinical instruments, the respondent for MBI.
    pub subject_id: Uuid,
    pub instrument_type: InstrumentType,
    pub assessment_date: jiff::civil::Date,
    /// Bed occupied by the patient when the assessment was recorded.
    pub bed_number: Option<u32>,
    pub selections: Selections,
    pub computed_total: ScoreResult,
    pub classification: Classification,
    pub author_id: String,
    pub created_at: jiff::Timestamp,
}

impl Assessment {
    pub fn key(&self) -> AssessmentKey {
        AssessmentKey {
            subject_id: self.subject_id,
            instrument_type: self.instrument_type,
            date: self.assessment_date,
        }
    }
}

/// The uniqueness key: at most one committed assessment per subject,
/// instrument and calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentKey {
    pub subject_id: Uuid,
    pub instrument_type: InstrumentType,
    pub date: jiff::civil::Date,
}
