use serde::{Deserialize, Serialize};
use uci_core::models::assessment::Assessment;
use uci_core::models::cohort::{BedSelection, DateRange};
use uci_core::models::instrument::InstrumentType;
use uci_core::models::procedure::ProcedureRecord;
use uuid::Uuid;

/// Query over committed assessments. Every `None` field matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentFilter {
    #[serde(default)]
    pub instrument_type: Option<InstrumentType>,
    #[serde(default)]
    pub subject_id: Option<Uuid>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub beds: Option<BedSelection>,
}

impl AssessmentFilter {
    pub fn matches(&self, assessment: &Assessment) -> bool {
        self.instrument_type
            .is_none_or(|t| t == assessment.instrument_type)
            && self.subject_id.is_none_or(|id| id == assessment.subject_id)
            && self
                .date_range
                .is_none_or(|r| r.contains(assessment.assessment_date))
            && self
                .beds
                .as_ref()
                .is_none_or(|b| b.matches(assessment.bed_number))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureFilter {
    #[serde(default)]
    pub patient_id: Option<Uuid>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub beds: Option<BedSelection>,
}

impl ProcedureFilter {
    pub fn matches(&self, record: &ProcedureRecord) -> bool {
        self.patient_id.is_none_or(|id| record.patient_id == Some(id))
            && self.date_range.is_none_or(|r| r.contains(record.date))
            && self
                .beds
                .as_ref()
                .is_none_or(|b| b.matches(record.bed_number))
    }
}
