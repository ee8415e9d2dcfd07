use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uci_core::models::assessment::Assessment;
use uci_core::models::cohort::{BedSelection, DateRange};
use uci_core::models::instrument::InstrumentType;

/// The set of assessments a dashboard query covers. Built per query,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AggregationCohort {
    pub instrument_type: InstrumentType,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub beds: Option<BedSelection>,
}

impl AggregationCohort {
    pub fn new(instrument_type: InstrumentType) -> Self {
        AggregationCohort {
            instrument_type,
            date_range: None,
            beds: None,
        }
    }

    pub fn with_dates(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_beds(mut self, beds: BedSelection) -> Self {
        self.beds = Some(beds);
        self
    }

    pub fn matches(&self, assessment: &Assessment) -> bool {
        assessment.instrument_type == self.instrument_type
            && self
                .date_range
                .is_none_or(|r| r.contains(assessment.assessment_date))
            && self
                .beds
                .as_ref()
                .is_none_or(|b| b.matches(assessment.bed_number))
    }
}
