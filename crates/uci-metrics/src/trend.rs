use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uci_core::Points;
use uci_core::models::assessment::Assessment;
use uci_core::models::instrument::InstrumentType;
use uci_core::models::score::TOTAL_SCALE;

use crate::aggregate::mean;
use crate::cohort::AggregationCohort;
use crate::error::MetricsError;

/// NAS points that make up one nurse's full shift.
const NAS_PER_NURSE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyMean {
    pub date: Date,
    pub sample_size: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyDemand {
    pub date: Date,
    /// Patients scored that day; at most one NAS per patient and date.
    pub patients: usize,
    pub total: Points,
    pub nurses_required: f64,
}

/// Per-date mean of the primary scale (`total`, or the first subscale for
/// questionnaires), oldest date first. Dates without records are omitted.
pub fn daily_trend(
    records: &[Assessment],
    cohort: &AggregationCohort,
) -> Result<Vec<DailyMean>, MetricsError> {
    let mut by_date: BTreeMap<Date, Vec<Points>> = BTreeMap::new();
    for assessment in records.iter().filter(|a| cohort.matches(a)) {
        let (_, total) = assessment
            .computed_total
            .scale_totals()
            .into_iter()
            .next()
            .ok_or(MetricsError::CorruptRecord(assessment.id))?;
        by_date
            .entry(assessment.assessment_date)
            .or_default()
            .push(total);
    }

    Ok(by_date
        .into_iter()
        .map(|(date, totals)| DailyMean {
            date,
            sample_size: totals.len(),
            mean: mean(&totals),
        })
        .collect())
}

/// Nursing workload per date from NAS assessments.
pub fn nursing_demand(
    records: &[Assessment],
    cohort: &AggregationCohort,
) -> Result<Vec<DailyDemand>, MetricsError> {
    if cohort.instrument_type != InstrumentType::Nas {
        return Err(MetricsError::UnsupportedInstrument(cohort.instrument_type));
    }

    let mut by_date: BTreeMap<Date, (usize, Points)> = BTreeMap::new();
    for assessment in records.iter().filter(|a| cohort.matches(a)) {
        let total = assessment
            .computed_total
            .scale(TOTAL_SCALE)
            .ok_or(MetricsError::CorruptRecord(assessment.id))?;
        let day = by_date.entry(assessment.assessment_date).or_default();
        day.0 += 1;
        day.1 = day.1 + total;
    }

    Ok(by_date
        .into_iter()
        .map(|(date, (patients, total))| DailyDemand {
            date,
            patients,
            total,
            nurses_required: total.as_f64() / NAS_PER_NURSE,
        })
        .collect())
}
