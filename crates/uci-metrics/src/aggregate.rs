use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uci_core::Points;
use uci_core::models::assessment::Assessment;
use uci_core::models::instrument::InstrumentType;
use uci_instruments::definition::InstrumentDefinition;
use uci_instruments::error::CatalogError;

use crate::cohort::AggregationCohort;
use crate::error::MetricsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AggregationResult {
    pub instrument_type: InstrumentType,
    /// Number of assessments in the cohort. A zero here is how callers
    /// tell "no data" from a genuine zero mean.
    pub sample_size: usize,
    /// One summary per scale, in catalog order.
    pub scales: Vec<ScaleSummary>,
}

impl AggregationResult {
    pub fn scale(&self, id: &str) -> Option<&ScaleSummary> {
        self.scales.iter().find(|s| s.scale == id)
    }

    /// Mean of the first scale: the total for weighted instruments.
    pub fn mean(&self) -> f64 {
        self.scales.first().map(|s| s.mean).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScaleSummary {
    pub scale: String,
    /// 0 for an empty cohort.
    pub mean: f64,
    pub min: Option<Points>,
    pub max: Option<Points>,
    /// Every band of the scale, including empty ones.
    pub distribution: Vec<BandShare>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BandShare {
    pub label: String,
    pub rank: u8,
    pub count: usize,
    /// Whole percent. Over a non-empty cohort the bands sum to exactly 100.
    pub percent: u32,
}

/// Summarize the assessments of `records` that fall in `cohort`.
pub fn aggregate(
    definition: &InstrumentDefinition,
    records: &[Assessment],
    cohort: &AggregationCohort,
) -> Result<AggregationResult, MetricsError> {
    if definition.instrument_type != cohort.instrument_type {
        return Err(MetricsError::InstrumentMismatch {
            cohort: cohort.instrument_type,
            definition: definition.instrument_type,
        });
    }

    let members: Vec<&Assessment> = records.iter().filter(|a| cohort.matches(a)).collect();
    let sample_size = members.len();

    let scales = definition
        .scales()
        .into_iter()
        .map(|(scale, bands)| -> Result<ScaleSummary, MetricsError> {
            let mut totals = Vec::with_capacity(sample_size);
            for assessment in &members {
                let total = assessment
                    .computed_total
                    .scale(scale)
                    .ok_or(MetricsError::CorruptRecord(assessment.id))?;
                totals.push(total);
            }

            let mut counts = vec![0usize; bands.bands.len()];
            for &total in &totals {
                let idx = bands.position(total).ok_or_else(|| CatalogError::NoBandForScore {
                    instrument: definition.instrument_type,
                    scale: scale.to_string(),
                    score: total,
                })?;
                counts[idx] += 1;
            }

            let percents = largest_remainder_percents(&counts);
            let distribution = bands
                .bands
                .iter()
                .zip(counts.iter().zip(percents))
                .map(|(band, (&count, percent))| BandShare {
                    label: band.label.clone(),
                    rank: band.rank,
                    count,
                    percent,
                })
                .collect();

            Ok(ScaleSummary {
                scale: scale.to_string(),
                mean: mean(&totals),
                min: totals.iter().min().copied(),
                max: totals.iter().max().copied(),
                distribution,
            })
        })
        .collect::<Result<Vec<_>, MetricsError>>()?;

    Ok(AggregationResult {
        instrument_type: definition.instrument_type,
        sample_size,
        scales,
    })
}

/// Arithmetic mean in points, summed in tenths so the order of `totals`
/// cannot change the result. 0 for an empty slice.
pub fn mean(totals: &[Points]) -> f64 {
    if totals.is_empty() {
        return 0.0;
    }
    let tenths: u64 = totals.iter().map(|p| u64::from(p.tenths())).sum();
    tenths as f64 / totals.len() as f64 / 10.0
}

/// Whole-percent shares of `counts` that sum to exactly 100.
///
/// Each share is floored, then the leftover points go to the largest
/// remainders; ties go to the earlier (less severe) band. All zeros when
/// the counts are all zero.
pub fn largest_remainder_percents(counts: &[usize]) -> Vec<u32> {
    let total: u64 = counts.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let mut percents: Vec<u32> = Vec::with_capacity(counts.len());
    let mut remainders: Vec<(u64, usize)> = Vec::with_capacity(counts.len());
    for (idx, &count) in counts.iter().enumerate() {
        let scaled = count as u64 * 100;
        percents.push((scaled / total) as u32);
        remainders.push((scaled % total, idx));
    }

    let assigned: u32 = percents.iter().sum();
    // larger remainder first, then lower index
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, idx) in remainders.iter().take(100u32.saturating_sub(assigned) as usize) {
        percents[idx] += 1;
    }
    percents
}
