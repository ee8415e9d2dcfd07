use uci_core::Points;
use uci_core::models::score::{BandLabel, Classification, ScoreResult, SubscaleBand};

use crate::definition::{BandTable, ClassificationBand, InstrumentDefinition, ScoringModel};
use crate::error::{CatalogError, InstrumentError};

impl BandTable {
    /// Binary search for the index of the band containing `score`.
    ///
    /// Returns `None` only if the table has a gap at `score`, which
    /// [`crate::catalog::Catalog`] rejects when it is built.
    pub fn position(&self, score: Points) -> Option<usize> {
        let idx = self
            .bands
            .partition_point(|band| band.lower <= score)
            .checked_sub(1)?;
        self.bands
            .get(idx)
            .filter(|band| band.contains(score))
            .map(|_| idx)
    }

    pub fn lookup(&self, score: Points) -> Option<&ClassificationBand> {
        self.position(score).and_then(|idx| self.bands.get(idx))
    }
}

impl From<&ClassificationBand> for BandLabel {
    fn from(band: &ClassificationBand) -> Self {
        BandLabel {
            label: band.label.clone(),
            rank: band.rank,
        }
    }
}

/// The band of one scale, failing loudly on a catalog gap.
pub fn classify_scale<'a>(
    definition: &'a InstrumentDefinition,
    scale: &str,
    score: Points,
) -> Result<&'a ClassificationBand, CatalogError> {
    let no_band = || CatalogError::NoBandForScore {
        instrument: definition.instrument_type,
        scale: scale.to_string(),
        score,
    };
    definition
        .bands_for(scale)
        .ok_or_else(no_band)?
        .lookup(score)
        .ok_or_else(no_band)
}

/// Map a computed score to its classification.
pub fn classify(
    definition: &InstrumentDefinition,
    score: &ScoreResult,
) -> Result<Classification, InstrumentError> {
    match (&definition.scoring, score) {
        (ScoringModel::Weighted { .. }, ScoreResult::Total { total }) => {
            let scale = uci_core::models::score::TOTAL_SCALE;
            let band = classify_scale(definition, scale, *total)?;
            Ok(Classification::Band { band: band.into() })
        }
        (ScoringModel::Subscales { subscales }, ScoreResult::Subscales { subscales: totals })
            if subscales.len() == totals.len() =>
        {
            let subscales = totals
                .iter()
                .map(|t| -> Result<SubscaleBand, CatalogError> {
                    let band = classify_scale(definition, &t.subscale, t.total)?;
                    Ok(SubscaleBand {
                        subscale: t.subscale.clone(),
                        band: band.into(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Classification::Subscales { subscales })
        }
        _ => Err(InstrumentError::ScoreShapeMismatch(
            definition.instrument_type,
        )),
    }
}
