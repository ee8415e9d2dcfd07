use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use uci_core::Points;
use uci_core::models::instrument::InstrumentType;
use uci_core::models::score::{Classification, ScoreResult};
use uci_core::models::selection::Selections;

use crate::definition::{BandTable, CompletenessPolicy, InstrumentDefinition, Polarity, ScoringModel};
use crate::error::{CatalogError, InstrumentError};
use crate::scoring::max_scores;
use crate::validate::NormalizedSelection;
use crate::{classify, scoring, validate};

static BUILTIN: LazyLock<Result<Catalog, CatalogError>> = LazyLock::new(|| {
    let catalog = Catalog::new(
        crate::all_instruments()
            .iter()
            .map(|i| i.definition().clone()),
    );
    match &catalog {
        Ok(c) => tracing::debug!(
            version = crate::CATALOG_VERSION,
            instruments = c.instruments.len(),
            "instrument catalog validated"
        ),
        Err(e) => tracing::error!(error = %e, "built-in instrument catalog is invalid"),
    }
    catalog
});

/// Registry of validated instrument definitions keyed by type.
#[derive(Debug, Clone)]
pub struct Catalog {
    instruments: BTreeMap<InstrumentType, InstrumentDefinition>,
}

/// Result of running a selection through validate → score → classify.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub selection: NormalizedSelection,
    pub score: ScoreResult,
    pub classification: Classification,
}

impl Catalog {
    /// Build a catalog, checking every definition's integrity up front.
    pub fn new(
        definitions: impl IntoIterator<Item = InstrumentDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut instruments = BTreeMap::new();
        for definition in definitions {
            check_integrity(&definition)?;
            let instrument_type = definition.instrument_type;
            if instruments.insert(instrument_type, definition).is_some() {
                return Err(CatalogError::DuplicateInstrument(instrument_type));
            }
        }
        Ok(Catalog { instruments })
    }

    /// The process-wide built-in catalog, validated once on first use.
    pub fn builtin() -> Result<&'static Catalog, CatalogError> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    pub fn get(&self, instrument_type: InstrumentType) -> Result<&InstrumentDefinition, InstrumentError> {
        self.instruments
            .get(&instrument_type)
            .ok_or(InstrumentError::UnknownInstrument(instrument_type))
    }

    pub fn instruments(&self) -> impl Iterator<Item = &InstrumentDefinition> {
        self.instruments.values()
    }

    pub fn validate(
        &self,
        instrument_type: InstrumentType,
        selections: &Selections,
    ) -> Result<NormalizedSelection, InstrumentError> {
        Ok(validate::validate(self.get(instrument_type)?, selections)?)
    }

    pub fn compute_score(
        &self,
        instrument_type: InstrumentType,
        selection: &NormalizedSelection,
    ) -> Result<ScoreResult, InstrumentError> {
        scoring::compute_score(self.get(instrument_type)?, selection)
    }

    pub fn classify(
        &self,
        instrument_type: InstrumentType,
        score: &ScoreResult,
    ) -> Result<Classification, InstrumentError> {
        classify::classify(self.get(instrument_type)?, score)
    }

    pub fn evaluate(
        &self,
        instrument_type: InstrumentType,
        selections: &Selections,
    ) -> Result<Evaluation, InstrumentError> {
        let definition = self.get(instrument_type)?;
        let selection = validate::validate(definition, selections)?;
        let score = scoring::compute_score(definition, &selection)?;
        let classification = classify::classify(definition, &score)?;
        Ok(Evaluation {
            selection,
            score,
            classification,
        })
    }
}

fn check_integrity(definition: &InstrumentDefinition) -> Result<(), CatalogError> {
    let instrument = definition.instrument_type;

    let mut codes = BTreeSet::new();
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for item in &definition.items {
        if !codes.insert(item.code.as_str()) {
            return Err(CatalogError::DuplicateItem {
                instrument,
                code: item.code.clone(),
            });
        }
        if let Some(group) = &item.exclusivity_group {
            *groups.entry(group.as_str()).or_default() += 1;
        }
    }
    if let Some((group, _)) = groups.iter().find(|(_, members)| **members < 2) {
        return Err(CatalogError::OrphanedExclusivityGroup {
            instrument,
            group: group.to_string(),
        });
    }

    match (&definition.scoring, definition.completeness) {
        (ScoringModel::Weighted { .. }, CompletenessPolicy::AtLeastOne) => {
            if let Some(item) = definition
                .items
                .iter()
                .find(|i| i.polarity == Polarity::Inverse)
            {
                return Err(CatalogError::InvalidPolarity {
                    instrument,
                    code: item.code.clone(),
                });
            }
        }
        (ScoringModel::Subscales { subscales }, CompletenessPolicy::ExactlyAnswered { count, .. }) => {
            if count != definition.items.len() {
                return Err(CatalogError::AnswerCountMismatch {
                    instrument,
                    expected: count,
                    found: definition.items.len(),
                });
            }
            for item in &definition.items {
                let assigned = item
                    .subscale
                    .as_deref()
                    .is_some_and(|s| subscales.iter().any(|d| d.id == s));
                if !assigned {
                    return Err(CatalogError::UnassignedItem {
                        instrument,
                        code: item.code.clone(),
                    });
                }
            }
            for subscale in subscales {
                let used = definition
                    .items
                    .iter()
                    .any(|i| i.subscale.as_deref() == Some(subscale.id.as_str()));
                if !used {
                    return Err(CatalogError::EmptySubscale {
                        instrument,
                        subscale: subscale.id.clone(),
                    });
                }
            }
        }
        _ => return Err(CatalogError::InconsistentPolicy { instrument }),
    }

    let maxima = max_scores(definition);
    for (scale, bands) in definition.scales() {
        let max = maxima
            .iter()
            .find(|(id, _)| id == scale)
            .map(|(_, m)| *m)
            .unwrap_or(Points::ZERO);
        check_bands(instrument, scale, bands, max)?;
    }
    Ok(())
}

/// Bands must start at zero, follow each other with no gap or overlap
/// at tenth-of-a-point resolution, strictly increase in severity and
/// reach the highest achievable score.
fn check_bands(
    instrument: InstrumentType,
    scale: &str,
    table: &BandTable,
    max: Points,
) -> Result<(), CatalogError> {
    let Some(first) = table.bands.first() else {
        return Err(CatalogError::EmptyBands {
            instrument,
            scale: scale.to_string(),
        });
    };
    let not_contiguous = |label: &str| CatalogError::BandsNotContiguous {
        instrument,
        scale: scale.to_string(),
        label: label.to_string(),
    };
    if first.lower != Points::ZERO {
        return Err(not_contiguous(&first.label));
    }

    for pair in table.bands.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let expected_lower = prev.upper.and_then(Points::next_up);
        if expected_lower != Some(next.lower) {
            return Err(not_contiguous(&next.label));
        }
        if next.rank <= prev.rank {
            return Err(CatalogError::BandRanksNotIncreasing {
                instrument,
                scale: scale.to_string(),
                label: next.label.clone(),
            });
        }
    }

    for band in &table.bands {
        if band.upper.is_some_and(|upper| upper < band.lower) {
            return Err(not_contiguous(&band.label));
        }
    }

    if let Some(covered) = table.bands.last().and_then(|b| b.upper)
        && covered < max
    {
        return Err(CatalogError::BandsDoNotCoverScale {
            instrument,
            scale: scale.to_string(),
            covered,
            max,
        });
    }
    Ok(())
}
