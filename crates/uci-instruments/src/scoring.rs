use std::collections::BTreeMap;

use uci_core::Points;
use uci_core::models::score::{ScoreResult, SubscaleTotal};

use crate::definition::{InstrumentDefinition, ScoringModel};
use crate::error::InstrumentError;
use crate::validate::NormalizedSelection;

/// Compute the score of a validated selection.
///
/// Items are visited in catalog order and summed in fixed-point tenths,
/// so the result never depends on how the selection was built.
pub fn compute_score(
    definition: &InstrumentDefinition,
    selection: &NormalizedSelection,
) -> Result<ScoreResult, InstrumentError> {
    if selection.instrument_type() != definition.instrument_type {
        return Err(InstrumentError::InstrumentMismatch {
            expected: definition.instrument_type,
            found: selection.instrument_type(),
        });
    }

    let scale_max = definition.scale_max();
    let contribution = |code: &str| -> Option<Points> {
        let item = definition.item(code)?;
        selection
            .value(code)
            .map(|value| item.points_for(value, scale_max))
    };

    let result = match &definition.scoring {
        ScoringModel::Weighted { .. } => ScoreResult::Total {
            total: definition
                .items
                .iter()
                .filter_map(|item| contribution(&item.code))
                .sum(),
        },
        ScoringModel::Subscales { subscales } => ScoreResult::Subscales {
            subscales: subscales
                .iter()
                .map(|subscale| SubscaleTotal {
                    subscale: subscale.id.clone(),
                    total: definition
                        .items
                        .iter()
                        .filter(|item| item.subscale.as_deref() == Some(subscale.id.as_str()))
                        .filter_map(|item| contribution(&item.code))
                        .sum(),
                })
                .collect(),
        },
    };
    Ok(result)
}

/// Highest score each scale can reach, assuming one item per exclusivity
/// group and the top answer on every question.
pub fn max_scores(definition: &InstrumentDefinition) -> Vec<(String, Points)> {
    let scale_max = definition.scale_max();
    // (subscale, group) -> best item in that group
    let mut group_best: BTreeMap<(Option<&str>, &str), Points> = BTreeMap::new();
    let mut ungrouped: Vec<(Option<&str>, Points)> = Vec::new();

    for item in &definition.items {
        let points = item
            .points_for(scale_max, scale_max)
            .max(item.points_for(0, scale_max));
        let scale = item.subscale.as_deref();
        match item.exclusivity_group.as_deref() {
            Some(group) => {
                let best = group_best.entry((scale, group)).or_default();
                *best = (*best).max(points);
            }
            None => ungrouped.push((scale, points)),
        }
    }

    let in_scale = |scale: Option<&str>, id: &str| match definition.scoring {
        ScoringModel::Weighted { .. } => true,
        ScoringModel::Subscales { .. } => scale == Some(id),
    };

    definition
        .scales()
        .into_iter()
        .map(|(id, _)| {
            let grouped: Points = group_best
                .iter()
                .filter(|((scale, _), _)| in_scale(*scale, id))
                .map(|(_, points)| *points)
                .sum();
            let single: Points = ungrouped
                .iter()
                .filter(|(scale, _)| in_scale(*scale, id))
                .map(|(_, points)| *points)
                .sum();
            (id.to_string(), grouped + single)
        })
        .collect()
}
