use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uci_core::Points;
use uci_core::models::instrument::InstrumentType;

/// Whether a higher answer means higher risk (`Direct`) or lower risk
/// (`Inverse`). Inverse items contribute `range.max - answer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Polarity {
    Direct,
    Inverse,
}

/// One selectable item or questionnaire question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemDefinition {
    pub code: String,
    pub label: String,
    pub weight: Points,
    /// At most one item of a group may be selected in one assessment.
    pub exclusivity_group: Option<String>,
    /// Only meaningful for procedure logging.
    pub requires_patient_context: bool,
    /// Subscale this question counts toward (questionnaires only).
    pub subscale: Option<String>,
    pub polarity: Polarity,
}

impl ItemDefinition {
    /// An ungrouped checklist item.
    pub fn weighted(code: &str, label: &str, weight: Points) -> Self {
        ItemDefinition {
            code: code.to_string(),
            label: label.to_string(),
            weight,
            exclusivity_group: None,
            requires_patient_context: false,
            subscale: None,
            polarity: Polarity::Direct,
        }
    }

    /// A checklist item that belongs to an exclusivity group.
    pub fn grouped(group: &str, code: &str, label: &str, weight: Points) -> Self {
        ItemDefinition {
            exclusivity_group: Some(group.to_string()),
            ..ItemDefinition::weighted(code, label, weight)
        }
    }

    /// A questionnaire question weighted 1 per answer step.
    pub fn question(code: &str, label: &str, subscale: &str, polarity: Polarity) -> Self {
        ItemDefinition {
            subscale: Some(subscale.to_string()),
            polarity,
            ..ItemDefinition::weighted(code, label, Points::whole(1))
        }
    }

    /// A loggable procedure. Procedures carry no weight.
    pub fn procedure(code: &str, label: &str, requires_patient_context: bool) -> Self {
        ItemDefinition {
            requires_patient_context,
            ..ItemDefinition::weighted(code, label, Points::ZERO)
        }
    }

    /// Points this item contributes for a validated `value`.
    ///
    /// Checklist items are selected with value 1 on a 0..=1 scale.
    pub fn points_for(&self, value: u32, scale_max: u32) -> Points {
        let steps = match self.polarity {
            Polarity::Direct => value,
            Polarity::Inverse => scale_max.saturating_sub(value),
        };
        self.weight.times(steps)
    }
}

/// Inclusive range a questionnaire answer must lie in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerRange {
    pub min: u32,
    pub max: u32,
}

impl AnswerRange {
    pub fn contains(&self, value: i64) -> bool {
        i64::from(self.min) <= value && value <= i64::from(self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum CompletenessPolicy {
    /// Checklists: at least one item must be selected.
    AtLeastOne,
    /// Questionnaires: every one of `count` questions answered within `range`.
    ExactlyAnswered { count: usize, range: AnswerRange },
}

/// A contiguous score range mapped to a label.
///
/// `lower` is inclusive; `upper` is inclusive, or open-ended when `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClassificationBand {
    pub label: String,
    pub rank: u8,
    pub lower: Points,
    pub upper: Option<Points>,
}

impl ClassificationBand {
    pub fn new(label: &str, rank: u8, lower: Points, upper: Option<Points>) -> Self {
        ClassificationBand {
            label: label.to_string(),
            rank,
            lower,
            upper,
        }
    }

    pub fn contains(&self, score: Points) -> bool {
        score >= self.lower && self.upper.is_none_or(|upper| score <= upper)
    }
}

/// Ordered, contiguous bands for one scale, sorted by `lower`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BandTable {
    pub bands: Vec<ClassificationBand>,
}

impl BandTable {
    pub fn new(bands: Vec<ClassificationBand>) -> Self {
        BandTable { bands }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscaleDefinition {
    pub id: String,
    pub name: String,
    pub bands: BandTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum ScoringModel {
    /// Sum of selected weights, classified against one band table.
    Weighted { bands: BandTable },
    /// Independent per-subscale sums, each with its own band table.
    Subscales { subscales: Vec<SubscaleDefinition> },
}

/// Immutable definition of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstrumentDefinition {
    pub instrument_type: InstrumentType,
    pub name: String,
    pub items: Vec<ItemDefinition>,
    pub scoring: ScoringModel,
    pub completeness: CompletenessPolicy,
}

impl InstrumentDefinition {
    pub fn item(&self, code: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|i| i.code == code)
    }

    /// `(scale id, bands)` in catalog order; weighted instruments have a
    /// single scale named [`uci_core::models::score::TOTAL_SCALE`].
    pub fn scales(&self) -> Vec<(&str, &BandTable)> {
        match &self.scoring {
            ScoringModel::Weighted { bands } => {
                vec![(uci_core::models::score::TOTAL_SCALE, bands)]
            }
            ScoringModel::Subscales { subscales } => subscales
                .iter()
                .map(|s| (s.id.as_str(), &s.bands))
                .collect(),
        }
    }

    pub fn bands_for(&self, scale: &str) -> Option<&BandTable> {
        self.scales()
            .into_iter()
            .find(|(id, _)| *id == scale)
            .map(|(_, bands)| bands)
    }

    /// Upper end of the value scale items are answered on.
    pub fn scale_max(&self) -> u32 {
        match self.completeness {
            CompletenessPolicy::AtLeastOne => 1,
            CompletenessPolicy::ExactlyAnswered { range, .. } => range.max,
        }
    }
}
