use std::collections::BTreeMap;

use uci_core::models::instrument::InstrumentType;
use uci_core::models::selection::{SelectionValue, Selections};

use crate::definition::{CompletenessPolicy, InstrumentDefinition};
use crate::error::{ValidationError, ValueKind, Violation};

/// A selection that passed validation for one instrument.
///
/// Holds item code → value: `1` for each selected checklist item, the
/// answer for each questionnaire question. Only [`validate`] builds one,
/// so no two values ever share an exclusivity group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSelection {
    instrument_type: InstrumentType,
    values: BTreeMap<String, u32>,
}

impl NormalizedSelection {
    pub fn instrument_type(&self) -> InstrumentType {
        self.instrument_type
    }

    pub fn value(&self, code: &str) -> Option<u32> {
        self.values.get(code).copied()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The canonical form persisted with an assessment: unselected flags
    /// are dropped, answers are kept as given.
    pub fn to_selections(&self, definition: &InstrumentDefinition) -> Selections {
        self.values
            .iter()
            .map(|(code, &value)| {
                let stored = match definition.completeness {
                    CompletenessPolicy::AtLeastOne => SelectionValue::Flag(true),
                    CompletenessPolicy::ExactlyAnswered { .. } => {
                        SelectionValue::Answer(i64::from(value))
                    }
                };
                (code.clone(), stored)
            })
            .collect()
    }
}

/// Check `selections` against the instrument's rules, collecting every
/// violation rather than stopping at the first.
pub fn validate(
    definition: &InstrumentDefinition,
    selections: &Selections,
) -> Result<NormalizedSelection, ValidationError> {
    let mut violations = Vec::new();
    let mut values = BTreeMap::new();

    match definition.completeness {
        CompletenessPolicy::AtLeastOne => {
            let mut by_group: BTreeMap<&str, Vec<String>> = BTreeMap::new();

            for (code, value) in selections {
                let Some(item) = definition.item(code) else {
                    violations.push(Violation::UnknownItem { code: code.clone() });
                    continue;
                };
                match value {
                    SelectionValue::Flag(true) => {
                        values.insert(code.clone(), 1);
                        if let Some(group) = &item.exclusivity_group {
                            by_group.entry(group.as_str()).or_default().push(code.clone());
                        }
                    }
                    SelectionValue::Flag(false) => {}
                    SelectionValue::Answer(_) => violations.push(Violation::InvalidValue {
                        code: code.clone(),
                        expected: ValueKind::Flag,
                    }),
                }
            }

            for (group, codes) in by_group {
                if codes.len() > 1 {
                    violations.push(Violation::ExclusivityConflict {
                        group: group.to_string(),
                        codes,
                    });
                }
            }

            if values.is_empty() {
                violations.push(Violation::EmptySelection);
            }
        }
        CompletenessPolicy::ExactlyAnswered { range, .. } => {
            for (code, value) in selections {
                if definition.item(code).is_none() {
                    violations.push(Violation::UnknownItem { code: code.clone() });
                    continue;
                }
                match *value {
                    SelectionValue::Answer(answer) if range.contains(answer) => {
                        values.insert(code.clone(), answer as u32);
                    }
                    SelectionValue::Answer(answer) => {
                        violations.push(Violation::OutOfRangeAnswer {
                            code: code.clone(),
                            value: answer,
                            min: range.min,
                            max: range.max,
                        });
                    }
                    SelectionValue::Flag(_) => violations.push(Violation::InvalidValue {
                        code: code.clone(),
                        expected: ValueKind::Answer,
                    }),
                }
            }

            let missing: Vec<String> = definition
                .items
                .iter()
                .filter(|item| !selections.contains_key(&item.code))
                .map(|item| item.code.clone())
                .collect();
            if !missing.is_empty() {
                violations.push(Violation::IncompleteAnswers { missing });
            }
        }
    }

    if violations.is_empty() {
        Ok(NormalizedSelection {
            instrument_type: definition.instrument_type,
            values,
        })
    } else {
        Err(ValidationError {
            instrument_type: Some(definition.instrument_type),
            violations,
        })
    }
}
