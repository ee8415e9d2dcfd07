use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uci_core::models::assessment::{Assessment, AssessmentKey};
use uci_core::models::patient::Patient;
use uci_core::models::procedure::ProcedureRecord;
use uuid::Uuid;

use crate::filter::{AssessmentFilter, ProcedureFilter};
use crate::store::InsertOutcome;

/// Everything a store holds. Serialized as-is for file snapshots; the
/// uniqueness index is rebuilt on load.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    patients: BTreeMap<Uuid, Patient>,
    #[serde(default)]
    assessments: Vec<Assessment>,
    #[serde(default)]
    procedures: Vec<ProcedureRecord>,
    #[serde(skip)]
    index: HashMap<AssessmentKey, usize>,
}

impl Ledger {
    /// Rebuild the uniqueness index after deserializing. Returns the first
    /// key held by more than one assessment, if any.
    pub fn reindex(&mut self) -> Result<(), AssessmentKey> {
        self.index.clear();
        for (pos, assessment) in self.assessments.iter().enumerate() {
            if self.index.insert(assessment.key(), pos).is_some() {
                return Err(assessment.key());
            }
        }
        Ok(())
    }

    pub fn find(&self, key: &AssessmentKey) -> Option<&Assessment> {
        self.index.get(key).map(|&pos| &self.assessments[pos])
    }

    pub fn insert_if_absent(&mut self, assessment: Assessment) -> InsertOutcome {
        let key = assessment.key();
        if let Some(existing) = self.find(&key) {
            return InsertOutcome::Conflict(Box::new(existing.clone()));
        }
        self.index.insert(key, self.assessments.len());
        self.assessments.push(assessment);
        InsertOutcome::Committed
    }

    /// Undo the most recent insert of `key`.
    pub fn retract(&mut self, key: &AssessmentKey) {
        if let Some(pos) = self.index.remove(key) {
            self.assessments.remove(pos);
            for slot in self.index.values_mut() {
                if *slot > pos {
                    *slot -= 1;
                }
            }
        }
    }

    /// Matching assessments ordered by date, then key.
    pub fn query(&self, filter: &AssessmentFilter) -> Vec<Assessment> {
        let mut found: Vec<Assessment> = self
            .assessments
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.assessment_date, a.key()));
        found
    }

    pub fn patient(&self, id: Uuid) -> Option<&Patient> {
        self.patients.get(&id)
    }

    pub fn put_patient(&mut self, patient: Patient) -> Option<Patient> {
        self.patients.insert(patient.id, patient)
    }

    pub fn remove_patient(&mut self, id: Uuid) -> Option<Patient> {
        self.patients.remove(&id)
    }

    pub fn push_procedures(&mut self, record: ProcedureRecord) {
        self.procedures.push(record);
    }

    pub fn pop_procedures(&mut self) -> Option<ProcedureRecord> {
        self.procedures.pop()
    }

    pub fn query_procedures(&self, filter: &ProcedureFilter) -> Vec<ProcedureRecord> {
        let mut found: Vec<ProcedureRecord> = self
            .procedures
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.date, r.shift, r.created_at, r.id));
        found
    }

    pub fn assessment_count(&self) -> usize {
        self.assessments.len()
    }
}
