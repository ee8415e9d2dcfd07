use tokio::sync::Mutex;
use uci_core::models::assessment::{Assessment, AssessmentKey};
use uci_core::models::patient::Patient;
use uci_core::models::procedure::ProcedureRecord;
use uuid::Uuid;

use crate::error::StorageError;
use crate::filter::{AssessmentFilter, ProcedureFilter};
use crate::ledger::Ledger;
use crate::store::{AssessmentStore, InsertOutcome};

/// Volatile store for tests and single-process use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Mutex<Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.ledger.lock().await.assessment_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl AssessmentStore for MemoryStore {
    async fn find_assessment(
        &self,
        key: &AssessmentKey,
    ) -> Result<Option<Assessment>, StorageError> {
        Ok(self.ledger.lock().await.find(key).cloned())
    }

    async fn insert_assessment_if_absent(
        &self,
        assessment: Assessment,
    ) -> Result<InsertOutcome, StorageError> {
        let id = assessment.id;
        let outcome = self.ledger.lock().await.insert_if_absent(assessment);
        tracing::debug!(
            assessment_id = %id,
            committed = matches!(outcome, InsertOutcome::Committed),
            "insert assessment"
        );
        Ok(outcome)
    }

    async fn query_assessments(
        &self,
        filter: &AssessmentFilter,
    ) -> Result<Vec<Assessment>, StorageError> {
        Ok(self.ledger.lock().await.query(filter))
    }

    async fn get_patient(&self, id: Uuid) -> Result<Option<Patient>, StorageError> {
        Ok(self.ledger.lock().await.patient(id).cloned())
    }

    async fn put_patient(&self, patient: Patient) -> Result<(), StorageError> {
        self.ledger.lock().await.put_patient(patient);
        Ok(())
    }

    async fn insert_procedure_record(&self, record: ProcedureRecord) -> Result<(), StorageError> {
        self.ledger.lock().await.push_procedures(record);
        Ok(())
    }

    async fn query_procedures(
        &self,
        filter: &ProcedureFilter,
    ) -> Result<Vec<ProcedureRecord>, StorageError> {
        Ok(self.ledger.lock().await.query_procedures(filter))
    }
}
