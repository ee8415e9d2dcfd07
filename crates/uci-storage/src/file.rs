use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use uci_core::models::assessment::{Assessment, AssessmentKey};
use uci_core::models::patient::Patient;
use uci_core::models::procedure::ProcedureRecord;
use uuid::Uuid;

use crate::error::StorageError;
use crate::filter::{AssessmentFilter, ProcedureFilter};
use crate::ledger::Ledger;
use crate::state::{load_state, save_state};
use crate::store::{AssessmentStore, InsertOutcome};

/// Store backed by a single JSON snapshot on local disk.
///
/// Every write rewrites the snapshot (tmp + rename) while holding the
/// ledger lock, so the file always reflects a prefix of committed writes.
/// A write whose snapshot fails is rolled back in memory and reported.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    ledger: Mutex<Ledger>,
}

impl JsonFileStore {
    /// Open the snapshot at `path`, starting empty if it does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let mut ledger = load_state::<Ledger>(&path).await?.unwrap_or_default();
        ledger
            .reindex()
            .map_err(|key| StorageError::CorruptSnapshot {
                path: path.clone(),
                reason: format!(
                    "more than one {} assessment for subject {} on {}",
                    key.instrument_type, key.subject_id, key.date
                ),
            })?;
        tracing::debug!(
            path = %path.display(),
            assessments = ledger.assessment_count(),
            "assessment store opened"
        );
        Ok(JsonFileStore {
            path,
            ledger: Mutex::new(ledger),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AssessmentStore for JsonFileStore {
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
        let key = assessment.key();
        let mut ledger = self.ledger.lock().await;
        let outcome = ledger.insert_if_absent(assessment);
        if outcome == InsertOutcome::Committed
            && let Err(e) = save_state(&self.path, &*ledger).await
        {
            ledger.retract(&key);
            tracing::warn!(error = %e, "snapshot write failed, insert rolled back");
            return Err(e);
        }
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
        let mut ledger = self.ledger.lock().await;
        let id = patient.id;
        let previous = ledger.put_patient(patient);
        if let Err(e) = save_state(&self.path, &*ledger).await {
            match previous {
                Some(p) => {
                    ledger.put_patient(p);
                }
                None => {
                    ledger.remove_patient(id);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    async fn insert_procedure_record(&self, record: ProcedureRecord) -> Result<(), StorageError> {
        let mut ledger = self.ledger.lock().await;
        ledger.push_procedures(record);
        if let Err(e) = save_state(&self.path, &*ledger).await {
            ledger.pop_procedures();
            return Err(e);
        }
        Ok(())
    }

    async fn query_procedures(
        &self,
        filter: &ProcedureFilter,
    ) -> Result<Vec<ProcedureRecord>, StorageError> {
        Ok(self.ledger.lock().await.query_procedures(filter))
    }
}
