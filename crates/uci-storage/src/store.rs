use std::future::Future;

use uci_core::models::assessment::{Assessment, AssessmentKey};
use uci_core::models::patient::Patient;
use uci_core::models::procedure::ProcedureRecord;
use uuid::Uuid;

use crate::error::StorageError;
use crate::filter::{AssessmentFilter, ProcedureFilter};

/// Result of [`AssessmentStore::insert_assessment_if_absent`].
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Committed,
    /// Another assessment already holds the key; it is returned unchanged.
    Conflict(Box<Assessment>),
}

/// The persistence collaborator.
///
/// Implementations must make `insert_assessment_if_absent` atomic with
/// respect to the `(subject, instrument, date)` key: of any number of
/// concurrent inserts for one key, exactly one commits.
pub trait AssessmentStore: Send + Sync {
    fn find_assessment(
        &self,
        key: &AssessmentKey,
    ) -> impl Future<Output = Result<Option<Assessment>, StorageError>> + Send;

    fn insert_assessment_if_absent(
        &self,
        assessment: Assessment,
    ) -> impl Future<Output = Result<InsertOutcome, StorageError>> + Send;

    fn query_assessments(
        &self,
        filter: &AssessmentFilter,
    ) -> impl Future<Output = Result<Vec<Assessment>, StorageError>> + Send;

    fn get_patient(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Patient>, StorageError>> + Send;

    /// Insert or replace a patient (admission, discharge, bed change).
    fn put_patient(
        &self,
        patient: Patient,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn insert_procedure_record(
        &self,
        record: ProcedureRecord,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn query_procedures(
        &self,
        filter: &ProcedureFilter,
    ) -> impl Future<Output = Result<Vec<ProcedureRecord>, StorageError>> + Send;
}
