use std::collections::BTreeMap;

use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uci_core::models::assessment::{Assessment, AssessmentKey};
use uci_core::models::cohort::DateRange;
use uci_core::models::instrument::{InstrumentType, SubjectKind};
use uci_core::models::patient::{DischargeGrace, Patient};
use uci_core::models::procedure::{ProcedureRecord, Shift};
use uci_core::models::score::{Classification, ScoreResult};
use uci_core::models::selection::Selections;
use uci_instruments::Catalog;
use uci_instruments::procedures::validate_procedures;
use uci_metrics::{
    AggregationCohort, AggregationResult, DailyDemand, DailyMean, ShiftThroughput, aggregate,
    daily_trend, nursing_demand, shift_throughput,
};
use uci_storage::{AssessmentFilter, AssessmentStore, InsertOutcome, ProcedureFilter};
use uuid::Uuid;

use crate::audit::AuditEvent;
use crate::config::EngineConfig;
use crate::error::{EngineError, SubmitError};
use crate::guard;

/// A request to record one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitAssessment {
    /// Patient id, or the respondent's staff id for MBI.
    pub subject_id: Uuid,
    pub instrument_type: InstrumentType,
    pub assessment_date: Date,
    pub selections: Selections,
    pub author_id: String,
    /// The caller's current date; bounds `assessment_date`.
    pub today: Date,
    pub submitted_at: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitReceipt {
    pub assessment_id: Uuid,
    pub computed_total: ScoreResult,
    pub classification: Classification,
}

/// A shift's worth of kinesiology procedures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LogProcedures {
    /// Absent for unit-level activities.
    pub patient_id: Option<Uuid>,
    pub date: Date,
    /// Local time the work was done; tags the record Day or Night.
    pub performed_at: Time,
    pub procedures: BTreeMap<String, u32>,
    pub author_id: String,
    pub today: Date,
    pub submitted_at: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProcedureReceipt {
    pub record_id: Uuid,
    pub shift: Shift,
    pub total_count: u64,
}

/// The ward engine: pure catalog and metrics logic over a store.
pub struct WardEngine<S> {
    store: S,
    catalog: &'static Catalog,
    config: EngineConfig,
}

impl<S: AssessmentStore> WardEngine<S> {
    /// Fails if the built-in catalog or `config` is invalid.
    pub fn new(store: S, config: EngineConfig) -> Result<Self, EngineError> {
        let catalog = Catalog::builtin()?;
        config
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        tracing::info!(
            catalog_version = uci_instruments::CATALOG_VERSION,
            sectors = config.sectors.len(),
            "ward engine ready"
        );
        Ok(WardEngine {
            store,
            catalog,
            config,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate, score, classify and commit one assessment.
    ///
    /// Selections are checked first, then the date window, then
    /// uniqueness. The uniqueness check is the store's atomic insert, so
    /// of two racing submissions for the same key exactly one commits.
    pub async fn submit_assessment(
        &self,
        request: SubmitAssessment,
    ) -> Result<SubmitReceipt, SubmitError> {
        let instrument = request.instrument_type;
        let evaluation = self
            .catalog
            .evaluate(instrument, &request.selections)
            .inspect_err(|e| {
                tracing::warn!(instrument = %instrument, error = %e, "assessment rejected");
            })?;

        let patient = match instrument.subject_kind() {
            SubjectKind::Patient => Some(self.patient(request.subject_id).await?),
            SubjectKind::Staff => None,
        };
        self.check_date(
            request.assessment_date,
            request.today,
            patient.as_ref(),
            self.config.assessment_grace,
        )?;

        let definition = self.catalog.get(instrument)?;
        let assessment = Assessment {
            id: Uuid::new_v4(),
            subject_id: request.subject_id,
            instrument_type: instrument,
            assessment_date: request.assessment_date,
            bed_number: patient.as_ref().and_then(|p| p.bed_number),
            selections: evaluation.selection.to_selections(definition),
            computed_total: evaluation.score.clone(),
            classification: evaluation.classification.clone(),
            author_id: request.author_id,
            created_at: request.submitted_at,
        };
        let assessment_id = assessment.id;
        let author = assessment.author_id.clone();

        match self.store.insert_assessment_if_absent(assessment).await? {
            InsertOutcome::Committed => {}
            InsertOutcome::Conflict(existing) => {
                tracing::warn!(
                    instrument = %instrument,
                    subject_id = %request.subject_id,
                    existing_id = %existing.id,
                    date = %existing.assessment_date,
                    "duplicate assessment rejected"
                );
                return Err(guard::duplicate_of(&existing).into());
            }
        }

        tracing::info!(
            assessment_id = %assessment_id,
            instrument = %instrument,
            date = %request.assessment_date,
            "assessment committed"
        );
        AuditEvent::new("create", "assessment", assessment_id.to_string(), author)
            .with_details(serde_json::json!({
                "instrument_type": instrument,
                "assessment_date": request.assessment_date,
                "computed_total": &evaluation.score,
            }))
            .emit();

        Ok(SubmitReceipt {
            assessment_id,
            computed_total: evaluation.score,
            classification: evaluation.classification,
        })
    }

    /// The committed assessment for a key, if any; lets a form warn
    /// "already evaluated today" before the user fills it in.
    pub async fn existing_assessment(
        &self,
        subject_id: Uuid,
        instrument_type: InstrumentType,
        date: Date,
    ) -> Result<Option<Assessment>, EngineError> {
        let key = AssessmentKey {
            subject_id,
            instrument_type,
            date,
        };
        Ok(self.store.find_assessment(&key).await?)
    }

    /// Record one shift's procedures. Not subject to the uniqueness guard;
    /// patient-bound logs are held to the procedure discharge grace.
    pub async fn log_procedures(
        &self,
        request: LogProcedures,
    ) -> Result<ProcedureReceipt, SubmitError> {
        validate_procedures(&request.procedures, request.patient_id.is_some()).inspect_err(
            |e| tracing::warn!(error = %e, "procedure log rejected"),
        )?;

        let patient = match request.patient_id {
            Some(id) => Some(self.patient(id).await?),
            None => None,
        };
        self.check_date(
            request.date,
            request.today,
            patient.as_ref(),
            self.config.procedure_grace,
        )?;

        let record = ProcedureRecord {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            bed_number: patient.as_ref().and_then(|p| p.bed_number),
            date: request.date,
            shift: self.config.shift_schedule.shift_at(request.performed_at),
            procedures: request.procedures,
            author_id: request.author_id,
            created_at: request.submitted_at,
        };
        let receipt = ProcedureReceipt {
            record_id: record.id,
            shift: record.shift,
            total_count: record.total_count(),
        };
        let author = record.author_id.clone();

        self.store.insert_procedure_record(record).await?;

        tracing::info!(
            record_id = %receipt.record_id,
            shift = %receipt.shift,
            count = receipt.total_count,
            "procedures logged"
        );
        AuditEvent::new("create", "procedure_record", receipt.record_id.to_string(), author)
            .with_details(serde_json::json!({
                "date": request.date,
                "shift": receipt.shift,
                "total_count": receipt.total_count,
            }))
            .emit();

        Ok(receipt)
    }

    /// Aggregate the committed assessments in `cohort`.
    pub async fn get_cohort_metrics(
        &self,
        cohort: &AggregationCohort,
    ) -> Result<AggregationResult, EngineError> {
        let definition = self.catalog.get(cohort.instrument_type)?;
        let records = self.cohort_records(cohort).await?;
        Ok(aggregate(definition, &records, cohort)?)
    }

    pub async fn get_daily_trend(
        &self,
        cohort: &AggregationCohort,
    ) -> Result<Vec<DailyMean>, EngineError> {
        let records = self.cohort_records(cohort).await?;
        Ok(daily_trend(&records, cohort)?)
    }

    pub async fn get_nursing_demand(
        &self,
        cohort: &AggregationCohort,
    ) -> Result<Vec<DailyDemand>, EngineError> {
        let records = self.cohort_records(cohort).await?;
        Ok(nursing_demand(&records, cohort)?)
    }

    pub async fn get_shift_throughput(
        &self,
        filter: &ProcedureFilter,
    ) -> Result<ShiftThroughput, EngineError> {
        let records = self.store.query_procedures(filter).await?;
        Ok(shift_throughput(&records))
    }

    /// A cohort covering the configured sector `name`.
    pub fn sector_cohort(
        &self,
        instrument_type: InstrumentType,
        name: &str,
        dates: Option<DateRange>,
    ) -> Result<AggregationCohort, EngineError> {
        let sector = self
            .config
            .sector(name)
            .ok_or_else(|| EngineError::UnknownSector(name.to_string()))?;
        let cohort = AggregationCohort::new(instrument_type).with_beds(sector.beds());
        Ok(match dates {
            Some(range) => cohort.with_dates(range),
            None => cohort,
        })
    }

    async fn cohort_records(
        &self,
        cohort: &AggregationCohort,
    ) -> Result<Vec<Assessment>, EngineError> {
        let filter = AssessmentFilter {
            instrument_type: Some(cohort.instrument_type),
            subject_id: None,
            date_range: cohort.date_range,
            beds: cohort.beds.clone(),
        };
        let records = self.store.query_assessments(&filter).await?;
        tracing::debug!(
            instrument = %cohort.instrument_type,
            records = records.len(),
            "cohort records loaded"
        );
        Ok(records)
    }

    async fn patient(&self, id: Uuid) -> Result<Patient, SubmitError> {
        self.store
            .get_patient(id)
            .await?
            .ok_or(SubmitError::UnknownPatient(id))
    }

    fn check_date(
        &self,
        date: Date,
        today: Date,
        patient: Option<&Patient>,
        grace: DischargeGrace,
    ) -> Result<(), SubmitError> {
        guard::check_date(date, today, patient, grace).map_err(|e| {
            tracing::warn!(error = %e, "date out of range");
            SubmitError::from(e)
        })
    }
}
