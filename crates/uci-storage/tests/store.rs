use std::collections::BTreeMap;
use std::sync::Arc;

use jiff::civil::{Date, date};
use uci_core::Points;
use uci_core::models::assessment::Assessment;
use uci_core::models::cohort::{BedSelection, DateRange};
use uci_core::models::instrument::InstrumentType;
use uci_core::models::patient::Patient;
use uci_core::models::procedure::{ProcedureRecord, Shift};
use uci_core::models::score::{BandLabel, Classification, ScoreResult};
use uci_core::models::selection::{SelectionValue, Selections};
use uci_storage::error::StorageError;
use uci_storage::{
    AssessmentFilter, AssessmentStore, InsertOutcome, JsonFileStore, MemoryStore, ProcedureFilter,
};
use uuid::Uuid;

fn assessment(subject: Uuid, instrument: InstrumentType, day: Date, bed: Option<u32>) -> Assessment {
    let mut selections = Selections::new();
    selections.insert("2".into(), SelectionValue::Flag(true));
    Assessment {
        id: Uuid::new_v4(),
        subject_id: subject,
        instrument_type: instrument,
        assessment_date: day,
        bed_number: bed,
        selections,
        computed_total: ScoreResult::Total {
            total: Points::from_tenths(43),
        },
        classification: Classification::Band {
            band: BandLabel {
                label: "Baja".into(),
                rank: 0,
            },
        },
        author_id: "enf-01".into(),
        created_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

fn procedure_record(patient: Option<Uuid>, day: Date, shift: Shift) -> ProcedureRecord {
    ProcedureRecord {
        id: Uuid::new_v4(),
        patient_id: patient,
        bed_number: patient.map(|_| 4),
        date: day,
        shift,
        procedures: BTreeMap::from([("chequeo_equipos".to_string(), 1)]),
        author_id: "kine-02".into(),
        created_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

#[tokio::test]
async fn second_insert_for_same_key_conflicts() {
    let store = MemoryStore::new();
    let patient = Uuid::new_v4();
    let day = date(2024, 3, 1);

    let first = assessment(patient, InstrumentType::Nas, day, Some(1));
    let outcome = store.insert_assessment_if_absent(first.clone()).await.unwrap();
    assert_eq!(outcome, InsertOutcome::Committed);

    let second = assessment(patient, InstrumentType::Nas, day, Some(1));
    let outcome = store.insert_assessment_if_absent(second).await.unwrap();
    assert_eq!(outcome, InsertOutcome::Conflict(Box::new(first.clone())));

    let found = store.find_assessment(&first.key()).await.unwrap();
    assert_eq!(found, Some(first));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn same_subject_other_instrument_or_day_is_independent() {
    let store = MemoryStore::new();
    let patient = Uuid::new_v4();
    let day = date(2024, 3, 1);

    for a in [
        assessment(patient, InstrumentType::Nas, day, None),
        assessment(patient, InstrumentType::Apache2, day, None),
        assessment(patient, InstrumentType::Nas, date(2024, 3, 2), None),
    ] {
        assert_eq!(
            store.insert_assessment_if_absent(a).await.unwrap(),
            InsertOutcome::Committed
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_commit_exactly_once() {
    let store = Arc::new(MemoryStore::new());
    let patient = Uuid::new_v4();
    let day = date(2024, 3, 1);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .insert_assessment_if_absent(assessment(patient, InstrumentType::Nas, day, None))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut committed = 0;
    let mut conflicts = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            InsertOutcome::Committed => committed += 1,
            InsertOutcome::Conflict(existing) => conflicts.push(existing.id),
        }
    }
    assert_eq!(committed, 1);
    assert_eq!(conflicts.len(), 15);
    conflicts.dedup();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn query_filters_and_orders_by_date() {
    let store = MemoryStore::new();
    let later = assessment(Uuid::new_v4(), InstrumentType::Nas, date(2024, 3, 5), Some(2));
    let earlier = assessment(Uuid::new_v4(), InstrumentType::Nas, date(2024, 3, 1), Some(3));
    let no_bed = assessment(Uuid::new_v4(), InstrumentType::Nas, date(2024, 3, 2), None);
    let apache = assessment(Uuid::new_v4(), InstrumentType::Apache2, date(2024, 3, 1), Some(2));
    for a in [&later, &earlier, &no_bed, &apache] {
        store.insert_assessment_if_absent(a.clone()).await.unwrap();
    }

    let all_nas = store
        .query_assessments(&AssessmentFilter {
            instrument_type: Some(InstrumentType::Nas),
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<Uuid> = all_nas.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![earlier.id, no_bed.id, later.id]);

    let sector = store
        .query_assessments(&AssessmentFilter {
            instrument_type: Some(InstrumentType::Nas),
            beds: Some(BedSelection::Range { from: 1, to: 3 }),
            date_range: Some(DateRange::new(date(2024, 3, 1), date(2024, 3, 4)).unwrap()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(sector.len(), 1);
    assert_eq!(sector[0].id, earlier.id);
}

#[tokio::test]
async fn patients_and_procedures_round_trip() {
    let store = MemoryStore::new();
    let patient = Patient {
        id: Uuid::new_v4(),
        admission_date: date(2024, 2, 20),
        discharge_date: None,
        bed_number: Some(4),
    };
    store.put_patient(patient.clone()).await.unwrap();
    assert_eq!(store.get_patient(patient.id).await.unwrap(), Some(patient.clone()));
    assert_eq!(store.get_patient(Uuid::new_v4()).await.unwrap(), None);

    store
        .insert_procedure_record(procedure_record(Some(patient.id), date(2024, 3, 1), Shift::Night))
        .await
        .unwrap();
    store
        .insert_procedure_record(procedure_record(None, date(2024, 3, 1), Shift::Day))
        .await
        .unwrap();

    let all = store.query_procedures(&ProcedureFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].shift, Shift::Day);

    let mine = store
        .query_procedures(&ProcedureFilter {
            patient_id: Some(patient.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ward").join("store.json");
    let patient = Uuid::new_v4();
    let day = date(2024, 3, 1);
    let first = assessment(patient, InstrumentType::KinesioCategorization, day, Some(7));

    {
        let store = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(
            store.insert_assessment_if_absent(first.clone()).await.unwrap(),
            InsertOutcome::Committed
        );
        store
            .insert_procedure_record(procedure_record(Some(patient), day, Shift::Day))
            .await
            .unwrap();
    }
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    let store = JsonFileStore::open(&path).await.unwrap();
    assert_eq!(store.find_assessment(&first.key()).await.unwrap(), Some(first.clone()));
    let again = assessment(patient, InstrumentType::KinesioCategorization, day, None);
    assert!(matches!(
        store.insert_assessment_if_absent(again).await.unwrap(),
        InsertOutcome::Conflict(existing) if existing.id == first.id
    ));
    assert_eq!(
        store.query_procedures(&ProcedureFilter::default()).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn snapshot_with_duplicate_keys_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let patient = Uuid::new_v4();
    let day = date(2024, 3, 1);
    let snapshot = serde_json::json!({
        "assessments": [
            assessment(patient, InstrumentType::Nas, day, None),
            assessment(patient, InstrumentType::Nas, day, None),
        ]
    });
    std::fs::write(&path, serde_json::to_vec(&snapshot).unwrap()).unwrap();

    let err = JsonFileStore::open(&path).await.unwrap_err();
    assert!(matches!(err, StorageError::CorruptSnapshot { .. }));
}

#[tokio::test]
async fn missing_snapshot_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("fresh.json")).await.unwrap();
    let all = store.query_assessments(&AssessmentFilter::default()).await.unwrap();
    assert!(all.is_empty());
}
