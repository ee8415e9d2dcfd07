use jiff::civil::{Date, date, time};
use uci_core::models::cohort::DateRange;
use uci_core::models::instrument::InstrumentType;
use uci_core::models::patient::Patient;
use uci_core::models::selection::{SelectionValue, Selections};
use uci_engine::{EngineConfig, EngineError, LogProcedures, Sector, SubmitAssessment, WardEngine};
use uci_metrics::AggregationCohort;
use uci_storage::{AssessmentStore, MemoryStore, ProcedureFilter};
use uuid::Uuid;

const TODAY: Date = date(2024, 3, 10);

fn flags(codes: &[&str]) -> Selections {
    codes
        .iter()
        .map(|c| (c.to_string(), SelectionValue::Flag(true)))
        .collect()
}

async fn ward() -> (WardEngine<MemoryStore>, Vec<Patient>) {
    let config = EngineConfig {
        sectors: vec![
            Sector {
                name: "A".into(),
                first_bed: 1,
                last_bed: 4,
            },
            Sector {
                name: "B".into(),
                first_bed: 5,
                last_bed: 8,
            },
        ],
        ..EngineConfig::default()
    };
    let store = MemoryStore::new();
    let patients: Vec<Patient> = [2, 3, 6]
        .into_iter()
        .map(|bed| Patient {
            id: Uuid::new_v4(),
            admission_date: date(2024, 3, 1),
            discharge_date: None,
            bed_number: Some(bed),
        })
        .collect();
    for p in &patients {
        store.put_patient(p.clone()).await.unwrap();
    }
    (WardEngine::new(store, config).unwrap(), patients)
}

async fn submit_nas(engine: &WardEngine<MemoryStore>, patient: &Patient, day: Date, codes: &[&str]) {
    engine
        .submit_assessment(SubmitAssessment {
            subject_id: patient.id,
            instrument_type: InstrumentType::Nas,
            assessment_date: day,
            selections: flags(codes),
            author_id: "enf-01".into(),
            today: TODAY,
            submitted_at: jiff::Timestamp::UNIX_EPOCH,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_ward_has_zero_metrics() {
    let (engine, _) = ward().await;
    let result = engine
        .get_cohort_metrics(&AggregationCohort::new(InstrumentType::Apache2))
        .await
        .unwrap();
    assert_eq!(result.sample_size, 0);
    assert_eq!(result.mean(), 0.0);
    assert!(result.scales[0].distribution.iter().all(|b| b.percent == 0));
    assert_eq!(result.scales[0].distribution.len(), 7);
}

#[tokio::test]
async fn sector_metrics_cover_only_its_beds() {
    let (engine, patients) = ward().await;
    // 1a + 4a + 9 = 10.0; 1c + 4c + 7b = 19.6 + 20.0 + 32.0 = 71.6
    submit_nas(&engine, &patients[0], TODAY, &["1a", "4a", "9"]).await;
    submit_nas(&engine, &patients[1], TODAY, &["1c", "4c", "7b"]).await;
    submit_nas(&engine, &patients[2], TODAY, &["1a"]).await;

    let cohort = engine
        .sector_cohort(InstrumentType::Nas, "A", Some(DateRange::single(TODAY)))
        .unwrap();
    let result = engine.get_cohort_metrics(&cohort).await.unwrap();
    assert_eq!(result.sample_size, 2);
    assert_eq!(result.mean(), 40.8);
    let percents: Vec<u32> = result.scales[0]
        .distribution
        .iter()
        .map(|b| b.percent)
        .collect();
    assert_eq!(percents, vec![50, 50, 0, 0]);

    assert!(matches!(
        engine.sector_cohort(InstrumentType::Nas, "UCI-C", None),
        Err(EngineError::UnknownSector(name)) if name == "UCI-C"
    ));
}

#[tokio::test]
async fn trend_and_nursing_demand_read_committed_records() {
    let (engine, patients) = ward().await;
    submit_nas(&engine, &patients[0], date(2024, 3, 9), &["1a", "4a", "9"]).await;
    submit_nas(&engine, &patients[0], TODAY, &["1c", "4c"]).await;
    submit_nas(&engine, &patients[1], TODAY, &["1a", "4a", "9"]).await;

    let cohort = AggregationCohort::new(InstrumentType::Nas);
    let trend = engine.get_daily_trend(&cohort).await.unwrap();
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].mean, 10.0);
    assert_eq!(trend[1].sample_size, 2);

    let demand = engine.get_nursing_demand(&cohort).await.unwrap();
    assert_eq!(demand[1].patients, 2);
    assert!((demand[1].nurses_required - 0.496).abs() < 1e-9);

    assert!(matches!(
        engine
            .get_nursing_demand(&AggregationCohort::new(InstrumentType::Apache2))
            .await,
        Err(EngineError::Metrics(_))
    ));
}

#[tokio::test]
async fn throughput_splits_day_and_night() {
    let (engine, patients) = ward().await;
    for (hour, count) in [(9, 2), (14, 4), (22, 3)] {
        engine
            .log_procedures(LogProcedures {
                patient_id: Some(patients[0].id),
                date: TODAY,
                performed_at: time(hour, 0, 0, 0),
                procedures: [("aspiracion_secreciones".to_string(), count)].into(),
                author_id: "kine-02".into(),
                today: TODAY,
                submitted_at: jiff::Timestamp::UNIX_EPOCH,
            })
            .await
            .unwrap();
    }

    let throughput = engine
        .get_shift_throughput(&ProcedureFilter::default())
        .await
        .unwrap();
    assert_eq!(throughput.day.records, 2);
    assert_eq!(throughput.day.per_record, 3.0);
    assert_eq!(throughput.night.per_record, 3.0);

    let elsewhere = engine
        .get_shift_throughput(&ProcedureFilter {
            patient_id: Some(patients[2].id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(elsewhere.day.per_record, 0.0);
    assert_eq!(elsewhere.night.per_record, 0.0);
}
