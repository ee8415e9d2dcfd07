use std::collections::{BTreeMap, BTreeSet};

use jiff::civil::{Date, date};
use uci_core::Points;
use uci_core::models::assessment::Assessment;
use uci_core::models::cohort::{BedSelection, DateRange};
use uci_core::models::instrument::InstrumentType;
use uci_core::models::procedure::{ProcedureRecord, Shift};
use uci_core::models::score::{BandLabel, Classification, ScoreResult, SubscaleTotal};
use uci_core::models::selection::Selections;
use uci_instruments::Catalog;
use uci_instruments::definition::InstrumentDefinition;
use uci_instruments::instruments::mbi;
use uci_metrics::aggregate::largest_remainder_percents;
use uci_metrics::error::MetricsError;
use uci_metrics::{
    AggregationCohort, aggregate, daily_trend, nursing_demand, shift_throughput,
};
use uuid::Uuid;

fn definition(instrument: InstrumentType) -> &'static InstrumentDefinition {
    Catalog::builtin().unwrap().get(instrument).unwrap()
}

fn record(instrument: InstrumentType, day: Date, bed: Option<u32>, score: ScoreResult) -> Assessment {
    Assessment {
        id: Uuid::new_v4(),
        subject_id: Uuid::new_v4(),
        instrument_type: instrument,
        assessment_date: day,
        bed_number: bed,
        selections: Selections::new(),
        computed_total: score,
        // aggregation re-classifies from the score
        classification: Classification::Band {
            band: BandLabel {
                label: String::new(),
                rank: 0,
            },
        },
        author_id: "enf-01".into(),
        created_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

fn nas(day: Date, bed: Option<u32>, tenths: u32) -> Assessment {
    record(
        InstrumentType::Nas,
        day,
        bed,
        ScoreResult::Total {
            total: Points::from_tenths(tenths),
        },
    )
}

#[test]
fn empty_cohort_reports_zeros() {
    let cohort = AggregationCohort::new(InstrumentType::Nas);
    let result = aggregate(definition(InstrumentType::Nas), &[], &cohort).unwrap();

    assert_eq!(result.sample_size, 0);
    assert_eq!(result.mean(), 0.0);
    let total = result.scale("total").unwrap();
    assert_eq!(total.min, None);
    assert_eq!(total.distribution.len(), 4);
    assert!(total.distribution.iter().all(|b| b.count == 0 && b.percent == 0));
}

#[test]
fn distribution_sums_to_exactly_100() {
    let day = date(2024, 3, 1);
    let records = vec![nas(day, Some(1), 100), nas(day, Some(2), 600), nas(day, Some(3), 850)];
    let cohort = AggregationCohort::new(InstrumentType::Nas);
    let result = aggregate(definition(InstrumentType::Nas), &records, &cohort).unwrap();

    assert_eq!(result.sample_size, 3);
    assert!((result.mean() - 51.666_666).abs() < 1e-5);

    let total = result.scale("total").unwrap();
    assert_eq!(total.min, Some(Points::whole(10)));
    assert_eq!(total.max, Some(Points::whole(85)));
    let percents: Vec<u32> = total.distribution.iter().map(|b| b.percent).collect();
    assert_eq!(percents, vec![34, 33, 33, 0]);
    assert_eq!(percents.iter().sum::<u32>(), 100);
}

#[test]
fn largest_remainder_goes_to_largest_fraction_then_earlier_band() {
    assert_eq!(largest_remainder_percents(&[1, 2]), vec![33, 67]);
    assert_eq!(largest_remainder_percents(&[1, 1, 1]), vec![34, 33, 33]);
    assert_eq!(largest_remainder_percents(&[0, 5, 0]), vec![0, 100, 0]);
    assert_eq!(largest_remainder_percents(&[0, 0]), vec![0, 0]);

    let skewed = largest_remainder_percents(&[1, 1, 1, 1, 1, 1, 1]);
    assert_eq!(skewed.iter().sum::<u32>(), 100);
}

#[test]
fn result_does_not_depend_on_record_order() {
    let day = date(2024, 3, 1);
    let mut records: Vec<Assessment> = (0..9)
        .map(|i| nas(day, Some(i), 123 + i * 111))
        .collect();
    let cohort = AggregationCohort::new(InstrumentType::Nas);
    let forward = aggregate(definition(InstrumentType::Nas), &records, &cohort).unwrap();
    records.reverse();
    let backward = aggregate(definition(InstrumentType::Nas), &records, &cohort).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn cohort_filters_beds_and_dates() {
    let records = vec![
        nas(date(2024, 3, 1), Some(1), 100),
        nas(date(2024, 3, 1), Some(5), 200),
        nas(date(2024, 3, 2), Some(2), 300),
        nas(date(2024, 3, 9), Some(2), 400),
        nas(date(2024, 3, 2), None, 500),
    ];

    let sector = AggregationCohort::new(InstrumentType::Nas)
        .with_beds(BedSelection::Range { from: 1, to: 3 });
    let result = aggregate(definition(InstrumentType::Nas), &records, &sector).unwrap();
    assert_eq!(result.sample_size, 3);

    let week = sector.with_dates(DateRange::new(date(2024, 3, 1), date(2024, 3, 7)).unwrap());
    let result = aggregate(definition(InstrumentType::Nas), &records, &week).unwrap();
    assert_eq!(result.sample_size, 2);
    assert_eq!(result.mean(), 20.0);

    let beds = AggregationCohort::new(InstrumentType::Nas).with_beds(BedSelection::Set {
        beds: BTreeSet::from([5]),
    });
    let result = aggregate(definition(InstrumentType::Nas), &records, &beds).unwrap();
    assert_eq!(result.sample_size, 1);
}

#[test]
fn other_instruments_are_not_in_the_cohort() {
    let day = date(2024, 3, 1);
    let records = vec![
        nas(day, Some(1), 100),
        record(
            InstrumentType::Apache2,
            day,
            Some(1),
            ScoreResult::Total {
                total: Points::whole(12),
            },
        ),
    ];
    let cohort = AggregationCohort::new(InstrumentType::Nas);
    let result = aggregate(definition(InstrumentType::Nas), &records, &cohort).unwrap();
    assert_eq!(result.sample_size, 1);
}

#[test]
fn cohort_and_definition_must_agree() {
    let cohort = AggregationCohort::new(InstrumentType::Apache2);
    assert!(matches!(
        aggregate(definition(InstrumentType::Nas), &[], &cohort),
        Err(MetricsError::InstrumentMismatch { .. })
    ));
}

#[test]
fn burnout_reports_each_subscale() {
    let subscales = |ee: u32, dp: u32, pa: u32| ScoreResult::Subscales {
        subscales: [
            (mbi::EMOTIONAL_EXHAUSTION, ee),
            (mbi::DEPERSONALIZATION, dp),
            (mbi::PERSONAL_ACCOMPLISHMENT, pa),
        ]
        .into_iter()
        .map(|(s, t)| SubscaleTotal {
            subscale: s.to_string(),
            total: Points::whole(t),
        })
        .collect(),
    };
    let day = date(2024, 3, 1);
    let records = vec![
        record(InstrumentType::BurnoutMbi, day, None, subscales(30, 2, 10)),
        record(InstrumentType::BurnoutMbi, day, None, subscales(20, 4, 10)),
    ];
    let cohort = AggregationCohort::new(InstrumentType::BurnoutMbi);
    let result = aggregate(definition(InstrumentType::BurnoutMbi), &records, &cohort).unwrap();

    let ids: Vec<&str> = result.scales.iter().map(|s| s.scale.as_str()).collect();
    assert_eq!(ids, vec!["ee", "dp", "pa"]);

    let ee = result.scale("ee").unwrap();
    assert_eq!(ee.mean, 25.0);
    let ee_counts: Vec<usize> = ee.distribution.iter().map(|b| b.count).collect();
    assert_eq!(ee_counts, vec![0, 1, 1]);

    let pa = result.scale("pa").unwrap();
    assert_eq!(pa.distribution[1].label, "medio");
    assert_eq!(pa.distribution[1].percent, 100);
}

#[test]
fn score_with_wrong_shape_is_reported() {
    let day = date(2024, 3, 1);
    let broken = nas(day, None, 10);
    let mut as_mbi = broken.clone();
    as_mbi.instrument_type = InstrumentType::BurnoutMbi;
    let cohort = AggregationCohort::new(InstrumentType::BurnoutMbi);
    let err = aggregate(definition(InstrumentType::BurnoutMbi), &[as_mbi], &cohort).unwrap_err();
    assert!(matches!(err, MetricsError::CorruptRecord(id) if id == broken.id));
}

#[test]
fn daily_trend_is_sorted_by_date() {
    let records = vec![
        nas(date(2024, 3, 3), Some(1), 400),
        nas(date(2024, 3, 1), Some(1), 100),
        nas(date(2024, 3, 1), Some(2), 300),
    ];
    let trend = daily_trend(&records, &AggregationCohort::new(InstrumentType::Nas)).unwrap();
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].date, date(2024, 3, 1));
    assert_eq!(trend[0].sample_size, 2);
    assert_eq!(trend[0].mean, 20.0);
    assert_eq!(trend[1].date, date(2024, 3, 3));
    assert_eq!(trend[1].mean, 40.0);
}

#[test]
fn nursing_demand_counts_nurses_per_day() {
    let day = date(2024, 3, 1);
    let records = vec![nas(day, Some(1), 600), nas(day, Some(2), 705)];
    let demand = nursing_demand(&records, &AggregationCohort::new(InstrumentType::Nas)).unwrap();
    assert_eq!(demand.len(), 1);
    assert_eq!(demand[0].patients, 2);
    assert_eq!(demand[0].total, Points::from_tenths(1305));
    assert!((demand[0].nurses_required - 1.305).abs() < 1e-9);

    assert!(matches!(
        nursing_demand(&records, &AggregationCohort::new(InstrumentType::Apache2)),
        Err(MetricsError::UnsupportedInstrument(InstrumentType::Apache2))
    ));
}

fn procedures(shift: Shift, counts: &[(&str, u32)]) -> ProcedureRecord {
    ProcedureRecord {
        id: Uuid::new_v4(),
        patient_id: Some(Uuid::new_v4()),
        bed_number: Some(1),
        date: date(2024, 3, 1),
        shift,
        procedures: counts
            .iter()
            .map(|(c, n)| (c.to_string(), *n))
            .collect::<BTreeMap<_, _>>(),
        author_id: "kine-02".into(),
        created_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

#[test]
fn empty_shift_has_zero_throughput() {
    let records = vec![
        procedures(Shift::Day, &[("aspiracion_secreciones", 2), ("kinesioterapia_motora", 1)]),
        procedures(Shift::Day, &[("aspiracion_secreciones", 5)]),
    ];
    let throughput = shift_throughput(&records);

    assert_eq!(throughput.day.records, 2);
    assert_eq!(throughput.day.procedures, 8);
    assert_eq!(throughput.day.per_record, 4.0);
    assert_eq!(throughput.day.by_code["aspiracion_secreciones"], 7);

    assert_eq!(throughput.night.records, 0);
    assert_eq!(throughput.night.per_record, 0.0);
    assert!(throughput.night.by_code.is_empty());
}
