use std::sync::LazyLock;

use uci_core::Points;
use uci_core::models::instrument::InstrumentType;

use crate::Instrument;
use crate::definition::{
    BandTable, ClassificationBand, CompletenessPolicy, InstrumentDefinition, ItemDefinition,
    ScoringModel,
};

/// APACHE II: Acute Physiology and Chronic Health Evaluation II.
/// Twelve physiological variables (worst value in the first 24 h), age
/// points and chronic health points. Each variable is one exclusivity
/// group of range buckets, so only one bucket per variable can be chosen.
pub struct Apache2;

type Bucket = (&'static str, &'static str, u32);

const TEMPERATURE: &[Bucket] = &[
    ("temp_ge41", "≥ 41 °C", 4),
    ("temp_39_409", "39 – 40,9 °C", 3),
    ("temp_385_389", "38,5 – 38,9 °C", 1),
    ("temp_36_384", "36 – 38,4 °C", 0),
    ("temp_34_359", "34 – 35,9 °C", 1),
    ("temp_32_339", "32 – 33,9 °C", 2),
    ("temp_30_319", "30 – 31,9 °C", 3),
    ("temp_le299", "≤ 29,9 °C", 4),
];

const MEAN_ARTERIAL_PRESSURE: &[Bucket] = &[
    ("map_ge160", "≥ 160 mmHg", 4),
    ("map_130_159", "130 – 159 mmHg", 3),
    ("map_110_129", "110 – 129 mmHg", 2),
    ("map_70_109", "70 – 109 mmHg", 0),
    ("map_50_69", "50 – 69 mmHg", 2),
    ("map_le49", "≤ 49 mmHg", 4),
];

const HEART_RATE: &[Bucket] = &[
    ("hr_ge180", "≥ 180 lpm", 4),
    ("hr_140_179", "140 – 179 lpm", 3),
    ("hr_110_139", "110 – 139 lpm", 2),
    ("hr_70_109", "70 – 109 lpm", 0),
    ("hr_55_69", "55 – 69 lpm", 2),
    ("hr_40_54", "40 – 54 lpm", 3),
    ("hr_le39", "≤ 39 lpm", 4),
];

const RESPIRATORY_RATE: &[Bucket] = &[
    ("rr_ge50", "≥ 50 rpm", 4),
    ("rr_35_49", "35 – 49 rpm", 3),
    ("rr_25_34", "25 – 34 rpm", 1),
    ("rr_12_24", "12 – 24 rpm", 0),
    ("rr_10_11", "10 – 11 rpm", 1),
    ("rr_6_9", "6 – 9 rpm", 2),
    ("rr_le5", "≤ 5 rpm", 4),
];

/// A-aDO2 when FiO2 ≥ 0,5, PaO2 otherwise.
const OXYGENATION: &[Bucket] = &[
    ("aado2_ge500", "FiO2 ≥ 0,5: A-aDO2 ≥ 500", 4),
    ("aado2_350_499", "FiO2 ≥ 0,5: A-aDO2 350 – 499", 3),
    ("aado2_200_349", "FiO2 ≥ 0,5: A-aDO2 200 – 349", 2),
    ("aado2_lt200", "FiO2 ≥ 0,5: A-aDO2 < 200", 0),
    ("pao2_gt70", "FiO2 < 0,5: PaO2 > 70", 0),
    ("pao2_61_70", "FiO2 < 0,5: PaO2 61 – 70", 1),
    ("pao2_55_60", "FiO2 < 0,5: PaO2 55 – 60", 3),
    ("pao2_lt55", "FiO2 < 0,5: PaO2 < 55", 4),
];

const ARTERIAL_PH: &[Bucket] = &[
    ("ph_ge77", "≥ 7,7", 4),
    ("ph_76_769", "7,6 – 7,69", 3),
    ("ph_75_759", "7,5 – 7,59", 1),
    ("ph_733_749", "7,33 – 7,49", 0),
    ("ph_725_732", "7,25 – 7,32", 2),
    ("ph_715_724", "7,15 – 7,24", 3),
    ("ph_lt715", "< 7,15", 4),
];

const SODIUM: &[Bucket] = &[
    ("na_ge180", "≥ 180 mEq/L", 4),
    ("na_160_179", "160 – 179 mEq/L", 3),
    ("na_155_159", "155 – 159 mEq/L", 2),
    ("na_150_154", "150 – 154 mEq/L", 1),
    ("na_130_149", "130 – 149 mEq/L", 0),
    ("na_120_129", "120 – 129 mEq/L", 2),
    ("na_111_119", "111 – 119 mEq/L", 3),
    ("na_le110", "≤ 110 mEq/L", 4),
];

const POTASSIUM: &[Bucket] = &[
    ("k_ge7", "≥ 7 mEq/L", 4),
    ("k_6_69", "6 – 6,9 mEq/L", 3),
    ("k_55_59", "5,5 – 5,9 mEq/L", 1),
    ("k_35_54", "3,5 – 5,4 mEq/L", 0),
    ("k_3_34", "3 – 3,4 mEq/L", 1),
    ("k_25_29", "2,5 – 2,9 mEq/L", 2),
    ("k_lt25", "< 2,5 mEq/L", 4),
];

/// Points double with acute renal failure, so those buckets are listed
/// separately in the same group.
const CREATININE: &[Bucket] = &[
    ("creat_ge35", "≥ 3,5 mg/dL", 4),
    ("creat_2_34", "2 – 3,4 mg/dL", 3),
    ("creat_15_19", "1,5 – 1,9 mg/dL", 2),
    ("creat_06_14", "0,6 – 1,4 mg/dL", 0),
    ("creat_lt06", "< 0,6 mg/dL", 2),
    ("creat_ge35_arf", "≥ 3,5 mg/dL con falla renal aguda", 8),
    ("creat_2_34_arf", "2 – 3,4 mg/dL con falla renal aguda", 6),
    ("creat_15_19_arf", "1,5 – 1,9 mg/dL con falla renal aguda", 4),
];

const HEMATOCRIT: &[Bucket] = &[
    ("hct_ge60", "≥ 60 %", 4),
    ("hct_50_599", "50 – 59,9 %", 2),
    ("hct_46_499", "46 – 49,9 %", 1),
    ("hct_30_459", "30 – 45,9 %", 0),
    ("hct_20_299", "20 – 29,9 %", 2),
    ("hct_lt20", "< 20 %", 4),
];

const WHITE_BLOOD_CELLS: &[Bucket] = &[
    ("wbc_ge40", "≥ 40 x10³/mm³", 4),
    ("wbc_20_399", "20 – 39,9 x10³/mm³", 2),
    ("wbc_15_199", "15 – 19,9 x10³/mm³", 1),
    ("wbc_3_149", "3 – 14,9 x10³/mm³", 0),
    ("wbc_1_29", "1 – 2,9 x10³/mm³", 2),
    ("wbc_lt1", "< 1 x10³/mm³", 4),
];

const AGE: &[Bucket] = &[
    ("age_le44", "≤ 44 años", 0),
    ("age_45_54", "45 – 54 años", 2),
    ("age_55_64", "55 – 64 años", 3),
    ("age_65_74", "65 – 74 años", 5),
    ("age_ge75", "≥ 75 años", 6),
];

const CHRONIC_HEALTH: &[Bucket] = &[
    ("chronic_none", "Sin insuficiencia orgánica crónica", 0),
    ("chronic_elective_postop", "Insuficiencia crónica, postoperatorio electivo", 2),
    ("chronic_nonop_or_emergency", "Insuficiencia crónica, no quirúrgico o cirugía de urgencia", 5),
];

impl Instrument for Apache2 {
    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Apache2
    }

    fn name(&self) -> &str {
        "APACHE II"
    }

    fn definition(&self) -> &InstrumentDefinition {
        static DEFINITION: LazyLock<InstrumentDefinition> = LazyLock::new(|| {
            let groups: [(&str, &[Bucket]); 13] = [
                ("temperature", TEMPERATURE),
                ("mean_arterial_pressure", MEAN_ARTERIAL_PRESSURE),
                ("heart_rate", HEART_RATE),
                ("respiratory_rate", RESPIRATORY_RATE),
                ("oxygenation", OXYGENATION),
                ("arterial_ph", ARTERIAL_PH),
                ("sodium", SODIUM),
                ("potassium", POTASSIUM),
                ("creatinine", CREATININE),
                ("hematocrit", HEMATOCRIT),
                ("white_blood_cells", WHITE_BLOOD_CELLS),
                ("age", AGE),
                ("chronic_health", CHRONIC_HEALTH),
            ];

            let mut items: Vec<ItemDefinition> = groups
                .iter()
                .flat_map(|(group, buckets)| {
                    buckets.iter().map(move |(code, label, points)| {
                        ItemDefinition::grouped(group, code, label, Points::whole(*points))
                    })
                })
                .collect();

            // Glasgow Coma Scale contributes 15 - GCS.
            items.extend((3..=15u32).rev().map(|gcs| {
                ItemDefinition::grouped(
                    "glasgow",
                    &format!("gcs_{gcs}"),
                    &format!("Glasgow {gcs}"),
                    Points::whole(15 - gcs),
                )
            }));

            InstrumentDefinition {
                instrument_type: InstrumentType::Apache2,
                name: "APACHE II".to_string(),
                items,
                scoring: ScoringModel::Weighted {
                    bands: BandTable::new(vec![
                        band("Mortalidad estimada ~4%", 0, 0, Some(4)),
                        band("Mortalidad estimada ~8%", 1, 5, Some(9)),
                        band("Mortalidad estimada ~15%", 2, 10, Some(14)),
                        band("Mortalidad estimada ~25%", 3, 15, Some(19)),
                        band("Mortalidad estimada ~40%", 4, 20, Some(24)),
                        band("Mortalidad estimada ~55%", 5, 25, Some(29)),
                        band("Mortalidad estimada ≥75%", 6, 30, None),
                    ]),
                },
                completeness: CompletenessPolicy::AtLeastOne,
            }
        });
        &DEFINITION
    }
}

/// Integer-point band: `[lower, upper + 0.9]`, so a fractional score can
/// never fall between two bands.
fn band(label: &str, rank: u8, lower: u32, upper: Option<u32>) -> ClassificationBand {
    ClassificationBand::new(
        label,
        rank,
        Points::whole(lower),
        upper.map(|u| Points::whole(u) + Points::from_tenths(9)),
    )
}
