use std::sync::LazyLock;

use uci_core::Points;
use uci_core::models::instrument::InstrumentType;

use crate::Instrument;
use crate::definition::{
    BandTable, ClassificationBand, CompletenessPolicy, InstrumentDefinition, ItemDefinition,
    ScoringModel,
};

/// NAS: Nursing Activities Score.
/// 23 activities, several split into mutually exclusive sub-items (1a/1b/1c,
/// 4, 6, 7, 8). The total is the share of one nurse's shift the patient
/// needs; it can exceed 100.
pub struct Nas;

impl Instrument for Nas {
    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Nas
    }

    fn name(&self) -> &str {
        "NAS"
    }

    fn definition(&self) -> &InstrumentDefinition {
        static DEFINITION: LazyLock<InstrumentDefinition> = LazyLock::new(|| {
            let grouped = [
                ("1", "1a", "Monitorización y balance horario", 45),
                ("1", "1b", "Presencia continua a pie de cama 2 h o más", 121),
                ("1", "1c", "Presencia continua a pie de cama 4 h o más", 196),
                ("4", "4a", "Higiene: procedimientos normales", 41),
                ("4", "4b", "Higiene: más de 2 h en algún turno", 165),
                ("4", "4c", "Higiene: más de 4 h en algún turno", 200),
                ("6", "6a", "Movilización hasta 3 veces en 24 h", 55),
                ("6", "6b", "Movilización más de 3 veces o con 2 enfermeras", 124),
                ("6", "6c", "Movilización con 3 o más enfermeras", 170),
                ("7", "7a", "Apoyo a familiares: 1 h en algún turno", 40),
                ("7", "7b", "Apoyo a familiares: 3 h o más en algún turno", 320),
                ("8", "8a", "Tareas administrativas rutinarias", 42),
                ("8", "8b", "Tareas administrativas: 2 h en algún turno", 232),
                ("8", "8c", "Tareas administrativas: 4 h en algún turno", 300),
            ];
            let single = [
                ("2", "Procedimientos de laboratorio", 43),
                ("3", "Medicación, excepto drogas vasoactivas", 56),
                ("5", "Cuidados de drenajes", 18),
                ("9", "Soporte respiratorio", 14),
                ("10", "Cuidados de vía aérea artificial", 18),
                ("11", "Tratamiento para mejorar la función pulmonar", 44),
                ("12", "Medicación vasoactiva", 12),
                ("13", "Reposición intravenosa de grandes pérdidas", 25),
                ("14", "Monitorización de aurícula izquierda", 17),
                ("15", "Reanimación cardiopulmonar en las últimas 24 h", 71),
                ("16", "Técnicas de hemofiltración o diálisis", 77),
                ("17", "Medición cuantitativa de diuresis", 70),
                ("18", "Medición de presión intracraneal", 16),
                ("19", "Tratamiento de acidosis o alcalosis metabólica", 13),
                ("20", "Hiperalimentación intravenosa", 28),
                ("21", "Alimentación enteral", 13),
                ("22", "Intervenciones específicas en la unidad", 28),
                ("23", "Intervenciones específicas fuera de la unidad", 19),
            ];

            let mut items: Vec<ItemDefinition> = grouped
                .iter()
                .map(|(group, code, label, tenths)| {
                    ItemDefinition::grouped(group, code, label, Points::from_tenths(*tenths))
                })
                .chain(single.iter().map(|(code, label, tenths)| {
                    ItemDefinition::weighted(code, label, Points::from_tenths(*tenths))
                }))
                .collect();
            items.sort_by_key(|item| nas_order(&item.code));

            InstrumentDefinition {
                instrument_type: InstrumentType::Nas,
                name: "NAS".to_string(),
                items,
                scoring: ScoringModel::Weighted {
                    bands: BandTable::new(vec![
                        ClassificationBand::new("Baja", 0, Points::ZERO, Some(Points::whole(50))),
                        ClassificationBand::new(
                            "Moderada",
                            1,
                            Points::from_tenths(501),
                            Some(Points::whole(80)),
                        ),
                        ClassificationBand::new(
                            "Alta",
                            2,
                            Points::from_tenths(801),
                            Some(Points::whole(100)),
                        ),
                        ClassificationBand::new("Muy Alta", 3, Points::from_tenths(1001), None),
                    ]),
                },
                completeness: CompletenessPolicy::AtLeastOne,
            }
        });
        &DEFINITION
    }
}

/// Sort key that keeps the printed form order: 1a, 1b, 1c, 2, 3, 4a, ...
fn nas_order(code: &str) -> (u32, String) {
    let digits: String = code.chars().take_while(char::is_ascii_digit).collect();
    let suffix: String = code.chars().skip(digits.len()).collect();
    (digits.parse().unwrap_or(u32::MAX), suffix)
}
