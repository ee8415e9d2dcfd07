use std::sync::LazyLock;

use uci_core::Points;
use uci_core::models::instrument::InstrumentType;

use crate::Instrument;
use crate::definition::{
    BandTable, ClassificationBand, CompletenessPolicy, InstrumentDefinition, ItemDefinition,
    ScoringModel,
};

/// Kinesiology complexity categorization.
/// Grades how demanding a patient is for the respiratory and motor
/// kinesiology team; drives therapist allocation per sector.
pub struct KinesioCategorization;

impl Instrument for KinesioCategorization {
    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::KinesioCategorization
    }

    fn name(&self) -> &str {
        "Categorización kinésica"
    }

    fn definition(&self) -> &InstrumentDefinition {
        static DEFINITION: LazyLock<InstrumentDefinition> = LazyLock::new(|| {
            let grouped = [
                ("ventilacion", "vmi", "Ventilación mecánica invasiva", 4),
                ("ventilacion", "vmni", "Ventilación mecánica no invasiva", 3),
                ("ventilacion", "cnaf", "Cánula nasal de alto flujo", 2),
                ("ventilacion", "o2_convencional", "Oxigenoterapia convencional", 1),
                ("ventilacion", "aire_ambiente", "Respira aire ambiente", 0),
                ("via_aerea", "tot", "Tubo orotraqueal", 2),
                ("via_aerea", "tqt", "Traqueostomía", 2),
                ("via_aerea", "via_aerea_natural", "Vía aérea natural", 0),
                ("secreciones", "secreciones_abundantes", "Secreciones abundantes", 3),
                ("secreciones", "secreciones_moderadas", "Secreciones moderadas", 2),
                ("secreciones", "secreciones_escasas", "Secreciones escasas", 1),
                ("secreciones", "sin_secreciones", "Sin secreciones", 0),
                ("movilidad", "postrado", "Postrado en cama", 3),
                ("movilidad", "sedente", "Logra sedente", 2),
                ("movilidad", "bipedo", "Logra bipedestación", 1),
                ("movilidad", "marcha", "Marcha independiente", 0),
                ("conciencia", "sedado", "Sedado", 2),
                ("conciencia", "desorientado", "Vigil, desorientado o agitado", 1),
                ("conciencia", "alerta", "Vigil y cooperador", 0),
            ];
            let additional = [
                ("prono", "Posición prono", 3),
                ("destete", "Destete ventilatorio en curso", 2),
                ("drenaje_pleural", "Drenaje pleural", 1),
                ("postoperatorio", "Postoperatorio torácico o abdominal alto", 1),
                ("obesidad", "Obesidad mórbida", 1),
            ];

            let items = grouped
                .iter()
                .map(|(group, code, label, points)| {
                    ItemDefinition::grouped(group, code, label, Points::whole(*points))
                })
                .chain(additional.iter().map(|(code, label, points)| {
                    ItemDefinition::weighted(code, label, Points::whole(*points))
                }))
                .collect();

            InstrumentDefinition {
                instrument_type: InstrumentType::KinesioCategorization,
                name: "Categorización kinésica".to_string(),
                items,
                scoring: ScoringModel::Weighted {
                    bands: BandTable::new(vec![
                        ClassificationBand::new(
                            "Baja complejidad",
                            0,
                            Points::ZERO,
                            Some(Points::from_tenths(59)),
                        ),
                        ClassificationBand::new(
                            "Mediana complejidad",
                            1,
                            Points::whole(6),
                            Some(Points::from_tenths(119)),
                        ),
                        ClassificationBand::new("Alta complejidad", 2, Points::whole(12), None),
                    ]),
                },
                completeness: CompletenessPolicy::AtLeastOne,
            }
        });
        &DEFINITION
    }
}
