use std::sync::LazyLock;

use uci_core::Points;
use uci_core::models::instrument::InstrumentType;

use crate::Instrument;
use crate::definition::{
    AnswerRange, BandTable, ClassificationBand, CompletenessPolicy, InstrumentDefinition,
    ItemDefinition, Polarity, ScoringModel, SubscaleDefinition,
};

pub const EMOTIONAL_EXHAUSTION: &str = "ee";
pub const DEPERSONALIZATION: &str = "dp";
pub const PERSONAL_ACCOMPLISHMENT: &str = "pa";

/// MBI: Maslach Burnout Inventory, human services form.
/// 22 questions answered 0 (nunca) to 6 (todos los días). Three subscales:
/// emotional exhaustion, depersonalization and personal accomplishment.
///
/// Personal-accomplishment questions are reverse-keyed, so every subscale
/// total reads "higher = more burnout": the `pa` total is 48 minus the raw
/// accomplishment sum.
pub struct BurnoutMbi;

impl Instrument for BurnoutMbi {
    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::BurnoutMbi
    }

    fn name(&self) -> &str {
        "Maslach Burnout Inventory"
    }

    fn definition(&self) -> &InstrumentDefinition {
        static DEFINITION: LazyLock<InstrumentDefinition> = LazyLock::new(|| {
            use Polarity::{Direct, Inverse};

            let questions = [
                (EMOTIONAL_EXHAUSTION, Direct, "Me siento emocionalmente agotado por mi trabajo"),
                (EMOTIONAL_EXHAUSTION, Direct, "Me siento cansado al final de la jornada"),
                (EMOTIONAL_EXHAUSTION, Direct, "Me siento fatigado al levantarme para ir a trabajar"),
                (PERSONAL_ACCOMPLISHMENT, Inverse, "Comprendo fácilmente cómo se sienten los pacientes"),
                (DEPERSONALIZATION, Direct, "Trato a algunos pacientes como si fueran objetos"),
                (EMOTIONAL_EXHAUSTION, Direct, "Trabajar todo el día con personas me supone un esfuerzo"),
                (PERSONAL_ACCOMPLISHMENT, Inverse, "Resuelvo eficazmente los problemas de los pacientes"),
                (EMOTIONAL_EXHAUSTION, Direct, "Me siento quemado por mi trabajo"),
                (PERSONAL_ACCOMPLISHMENT, Inverse, "Con mi trabajo influyo positivamente en otras personas"),
                (DEPERSONALIZATION, Direct, "Me he vuelto más insensible con la gente"),
                (DEPERSONALIZATION, Direct, "Me preocupa que este trabajo me endurezca emocionalmente"),
                (PERSONAL_ACCOMPLISHMENT, Inverse, "Me siento con mucha energía"),
                (EMOTIONAL_EXHAUSTION, Direct, "Me siento frustrado en mi trabajo"),
                (EMOTIONAL_EXHAUSTION, Direct, "Siento que estoy trabajando demasiado"),
                (DEPERSONALIZATION, Direct, "No me importa lo que les ocurra a algunos pacientes"),
                (EMOTIONAL_EXHAUSTION, Direct, "Trabajar directamente con personas me produce estrés"),
                (PERSONAL_ACCOMPLISHMENT, Inverse, "Creo con facilidad un clima agradable con los pacientes"),
                (PERSONAL_ACCOMPLISHMENT, Inverse, "Me siento estimulado después de trabajar con pacientes"),
                (PERSONAL_ACCOMPLISHMENT, Inverse, "He conseguido muchas cosas útiles en mi profesión"),
                (EMOTIONAL_EXHAUSTION, Direct, "Me siento acabado"),
                (PERSONAL_ACCOMPLISHMENT, Inverse, "Trato los problemas emocionales con mucha calma"),
                (DEPERSONALIZATION, Direct, "Siento que los pacientes me culpan de sus problemas"),
            ];

            let items: Vec<ItemDefinition> = questions
                .iter()
                .enumerate()
                .map(|(i, (scale, polarity, label))| {
                    ItemDefinition::question(&format!("q{}", i + 1), label, scale, *polarity)
                })
                .collect();

            InstrumentDefinition {
                instrument_type: InstrumentType::BurnoutMbi,
                name: "Maslach Burnout Inventory".to_string(),
                completeness: CompletenessPolicy::ExactlyAnswered {
                    count: items.len(),
                    range: AnswerRange { min: 0, max: 6 },
                },
                items,
                scoring: ScoringModel::Subscales {
                    subscales: vec![
                        subscale(EMOTIONAL_EXHAUSTION, "Agotamiento emocional", 18, 26),
                        subscale(DEPERSONALIZATION, "Despersonalización", 5, 9),
                        subscale(
                            PERSONAL_ACCOMPLISHMENT,
                            "Falta de realización personal",
                            8,
                            14,
                        ),
                    ],
                },
            }
        });
        &DEFINITION
    }
}

/// bajo `[0, low_max]`, medio `(low_max, mid_max]`, alto above.
fn subscale(id: &str, name: &str, low_max: u32, mid_max: u32) -> SubscaleDefinition {
    let fraction = Points::from_tenths(9);
    SubscaleDefinition {
        id: id.to_string(),
        name: name.to_string(),
        bands: BandTable::new(vec![
            ClassificationBand::new("bajo", 0, Points::ZERO, Some(Points::whole(low_max) + fraction)),
            ClassificationBand::new(
                "medio",
                1,
                Points::whole(low_max + 1),
                Some(Points::whole(mid_max) + fraction),
            ),
            ClassificationBand::new("alto", 2, Points::whole(mid_max + 1), None),
        ]),
    }
}
