//! Kinesiology procedure catalog.
//!
//! Procedures are logged per shift rather than scored. Most are performed
//! on a patient; a few are unit-level activities with no patient attached.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::definition::ItemDefinition;
use crate::error::{ValidationError, Violation};

static PROCEDURES: LazyLock<Vec<ItemDefinition>> = LazyLock::new(|| {
    [
        ("kinesioterapia_respiratoria", "Kinesioterapia respiratoria", true),
        ("kinesioterapia_motora", "Kinesioterapia motora", true),
        ("aspiracion_secreciones", "Aspiración de secreciones", true),
        ("maniobra_prono", "Maniobra de posición prono", true),
        ("apoyo_destete", "Apoyo en destete ventilatorio", true),
        ("instalacion_vmni", "Instalación de VMNI", true),
        ("extubacion", "Extubación", true),
        ("educacion_familia", "Educación a familiares", true),
        ("chequeo_equipos", "Chequeo de equipos de ventilación", false),
        ("capacitacion_equipo", "Capacitación al equipo de la unidad", false),
        ("reunion_clinica", "Reunión clínica", false),
    ]
    .into_iter()
    .map(|(code, label, patient)| ItemDefinition::procedure(code, label, patient))
    .collect()
});

pub fn procedure_catalog() -> &'static [ItemDefinition] {
    &PROCEDURES
}

pub fn procedure(code: &str) -> Option<&'static ItemDefinition> {
    PROCEDURES.iter().find(|p| p.code == code)
}

/// Check a shift's procedure counts. Patient-bound procedures need a
/// patient; unit activities must not carry one. All violations are
/// returned together.
pub fn validate_procedures(
    procedures: &BTreeMap<String, u32>,
    has_patient: bool,
) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if procedures.is_empty() {
        violations.push(Violation::EmptySelection);
    }

    for (code, &count) in procedures {
        let Some(definition) = procedure(code) else {
            violations.push(Violation::UnknownItem { code: code.clone() });
            continue;
        };
        if count == 0 {
            violations.push(Violation::ZeroCount { code: code.clone() });
        }
        match (definition.requires_patient_context, has_patient) {
            (true, false) => violations.push(Violation::MissingPatientContext { code: code.clone() }),
            (false, true) => {
                violations.push(Violation::UnexpectedPatientContext { code: code.clone() })
            }
            _ => {}
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            instrument_type: None,
            violations,
        })
    }
}
