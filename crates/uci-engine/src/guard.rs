use jiff::civil::Date;
use uci_core::models::assessment::Assessment;
use uci_core::models::patient::{DischargeGrace, Patient};

use crate::error::{DateBound, GuardError};

/// Check that `date` may carry a record.
///
/// `today` is supplied by the caller; the engine never reads the clock.
/// Without a patient (staff questionnaires, unit-level procedures) only the
/// `today` bound applies. Bounds are checked in order today, admission,
/// discharge, and the first one crossed is reported.
pub fn check_date(
    date: Date,
    today: Date,
    patient: Option<&Patient>,
    grace: DischargeGrace,
) -> Result<(), GuardError> {
    let out_of_range = |bound| Err(GuardError::DateOutOfRange { date, bound });

    if date > today {
        return out_of_range(DateBound::Today(today));
    }
    let Some(patient) = patient else {
        return Ok(());
    };
    if date < patient.admission_date {
        return out_of_range(DateBound::Admission(patient.admission_date));
    }
    if let Some(discharge) = patient.discharge_date
        && !grace.admits(discharge, date)
    {
        return out_of_range(DateBound::Discharge(grace.latest_admitted(discharge)));
    }
    Ok(())
}

/// The error a losing create attempt surfaces.
pub fn duplicate_of(existing: &Assessment) -> GuardError {
    GuardError::DuplicateAssessment {
        existing_date: existing.assessment_date,
        existing_id: existing.id,
    }
}
