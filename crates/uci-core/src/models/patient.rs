use jiff::ToSpan;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// The slice of a patient record the scoring engine consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Patient {
    pub id: Uuid,
    pub admission_date: Date,
    #[serde(default)]
    pub discharge_date: Option<Date>,
    #[serde(default)]
    pub bed_number: Option<u32>,
}

impl Patient {
    pub fn is_discharged(&self) -> bool {
        self.discharge_date.is_some()
    }
}

/// How long after discharge records may still be dated.
///
/// The window ends `days` calendar days after the discharge date; when
/// `inclusive` is false that last day itself is excluded. `{ days: 0,
/// inclusive: true }` allows nothing past the discharge date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DischargeGrace {
    pub days: u16,
    pub inclusive: bool,
}

impl DischargeGrace {
    pub const NONE: DischargeGrace = DischargeGrace {
        days: 0,
        inclusive: true,
    };

    /// Latest date a record may carry for a patient discharged on `discharge`.
    pub fn latest_admitted(&self, discharge: Date) -> Date {
        let bound = discharge
            .checked_add(i64::from(self.days).days())
            .unwrap_or(Date::MAX);
        if self.inclusive {
            bound
        } else {
            bound.yesterday().unwrap_or(Date::MIN)
        }
    }

    pub fn admits(&self, discharge: Date, date: Date) -> bool {
        date <= self.latest_admitted(discharge)
    }
}

impl Default for DischargeGrace {
    fn default() -> Self {
        DischargeGrace::NONE
    }
}
