use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Shift {
    Day,
    Night,
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Day => f.write_str("Day"),
            Shift::Night => f.write_str("Night"),
        }
    }
}

/// Day shift runs from `day_start_hour` (inclusive) to `day_end_hour`
/// (exclusive); everything else is night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShiftSchedule {
    pub day_start_hour: i8,
    pub day_end_hour: i8,
}

impl ShiftSchedule {
    pub fn validate(&self) -> Result<(), CoreError> {
        let valid = (0..24).contains(&self.day_start_hour)
            && (1..=24).contains(&self.day_end_hour)
            && self.day_start_hour < self.day_end_hour;
        if valid {
            Ok(())
        } else {
            Err(CoreError::InvalidShiftSchedule {
                start: self.day_start_hour,
                end: self.day_end_hour,
            })
        }
    }

    pub fn shift_at(&self, time: jiff::civil::Time) -> Shift {
        let hour = time.hour();
        if hour >= self.day_start_hour && hour < self.day_end_hour {
            Shift::Day
        } else {
            Shift::Night
        }
    }
}

impl Default for ShiftSchedule {
    fn default() -> Self {
        ShiftSchedule {
            day_start_hour: 8,
            day_end_hour: 20,
        }
    }
}

/// Kinesiology procedures performed during one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProcedureRecord {
    pub id: Uuid,
    /// Absent for unit-level activities not tied to a patient.
    pub patient_id: Option<Uuid>,
    pub bed_number: Option<u32>,
    pub date: jiff::civil::Date,
    pub shift: Shift,
    /// Procedure code → number of times performed.
    pub procedures: BTreeMap<String, u32>,
    pub author_id: String,
    pub created_at: jiff::Timestamp,
}

impl ProcedureRecord {
    pub fn total_count(&self) -> u64 {
        self.procedures.values().map(|&n| u64::from(n)).sum()
    }
}
