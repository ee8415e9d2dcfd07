use std::collections::BTreeSet;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidDateRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    pub fn single(date: Date) -> Self {
        DateRange {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The beds a dashboard query covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum BedSelection {
    /// Inclusive bed-number range, e.g. a sector.
    Range { from: u32, to: u32 },
    Set { beds: BTreeSet<u32> },
}

impl BedSelection {
    pub fn contains(&self, bed: u32) -> bool {
        match self {
            BedSelection::Range { from, to } => *from <= bed && bed <= *to,
            BedSelection::Set { beds } => beds.contains(&bed),
        }
    }

    /// Records with no bed never match a bed-restricted selection.
    pub fn matches(&self, bed: Option<u32>) -> bool {
        bed.is_some_and(|b| self.contains(b))
    }
}
