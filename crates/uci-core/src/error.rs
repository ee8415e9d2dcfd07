use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid score value: {0} (expected a non-negative multiple of 0.1)")]
    InvalidPoints(f64),

    #[error("unknown instrument type: {0}")]
    UnknownInstrumentType(String),

    #[error("invalid shift schedule: day shift from {start}:00 to {end}:00")]
    InvalidShiftSchedule { start: i8, end: i8 },

    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: jiff::civil::Date,
        end: jiff::civil::Date,
    },
}
