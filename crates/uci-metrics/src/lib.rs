//! uci-metrics
//!
//! Dashboard statistics over committed assessments and procedure logs.
//! Every function here is pure: the caller fetches records, these
//! functions filter and summarize them. Results never depend on the order
//! records are supplied in.

pub mod aggregate;
pub mod cohort;
pub mod error;
pub mod throughput;
pub mod trend;

pub use aggregate::{AggregationResult, BandShare, ScaleSummary, aggregate};
pub use cohort::AggregationCohort;
pub use throughput::{ShiftRate, ShiftThroughput, shift_throughput};
pub use trend::{DailyDemand, DailyMean, daily_trend, nursing_demand};
