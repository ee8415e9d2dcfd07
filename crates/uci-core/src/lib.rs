//! uci-core
//!
//! Pure domain types for the ICU ward dashboard: instruments, scores,
//! assessments, patients, procedure records and cohort filters.
//! No catalog or storage logic: this is the shared vocabulary of the
//! workspace.

pub mod error;
pub mod models;
pub mod points;

pub use points::Points;
