//! uci-engine
//!
//! Write and query facade for the ward: runs selections through the
//! instrument catalog, enforces the per-day uniqueness and date window
//! rules on commit, and feeds stored records to the dashboard metrics.

pub mod audit;
pub mod config;
pub mod error;
pub mod guard;
pub mod service;
pub mod telemetry;

pub use config::{EngineConfig, Sector};
pub use error::{DateBound, EngineError, GuardError, SubmitError};
pub use service::{LogProcedures, ProcedureReceipt, SubmitAssessment, SubmitReceipt, WardEngine};
