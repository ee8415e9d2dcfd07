//! uci-storage
//!
//! Persistence of committed assessments, patients and procedure logs.
//! The engine talks to a store only through [`AssessmentStore`]; the one
//! write it relies on for correctness is the atomic
//! [`AssessmentStore::insert_assessment_if_absent`].

pub mod error;
pub mod file;
pub mod filter;
pub mod ledger;
pub mod memory;
pub mod state;
pub mod store;

pub use file::JsonFileStore;
pub use filter::{AssessmentFilter, ProcedureFilter};
pub use memory::MemoryStore;
pub use store::{AssessmentStore, InsertOutcome};
