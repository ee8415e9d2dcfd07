pub mod assessment;
pub mod cohort;
pub mod instrument;
pub mod patient;
pub mod procedure;
pub mod score;
pub mod selection;
