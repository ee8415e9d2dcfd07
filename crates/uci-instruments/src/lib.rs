//! uci-instruments
//!
//! Instrument definitions and the scoring pipeline. Pure data and pure
//! functions with no storage and no clock. A selection flows through
//! [`validate::validate`] → [`scoring::compute_score`] →
//! [`classify::classify`]; [`catalog::Catalog`] ties the three together
//! behind a registry keyed by [`InstrumentType`].

pub mod catalog;
pub mod classify;
pub mod definition;
pub mod error;
pub mod instruments;
pub mod procedures;
pub mod scoring;
pub mod validate;

use definition::InstrumentDefinition;
use uci_core::models::instrument::InstrumentType;

pub use catalog::{Catalog, Evaluation};

/// Version of the built-in instrument data. Bump on any change to items,
/// weights or bands.
pub const CATALOG_VERSION: &str = "2024.1";

/// Trait implemented by each built-in instrument.
pub trait Instrument: Send + Sync {
    fn instrument_type(&self) -> InstrumentType;

    /// Human-readable name (e.g., "NAS", "APACHE II").
    fn name(&self) -> &str;

    /// The immutable definition: items, bands and completeness policy.
    fn definition(&self) -> &InstrumentDefinition;
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::apache2::Apache2),
        Box::new(instruments::nas::Nas),
        Box::new(instruments::kinesio::KinesioCategorization),
        Box::new(instruments::mbi::BurnoutMbi),
    ]
}

/// Look up an instrument by type.
pub fn get_instrument(instrument_type: InstrumentType) -> Option<Box<dyn Instrument>> {
    all_instruments()
        .into_iter()
        .find(|i| i.instrument_type() == instrument_type)
}
