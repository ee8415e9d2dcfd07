use thiserror::Error;
use uci_core::models::instrument::InstrumentType;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("cohort is for {cohort} but the definition is {definition}")]
    InstrumentMismatch {
        cohort: InstrumentType,
        definition: InstrumentType,
    },

    #[error("{0} is not supported by this metric")]
    UnsupportedInstrument(InstrumentType),

    #[error("assessment {0} has a score that does not fit its instrument")]
    CorruptRecord(Uuid),

    #[error("catalog integrity error: {0}")]
    Catalog(#[from] uci_instruments::error::CatalogError),
}
