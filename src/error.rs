use thiserror::Error;

/// Validation failures surfaced to the caller at record-creation and
/// catalog-update time. All are recoverable; none abort the ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("end reading must be greater than start reading")]
    InvalidReading,

    #[error("price must be a positive amount")]
    InvalidPrice,

    #[error("litres must be greater than zero")]
    InvalidQuantity,

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("fuel type {0:?} already exists")]
    DuplicateFuelType(String),

    #[error("{0} not found")]
    NotFound(String),
}
