use thiserror::Error;

use super::{Cents, EntryId, MAX_AMOUNT_CENTS};

/// Rejection of an entry at capture time. The ledger is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Amount must be positive, got {0} cents")]
    NonPositiveAmount(Cents),

    #[error("Amount too large, got {0} cents (maximum {max})", max = MAX_AMOUNT_CENTS)]
    AmountTooLarge(Cents),

    #[error("Entry already recorded: {0}")]
    DuplicateEntry(EntryId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid money format: '{0}'")]
    Amount(String),

    #[error("too many decimal places in '{0}' (at most two)")]
    Precision(String),

    #[error("unsupported currency: '{0}' (expected one of EUR, GBP, INR, JPY, USD)")]
    Currency(String),

    #[error("unknown expense type: '{0}' (expected need, want, investment or insurance)")]
    ExpenseType(String),

    #[error("unknown grouping: '{0}' (expected category or type)")]
    Grouping(String),

    #[error("unknown entry kind: '{0}' (expected income or expense)")]
    Kind(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),
}
