use thiserror::Error;

use crate::domain::line_item::LineItemId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid pricing input: {0}")]
    InvalidInput(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("line item `{0}` was not found")]
    NotFound(LineItemId),
}

/// Preconditions checked before a quotation is sent to the backend.
///
/// Ordering matters: failures are reported in declaration order, so a save
/// with neither a party nor items always mentions the party first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SavePrecondition {
    SelectedParty,
    LineItems,
}

impl SavePrecondition {
    pub fn describe(self) -> &'static str {
        match self {
            Self::SelectedParty => "no customer party is selected",
            Self::LineItems => "the quotation has no line items",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot save quotation: {}", describe_preconditions(.0))]
pub struct SaveValidationError(pub Vec<SavePrecondition>);

fn describe_preconditions(failed: &[SavePrecondition]) -> String {
    failed.iter().map(|precondition| precondition.describe()).collect::<Vec<_>>().join("; ")
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}
