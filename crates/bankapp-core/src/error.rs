use crate::repository::RepositoryError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failures raised by account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account not found with number: {0}")]
    AccountNotFound(String),

    #[error("Invalid amount: {}", display_amount(.0))]
    InvalidAmount(Decimal),

    #[error(
        "Insufficient funds: balance = ${}, attempted withdrawal = ${}",
        display_amount(.balance),
        display_amount(.amount)
    )]
    InsufficientFunds { balance: Decimal, amount: Decimal },

    /// Reserved for an authorization layer; nothing raises it yet.
    #[error("You are not authorized to perform this operation: {0}")]
    UnauthorizedOperation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AccountError {
    pub fn not_found(account_number: impl Into<String>) -> Self {
        Self::AccountNotFound(account_number.into())
    }

    /// True for failures caused by the request rather than by storage.
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Repository(_))
    }
}

/// Amounts in messages always carry at least one fractional digit: `100.0`, `0.25`.
fn display_amount(amount: &Decimal) -> String {
    let mut shown = amount.normalize();
    if shown.scale() == 0 {
        shown.rescale(1);
    }
    shown.to_string()
}
