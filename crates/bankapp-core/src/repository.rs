use crate::account::{Account, AccountId};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository-layer errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Another account already uses the account number.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An update targeted an identity that is no longer stored.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    pub fn duplicate_account_number(account_number: &str) -> Self {
        Self::Conflict(format!("account number '{}' is already in use", account_number))
    }
}

/// Storage interface for account records.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// All stored accounts, in storage order.
    async fn find_all(&self) -> RepositoryResult<Vec<Account>>;

    async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> RepositoryResult<Option<Account>>;

    /// Insert or update. Assigns an identity when the account has none, rejects a second
    /// account with the same number, and fails with `NotFound` when updating a removed identity.
    async fn save(&self, account: Account) -> RepositoryResult<Account>;

    /// Remove by identity. Removing an unknown identity is not an error.
    async fn delete_by_id(&self, id: AccountId) -> RepositoryResult<()>;
}
