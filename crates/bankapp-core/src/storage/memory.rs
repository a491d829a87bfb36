//! In-memory account repository.
//!
//! Deterministic and test-friendly: accounts are kept ordered by identity and identities are
//! handed out from a monotonic counter, so a deleted identity is never reused.

use crate::account::{Account, AccountId};
use crate::repository::{AccountRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct AccountTable {
    rows: BTreeMap<AccountId, Account>,
    last_id: AccountId,
}

impl AccountTable {
    fn number_taken_by_other(&self, account: &Account) -> bool {
        self.rows
            .values()
            .any(|row| row.account_number == account.account_number && row.id != account.id)
    }
}

/// In-memory account repository.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    table: RwLock<AccountTable>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> RepositoryError {
        RepositoryError::Backend("accounts lock poisoned".to_string())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Account>> {
        let guard = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(guard.rows.values().cloned().collect())
    }

    async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> RepositoryResult<Option<Account>> {
        let guard = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(guard
            .rows
            .values()
            .find(|row| row.account_number == account_number)
            .cloned())
    }

    async fn save(&self, mut account: Account) -> RepositoryResult<Account> {
        let mut guard = self.table.write().map_err(|_| Self::poisoned())?;

        if guard.number_taken_by_other(&account) {
            return Err(RepositoryError::duplicate_account_number(
                &account.account_number,
            ));
        }

        let id = match account.id {
            Some(id) if guard.rows.contains_key(&id) => id,
            Some(id) => {
                return Err(RepositoryError::NotFound(format!(
                    "account {} no longer exists",
                    id
                )))
            }
            None => {
                guard.last_id += 1;
                guard.last_id
            }
        };
        account.id = Some(id);
        guard.rows.insert(id, account.clone());
        Ok(account)
    }

    async fn delete_by_id(&self, id: AccountId) -> RepositoryResult<()> {
        let mut guard = self.table.write().map_err(|_| Self::poisoned())?;
        guard.rows.remove(&id);
        Ok(())
    }
}
