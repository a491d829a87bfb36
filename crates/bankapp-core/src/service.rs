use crate::account::{Account, AccountId};
use crate::error::AccountError;
use crate::repository::AccountRepository;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Sequences lookup, mutation and persistence for accounts.
///
/// Balance rules live in [`Account`]; this type only resolves accounts, applies the mutation
/// and saves the result. Deposits and withdrawals on the same account number are serialized
/// by an in-process lock so two concurrent calls cannot both read the same balance and
/// overwrite each other. Calls on different account numbers never wait on each other. The
/// lock does not span processes: several service instances sharing one database can still
/// interleave their read and write.
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    account_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self {
            repository,
            account_locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_all_accounts(&self) -> Result<Vec<Account>, AccountError> {
        let accounts = self.repository.find_all().await?;
        debug!(count = accounts.len(), "listed accounts");
        Ok(accounts)
    }

    pub async fn get_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Account, AccountError> {
        debug!(account_number, "looking up account");
        self.repository
            .find_by_account_number(account_number)
            .await?
            .ok_or_else(|| AccountError::not_found(account_number))
    }

    pub async fn create_account(&self, account: Account) -> Result<Account, AccountError> {
        if let Err(err) = account.initialize() {
            warn!(account_number = %account.account_number, error = %err, "account rejected");
            return Err(err);
        }

        let created = self.repository.save(account).await?;
        info!(
            id = ?created.id,
            account_number = %created.account_number,
            balance = %created.balance(),
            "account created"
        );
        Ok(created)
    }

    pub async fn deposit(
        &self,
        account_number: &str,
        amount: Decimal,
    ) -> Result<Account, AccountError> {
        self.mutate(account_number, "deposit", |account| account.deposit(amount)).await
    }

    pub async fn withdraw(
        &self,
        account_number: &str,
        amount: Decimal,
    ) -> Result<Account, AccountError> {
        self.mutate(account_number, "withdraw", |account| account.withdraw(amount)).await
    }

    /// Deleting an identity that is not stored succeeds without effect.
    pub async fn delete_account(&self, id: AccountId) -> Result<(), AccountError> {
        self.repository.delete_by_id(id).await?;
        info!(id, "account deleted");
        Ok(())
    }

    async fn mutate<F>(
        &self,
        account_number: &str,
        operation: &'static str,
        apply: F,
    ) -> Result<Account, AccountError>
    where
        F: FnOnce(&mut Account) -> Result<(), AccountError>,
    {
        let lock = self.lock_for(account_number).await;
        let result = {
            let _guard = lock.lock().await;
            self.lookup_apply_save(account_number, operation, apply).await
        };
        self.release_lock(account_number, lock).await;
        if let Err(err) = &result {
            if !err.is_domain() {
                error!(account_number, operation, error = %err, "storage rejected balance change");
            }
        }
        result
    }

    async fn lookup_apply_save<F>(
        &self,
        account_number: &str,
        operation: &'static str,
        apply: F,
    ) -> Result<Account, AccountError>
    where
        F: FnOnce(&mut Account) -> Result<(), AccountError>,
    {
        let mut account = self.get_account_by_number(account_number).await?;
        if let Err(err) = apply(&mut account) {
            warn!(account_number, operation, error = %err, "balance change rejected");
            return Err(err);
        }

        let saved = self.repository.save(account).await?;
        info!(
            account_number,
            operation,
            balance = %saved.balance(),
            "balance updated"
        );
        Ok(saved)
    }

    async fn lock_for(&self, account_number: &str) -> Arc<Mutex<()>> {
        let mut locks = self.account_locks.lock().await;
        locks
            .entry(account_number.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn release_lock(&self, account_number: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.account_locks.lock().await;
        // Only the map and this caller hold the entry: nobody else is waiting on it.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(account_number);
        }
    }
}
