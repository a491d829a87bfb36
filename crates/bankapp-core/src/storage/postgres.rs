//! PostgreSQL account repository.

use crate::account::{Account, AccountId};
use crate::repository::{AccountRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

/// PostgreSQL-backed account repository.
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub async fn connect(database_url: &str, max_connections: u32) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await
            .map_err(|e| RepositoryError::Backend(format!("postgres connect failed: {e}")))?;

        Ok(Self { pool })
    }

    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        // Uniqueness of account_number is enforced here, not by the service.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id BIGSERIAL PRIMARY KEY,
                holder_name TEXT NOT NULL,
                account_number TEXT NOT NULL UNIQUE,
                balance NUMERIC NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Backend(format!("postgres schema create failed: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Account>> {
        let rows = sqlx::query(
            "SELECT id, holder_name, account_number, balance FROM accounts ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Backend(format!("postgres load failed: {e}")))?;

        rows.iter().map(decode_account).collect()
    }

    async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> RepositoryResult<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, holder_name, account_number, balance
            FROM accounts
            WHERE account_number = $1
            "#,
        )
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Backend(format!("postgres lookup failed: {e}")))?;

        row.as_ref().map(decode_account).transpose()
    }

    async fn save(&self, account: Account) -> RepositoryResult<Account> {
        let result = match account.id {
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO accounts (holder_name, account_number, balance)
                    VALUES ($1, $2, $3)
                    RETURNING id, holder_name, account_number, balance
                    "#,
                )
                .bind(&account.holder_name)
                .bind(&account.account_number)
                .bind(account.balance())
                .fetch_optional(&self.pool)
                .await
            }
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE accounts
                    SET holder_name = $2, account_number = $3, balance = $4
                    WHERE id = $1
                    RETURNING id, holder_name, account_number, balance
                    "#,
                )
                .bind(id)
                .bind(&account.holder_name)
                .bind(&account.account_number)
                .bind(account.balance())
                .fetch_optional(&self.pool)
                .await
            }
        };

        match result {
            Ok(Some(row)) => decode_account(&row),
            Ok(None) => Err(RepositoryError::NotFound(format!(
                "account {} no longer exists",
                account.id.unwrap_or_default()
            ))),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                RepositoryError::duplicate_account_number(&account.account_number),
            ),
            Err(e) => Err(RepositoryError::Backend(format!("postgres save failed: {e}"))),
        }
    }

    async fn delete_by_id(&self, id: AccountId) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Backend(format!("postgres delete failed: {e}")))?;

        Ok(())
    }
}

fn decode_account(row: &PgRow) -> RepositoryResult<Account> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| RepositoryError::Backend(format!("postgres decode id failed: {e}")))?;
    let holder_name: String = row.try_get("holder_name").map_err(|e| {
        RepositoryError::Backend(format!("postgres decode holder_name failed: {e}"))
    })?;
    let account_number: String = row.try_get("account_number").map_err(|e| {
        RepositoryError::Backend(format!("postgres decode account_number failed: {e}"))
    })?;
    let balance: Decimal = row
        .try_get("balance")
        .map_err(|e| RepositoryError::Backend(format!("postgres decode balance failed: {e}")))?;

    Ok(Account::from_parts(id, holder_name, account_number, balance))
}
