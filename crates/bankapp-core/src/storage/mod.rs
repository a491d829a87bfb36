//! Account repository backends and their configuration.

pub mod memory;
pub mod postgres;

use crate::repository::{AccountRepository, RepositoryResult};
use memory::InMemoryAccountRepository;
use postgres::PostgresAccountRepository;
use std::sync::Arc;

/// Account persistence backend configuration.
#[derive(Debug, Clone, Default)]
pub enum AccountStorageConfig {
    /// Keep accounts in process memory only.
    #[default]
    Memory,
    /// Persist accounts in PostgreSQL.
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

impl AccountStorageConfig {
    pub fn memory() -> Self {
        Self::Memory
    }

    pub fn postgres(database_url: impl Into<String>, max_connections: u32) -> Self {
        Self::Postgres {
            database_url: database_url.into(),
            max_connections,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres { .. } => "postgres",
        }
    }
}

/// Open the configured backend. For PostgreSQL this connects and creates the schema.
pub async fn connect_repository(
    config: &AccountStorageConfig,
) -> RepositoryResult<Arc<dyn AccountRepository>> {
    match config {
        AccountStorageConfig::Memory => Ok(Arc::new(InMemoryAccountRepository::new())),
        AccountStorageConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let repository =
                PostgresAccountRepository::connect(database_url, *max_connections).await?;
            repository.ensure_schema().await?;
            Ok(Arc::new(repository))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_name_the_backend() {
        assert_eq!(AccountStorageConfig::default().label(), "memory");
        assert_eq!(
            AccountStorageConfig::postgres("postgres://localhost/bank", 5).label(),
            "postgres"
        );
    }

    #[tokio::test]
    async fn memory_backend_starts_empty() {
        let repository = connect_repository(&AccountStorageConfig::memory())
            .await
            .unwrap();
        assert!(repository.find_all().await.unwrap().is_empty());
    }
}
