//! Bank account core.
//!
//! This crate owns the account entity and its balance invariants, the service that sequences
//! lookup, mutation and persistence, and the repository backends the service persists through.

#![deny(unsafe_code)]

pub mod account;
pub mod error;
pub mod repository;
pub mod service;
pub mod storage;

pub use account::{Account, AccountId};
pub use error::AccountError;
pub use repository::{AccountRepository, RepositoryError, RepositoryResult};
pub use rust_decimal::Decimal;
pub use service::AccountService;
pub use storage::memory::InMemoryAccountRepository;
pub use storage::postgres::PostgresAccountRepository;
pub use storage::{connect_repository, AccountStorageConfig};
