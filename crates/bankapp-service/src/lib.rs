#![deny(unsafe_code)]

pub mod error;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bankapp_core::{connect_repository, Account, AccountService, AccountStorageConfig, Decimal};
use error::{ApiError, ApiResult, ServiceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub storage: AccountStorageConfig,
}

#[derive(Clone)]
pub struct ServiceState {
    pub accounts: Arc<AccountService>,
    pub storage_backend: &'static str,
}

impl ServiceState {
    pub async fn bootstrap(config: ServiceConfig) -> Result<Self, ServiceError> {
        let repository = connect_repository(&config.storage).await?;
        tracing::info!(backend = config.storage.label(), "account storage ready");

        Ok(Self {
            accounts: Arc::new(AccountService::new(repository)),
            storage_backend: config.storage.label(),
        })
    }
}

pub fn build_router(state: ServiceState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/accounts", get(list_accounts).post(create_account))
        .route("/api/accounts/:account_ref", get(get_account).delete(delete_account))
        .route("/api/accounts/:account_ref/deposit", post(deposit))
        .route("/api/accounts/:account_ref/withdraw", post(withdraw))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    storage_backend: &'static str,
}

async fn health(State(state): State<ServiceState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "bankapp-service",
        storage_backend: state.storage_backend,
    })
}

/// Body of `POST /api/accounts`. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountRequest {
    holder_name: String,
    account_number: String,
    balance: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
struct AmountQuery {
    amount: Decimal,
}

async fn list_accounts(State(state): State<ServiceState>) -> ApiResult<Json<Vec<Account>>> {
    Ok(Json(state.accounts.get_all_accounts().await?))
}

async fn get_account(
    Path(account_number): Path<String>,
    State(state): State<ServiceState>,
) -> ApiResult<Json<Account>> {
    Ok(Json(state.accounts.get_account_by_number(&account_number).await?))
}

async fn create_account(
    State(state): State<ServiceState>,
    request: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let Json(request) = request?;
    let account = Account::new(request.holder_name, request.account_number, request.balance);
    let created = state.accounts.create_account(account).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn deposit(
    Path(account_number): Path<String>,
    State(state): State<ServiceState>,
    query: Result<Query<AmountQuery>, QueryRejection>,
) -> ApiResult<Json<Account>> {
    let Query(query) = query?;
    Ok(Json(state.accounts.deposit(&account_number, query.amount).await?))
}

async fn withdraw(
    Path(account_number): Path<String>,
    State(state): State<ServiceState>,
    query: Result<Query<AmountQuery>, QueryRejection>,
) -> ApiResult<Json<Account>> {
    let Query(query) = query?;
    Ok(Json(state.accounts.withdraw(&account_number, query.amount).await?))
}

async fn delete_account(
    Path(account_ref): Path<String>,
    State(state): State<ServiceState>,
) -> ApiResult<StatusCode> {
    let id = account_ref
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid account id '{}'", account_ref)))?;
    state.accounts.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
