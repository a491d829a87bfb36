use bankapp_core::AccountStorageConfig;
use bankapp_service::{build_router, ServiceConfig, ServiceState};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StorageMode {
    Auto,
    Memory,
    Postgres,
}

#[derive(Debug, Parser)]
#[command(name = "bankappd", version, about = "Bank account REST service")]
struct Cli {
    /// Socket address to bind, e.g. 127.0.0.1:8080
    #[arg(long, default_value = "127.0.0.1:8080", env = "BANKAPP_LISTEN")]
    listen: SocketAddr,
    /// Account persistence backend. `auto` picks postgres when a database url is configured.
    #[arg(long, value_enum, default_value_t = StorageMode::Auto, env = "BANKAPP_STORAGE")]
    storage: StorageMode,
    /// PostgreSQL url for account persistence. Falls back to DATABASE_URL.
    #[arg(long, env = "BANKAPP_DATABASE_URL")]
    database_url: Option<String>,
    /// Max PostgreSQL pool connections.
    #[arg(long, default_value_t = 5, env = "BANKAPP_PG_MAX_CONNECTIONS")]
    pg_max_connections: u32,
}

fn resolve_storage(
    cli: &Cli,
    fallback_url: Option<String>,
) -> anyhow::Result<AccountStorageConfig> {
    let resolved_url = cli.database_url.clone().or(fallback_url);

    let storage = match cli.storage {
        StorageMode::Memory => AccountStorageConfig::Memory,
        StorageMode::Postgres => {
            let database_url = resolved_url.ok_or_else(|| {
                anyhow::anyhow!("storage=postgres requires --database-url or DATABASE_URL")
            })?;
            AccountStorageConfig::postgres(database_url, cli.pg_max_connections)
        }
        StorageMode::Auto => match resolved_url {
            Some(database_url) => {
                AccountStorageConfig::postgres(database_url, cli.pg_max_connections)
            }
            None => AccountStorageConfig::Memory,
        },
    };

    Ok(storage)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "bankapp_service=info,bankapp_core=info,tower_http=info,info".to_string()
        }))
        .init();

    let cli = Cli::parse();
    let storage = resolve_storage(&cli, std::env::var("DATABASE_URL").ok())?;
    info!(backend = storage.label(), "resolved account storage");

    let state = ServiceState::bootstrap(ServiceConfig { storage }).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    info!("bankapp-service REST listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bankappd").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn auto_without_url_uses_memory() {
        let cli = parse(&["--storage", "auto"]);
        let storage = resolve_storage(&cli, None).unwrap();
        assert_eq!(storage.label(), "memory");
    }

    #[test]
    fn auto_with_fallback_url_uses_postgres() {
        let cli = parse(&["--storage", "auto", "--pg-max-connections", "3"]);
        let fallback = Some("postgres://localhost/bank".to_string());
        let storage = resolve_storage(&cli, fallback).unwrap();
        match storage {
            AccountStorageConfig::Postgres {
                database_url,
                max_connections,
            } => {
                assert_eq!(database_url, "postgres://localhost/bank");
                assert_eq!(max_connections, 3);
            }
            other => panic!("unexpected storage: {other:?}"),
        }
    }

    #[test]
    fn explicit_url_wins_over_fallback() {
        let cli = parse(&[
            "--storage",
            "postgres",
            "--database-url",
            "postgres://db/primary",
        ]);
        let fallback = Some("postgres://db/fallback".to_string());
        match resolve_storage(&cli, fallback).unwrap() {
            AccountStorageConfig::Postgres { database_url, .. } => {
                assert_eq!(database_url, "postgres://db/primary");
            }
            other => panic!("unexpected storage: {other:?}"),
        }
    }

    #[test]
    fn postgres_without_url_is_rejected() {
        let cli = parse(&["--storage", "postgres"]);
        assert!(resolve_storage(&cli, None).is_err());
    }

    #[test]
    fn memory_ignores_database_url() {
        let cli = parse(&["--storage", "memory", "--database-url", "postgres://db/x"]);
        let storage = resolve_storage(&cli, None).unwrap();
        assert_eq!(storage.label(), "memory");
    }
}
