use anyhow::Result;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, SqlxPostgresConnector, TransactionTrait};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::AppConfig;

/// Read and write handles to the store. Every SELECT goes through `read`;
/// every INSERT/UPDATE/DELETE runs inside a transaction opened on `write`.
#[derive(Debug, Clone)]
pub struct Db {
    pub read: DatabaseConnection,
    pub write: DatabaseConnection,
}

impl Db {
    /// Use the same connection for both roles (tests, single-node setups).
    pub fn single(conn: DatabaseConnection) -> Self {
        Self {
            read: conn.clone(),
            write: conn,
        }
    }

    /// Open a transaction on the write handle. Dropping it without
    /// `commit()` rolls every statement back.
    pub async fn begin(&self) -> Result<DatabaseTransaction, DbErr> {
        self.write.begin().await
    }
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Connect both handles. The write pool is returned too so callers can run migrations on it.
pub async fn connect(config: &AppConfig) -> Result<(Db, PgPool)> {
    let write_pool = create_pool(&config.database_url, config.max_connections).await?;
    let read_pool = if config.read_database_url == config.database_url {
        write_pool.clone()
    } else {
        create_pool(&config.read_database_url, config.max_connections).await?
    };

    let db = Db {
        read: SqlxPostgresConnector::from_sqlx_postgres_pool(read_pool),
        write: SqlxPostgresConnector::from_sqlx_postgres_pool(write_pool.clone()),
    };
    Ok((db, write_pool))
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
