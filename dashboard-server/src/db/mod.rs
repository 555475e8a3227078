//! SQLite pool and schema migrations

pub mod repository;

use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Owns the connection pool; cloned into the server state
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database file in WAL mode and migrate it
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let options = parse_options(&format!("sqlite:{db_path}"))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // wait on a locked writer instead of failing with SQLITE_BUSY
            .busy_timeout(Duration::from_secs(5))
            .optimize_on_close(true, None);

        let pool = connect(SqlitePoolOptions::new().max_connections(5), options).await?;
        tracing::info!(path = %db_path, "Database opened (WAL)");
        Self::migrate(pool).await
    }

    /// Private in-memory database, used by tests and `DATABASE_PATH=:memory:`
    ///
    /// One connection that never idles out: the schema lives and dies with it.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = connect(
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            parse_options("sqlite::memory:")?,
        )
        .await?;
        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::debug!("Database migrations applied");
        Ok(Self { pool })
    }
}

fn parse_options(url: &str) -> Result<SqliteConnectOptions, AppError> {
    SqliteConnectOptions::from_str(url)
        .map(|options| options.foreign_keys(true))
        .map_err(|e| AppError::database(format!("Invalid database path: {e}")))
}

async fn connect(
    pool_options: SqlitePoolOptions,
    options: SqliteConnectOptions,
) -> Result<SqlitePool, AppError> {
    pool_options
        .connect_with(options)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))
}
