//! Connection pool lifecycle.

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Postgres;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};

/// Process-wide pool handle, cloned into every request through `AppState`.
///
/// A disabled handle never creates a pool: `acquire` fails immediately
/// instead of waiting for a connection that can never arrive.
#[derive(Clone, Debug)]
pub struct Database {
    pool: Option<PgPool>,
}

impl Database {
    /// Open the pool and establish `pool_min_size` connections up front.
    pub async fn connect(config: &DatabaseConfig) -> std::result::Result<Self, sqlx::Error> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = PgPoolOptions::new()
            .min_connections(config.pool_min_size)
            .max_connections(config.pool_max_size)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    pub fn disabled() -> Self {
        Self { pool: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    /// Check out one connection for the duration of a request.
    ///
    /// The connection returns to the pool when the guard is dropped, on
    /// every exit path of the handler.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        let pool = self.pool.as_ref().ok_or(AppError::StoreNotConfigured)?;
        Ok(pool.acquire().await?)
    }

    /// `None` when the store is disabled.
    pub async fn health_check(&self) -> Option<bool> {
        let pool = self.pool.as_ref()?;
        Some(sqlx::query("SELECT 1").execute(pool).await.is_ok())
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_store_fails_fast() {
        let db = Database::disabled();
        assert!(!db.is_enabled());
        assert!(matches!(db.acquire().await, Err(AppError::StoreNotConfigured)));
        assert_eq!(db.health_check().await, None);
        db.close().await;
    }
}
