use anyhow::Context as _;
use sqlx::{PgPool, migrate::Migrator, postgres::PgPoolOptions};

use crate::cache::CacheService;

/// Compile-time discovered SQLx migrations mirroring the hosted schema.
pub static MIGRATOR: Migrator = sqlx::migrate!();

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Handle to the hosted database plus the optional read cache in front of it.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    cache: CacheService,
}

impl Database {
    pub fn new(pool: PgPool, cache: CacheService) -> Self {
        Self { pool, cache }
    }

    /// Open a bounded pool against `database_url`.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        cache: CacheService,
    ) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await
            .context("failed to connect to the hosted database")?;

        Ok(Self::new(pool, cache))
    }

    /// Build a handle whose connections are only opened on first use.
    pub fn connect_lazy(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .connect_lazy(database_url)
            .context("invalid database url")?;

        Ok(Self::new(pool, CacheService::disabled("hxbit:test")))
    }

    pub async fn health_check(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }
}
