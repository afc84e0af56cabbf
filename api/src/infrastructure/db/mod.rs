use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};

use crate::application::ports::database_clock::DatabaseClock;
use crate::bootstrap::config::Config;

pub type MySqlPool = Pool<MySql>;

/// Builds the pool without connecting; the first query opens a connection.
pub fn lazy_pool(cfg: &Config) -> MySqlPool {
    let mut options = MySqlConnectOptions::new()
        .host(&cfg.db_host)
        .port(cfg.db_port)
        .username(&cfg.db_user)
        .password(&cfg.db_password);
    if let Some(name) = cfg.db_name.as_deref() {
        options = options.database(name);
    }
    MySqlPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options)
}

pub struct MySqlClock {
    pool: MySqlPool,
}

impl MySqlClock {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseClock for MySqlClock {
    async fn now(&self) -> anyhow::Result<NaiveDateTime> {
        let now = sqlx::query_scalar::<_, NaiveDateTime>("SELECT NOW()")
            .fetch_one(&self.pool)
            .await?;
        Ok(now)
    }
}
